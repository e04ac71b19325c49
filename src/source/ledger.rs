use rusqlite::{Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::{Context, SourceError, TaskSource, PAGE_SIZE};
use crate::db::DbConnection;
use crate::models::{Task, TaskList, TaskStatus};

/// VM instructions between deadline checks
const PROGRESS_OPS: i32 = 100;

/// Task source backed by the local SQLite ledger
///
/// Provider order is the `position` column, assigned at creation time. Page
/// queries return rows in that order; nothing is re-sorted on the way out.
///
/// Every call runs under the timeout of the context it is given: lock waits
/// through SQLite's busy timeout, statements through a progress handler that
/// aborts once the call's deadline has passed.
///
/// # Example
///
/// ```no_run
/// use tasq::source::{Context, TaskSource};
/// use tasq::source::ledger::LedgerSource;
///
/// let ctx = Context::default();
/// let ledger = LedgerSource::open(std::path::Path::new("ledger.db"), &ctx).unwrap();
/// let inbox = ledger.default_list(&ctx).unwrap();
/// ledger.create_task(&ctx, &inbox.id, "Buy milk").unwrap();
/// ```
pub struct LedgerSource {
    conn: Connection,
    deadline: Arc<Mutex<Option<Instant>>>,
    timed_out: Arc<AtomicBool>,
}

impl LedgerSource {
    /// Open a ledger file and bring its schema up to date
    pub fn open(path: &Path, ctx: &Context) -> Result<Self, SourceError> {
        ctx.check()?;
        let conn = DbConnection::open(path, ctx.timeout())
            .map_err(|e| SourceError::Unavailable(format!("{:#}", e)))?;
        Ok(Self::from_connection(conn, ctx))
    }

    /// Create the ledger (and its directory) if needed, then open it
    pub fn create(path: &Path, ctx: &Context) -> Result<Self, SourceError> {
        ctx.check()?;
        let conn = DbConnection::create(path, ctx.timeout())
            .map_err(|e| SourceError::Unavailable(format!("{:#}", e)))?;
        Ok(Self::from_connection(conn, ctx))
    }

    /// Wrap an already-migrated connection; cancelling `ctx` interrupts it
    pub fn from_connection(conn: Connection, ctx: &Context) -> Self {
        let handle = conn.get_interrupt_handle();
        ctx.cancel_token().on_cancel(move || handle.interrupt());

        let deadline: Arc<Mutex<Option<Instant>>> = Arc::default();
        let timed_out = Arc::new(AtomicBool::new(false));
        let (until, expired) = (Arc::clone(&deadline), Arc::clone(&timed_out));
        conn.progress_handler(
            PROGRESS_OPS,
            Some(move || {
                let past = until
                    .lock()
                    .map(|guard| matches!(*guard, Some(at) if Instant::now() >= at))
                    .unwrap_or(false);
                if past {
                    expired.store(true, Ordering::SeqCst);
                }
                past
            }),
        );

        Self {
            conn,
            deadline,
            timed_out,
        }
    }

    /// Start one source call: fail if cancelled, then arm the call's deadline
    fn begin(&self, ctx: &Context) -> Result<(), SourceError> {
        ctx.check()?;
        self.timed_out.store(false, Ordering::SeqCst);
        if let Ok(mut until) = self.deadline.lock() {
            *until = Some(Instant::now() + ctx.timeout());
        }
        Ok(())
    }

    /// Map SQLite failures onto the source error taxonomy
    fn db_error(&self, err: rusqlite::Error) -> SourceError {
        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => SourceError::Timeout,
            Some(ErrorCode::OperationInterrupted) if self.timed_out.load(Ordering::SeqCst) => {
                SourceError::Timeout
            }
            Some(ErrorCode::OperationInterrupted) => SourceError::Interrupted,
            _ => SourceError::Database(err),
        }
    }

    fn require_list(&self, list_id: &str) -> Result<(), SourceError> {
        let exists = self
            .conn
            .query_row("SELECT 1 FROM lists WHERE id = ?1", [list_id], |_| Ok(()))
            .optional()
            .map_err(|e| self.db_error(e))?;
        exists.ok_or_else(|| SourceError::ListNotFound(list_id.to_string()))
    }

    fn set_status(&self, list_id: &str, task_id: &str, status: TaskStatus) -> Result<(), SourceError> {
        let now = chrono::Utc::now().timestamp();
        let changed = self
            .conn
            .execute(
                "UPDATE tasks SET status = ?1, modified_ts = ?2
                 WHERE id = ?3 AND list_id = ?4 AND status = 'open'",
                rusqlite::params![status.as_str(), now, task_id, list_id],
            )
            .map_err(|e| self.db_error(e))?;
        if changed == 0 {
            return Err(SourceError::TaskNotFound(task_id.to_string()));
        }
        Ok(())
    }
}

fn list_from_row(row: &rusqlite::Row) -> rusqlite::Result<TaskList> {
    Ok(TaskList {
        id: row.get(0)?,
        title: row.get(1)?,
        is_default: row.get::<_, i64>(2)? != 0,
    })
}

impl TaskSource for LedgerSource {
    fn default_list(&self, ctx: &Context) -> Result<TaskList, SourceError> {
        self.begin(ctx)?;
        self.conn
            .query_row(
                "SELECT id, title, is_default FROM lists WHERE is_default = 1 LIMIT 1",
                [],
                list_from_row,
            )
            .optional()
            .map_err(|e| self.db_error(e))?
            .ok_or_else(|| SourceError::Unavailable("ledger has no default list".to_string()))
    }

    fn list_lists(&self, ctx: &Context) -> Result<Vec<TaskList>, SourceError> {
        self.begin(ctx)?;
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, is_default FROM lists ORDER BY position, rowid")
            .map_err(|e| self.db_error(e))?;
        let rows = stmt.query_map([], list_from_row).map_err(|e| self.db_error(e))?;

        let mut lists = Vec::new();
        for row in rows {
            lists.push(row.map_err(|e| self.db_error(e))?);
        }
        log::debug!("ledger: {} lists", lists.len());
        Ok(lists)
    }

    fn create_list(&self, ctx: &Context, title: &str) -> Result<TaskList, SourceError> {
        self.begin(ctx)?;
        let list = TaskList::new(title.to_string());
        let now = chrono::Utc::now().timestamp();
        self.conn
            .execute(
                "INSERT INTO lists (id, title, is_default, position, created_ts)
                 VALUES (?1, ?2, 0, (SELECT COALESCE(MAX(position), 0) + 1 FROM lists), ?3)",
                rusqlite::params![list.id, list.title, now],
            )
            .map_err(|e| self.db_error(e))?;
        log::debug!("ledger: created list {}", list.id);
        Ok(list)
    }

    fn delete_list(&self, ctx: &Context, list_id: &str) -> Result<(), SourceError> {
        self.begin(ctx)?;
        let tx = self.conn.unchecked_transaction().map_err(|e| self.db_error(e))?;
        tx.execute("DELETE FROM tasks WHERE list_id = ?1", [list_id])
            .map_err(|e| self.db_error(e))?;
        let removed = tx
            .execute("DELETE FROM lists WHERE id = ?1", [list_id])
            .map_err(|e| self.db_error(e))?;
        if removed == 0 {
            return Err(SourceError::ListNotFound(list_id.to_string()));
        }
        tx.commit().map_err(|e| self.db_error(e))?;
        log::debug!("ledger: deleted list {}", list_id);
        Ok(())
    }

    fn open_tasks_page(
        &self,
        ctx: &Context,
        list_id: &str,
        page: u32,
    ) -> Result<Vec<Task>, SourceError> {
        self.begin(ctx)?;
        self.require_list(list_id)?;
        let offset = (i64::from(page.max(1)) - 1) * PAGE_SIZE as i64;
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, status FROM tasks
                 WHERE list_id = ?1 AND status = 'open'
                 ORDER BY position, rowid
                 LIMIT ?2 OFFSET ?3",
            )
            .map_err(|e| self.db_error(e))?;
        let rows = stmt
            .query_map(rusqlite::params![list_id, PAGE_SIZE as i64, offset], |row| {
                let status: String = row.get(2)?;
                Ok(Task {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    status: TaskStatus::from_str(&status).unwrap_or(TaskStatus::Open),
                })
            })
            .map_err(|e| self.db_error(e))?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(|e| self.db_error(e))?);
        }
        log::debug!("ledger: list {} page {} -> {} tasks", list_id, page, tasks.len());
        Ok(tasks)
    }

    fn has_open_tasks(&self, ctx: &Context, list_id: &str) -> Result<bool, SourceError> {
        self.begin(ctx)?;
        self.require_list(list_id)?;
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM tasks WHERE list_id = ?1 AND status = 'open')",
                [list_id],
                |row| row.get::<_, bool>(0),
            )
            .map_err(|e| self.db_error(e))
    }

    fn create_task(&self, ctx: &Context, list_id: &str, title: &str) -> Result<Task, SourceError> {
        self.begin(ctx)?;
        self.require_list(list_id)?;
        let task = Task::new(title.to_string());
        let now = chrono::Utc::now().timestamp();
        self.conn
            .execute(
                "INSERT INTO tasks (id, list_id, title, status, position, created_ts, modified_ts)
                 VALUES (?1, ?2, ?3, ?4,
                         (SELECT COALESCE(MAX(position), 0) + 1 FROM tasks WHERE list_id = ?2),
                         ?5, ?5)",
                rusqlite::params![task.id, list_id, task.title, task.status.as_str(), now],
            )
            .map_err(|e| self.db_error(e))?;
        log::debug!("ledger: created task {} in {}", task.id, list_id);
        Ok(task)
    }

    fn complete_task(
        &self,
        ctx: &Context,
        list_id: &str,
        task_id: &str,
    ) -> Result<(), SourceError> {
        self.begin(ctx)?;
        self.set_status(list_id, task_id, TaskStatus::Completed)
    }

    fn delete_task(&self, ctx: &Context, list_id: &str, task_id: &str) -> Result<(), SourceError> {
        self.begin(ctx)?;
        self.set_status(list_id, task_id, TaskStatus::Deleted)
    }
}
