//! Task source capability
//!
//! Everything the commands know about a task provider goes through
//! [`TaskSource`]. Providers return lists and open tasks in their own order;
//! callers never re-sort what they get back.
//!
//! Two providers ship with the crate:
//! - [`ledger::LedgerSource`]: the local SQLite ledger used by the binary
//! - `memory::MemorySource`: an in-memory provider with fetch counters and
//!   error injection, compiled for tests and the `test_utils` feature

pub mod context;
pub mod ledger;
#[cfg(any(test, feature = "test_utils"))]
pub mod memory;

pub use context::{CancelToken, Context, DEFAULT_TIMEOUT};

use crate::config::Config;
use crate::models::{Task, TaskList};
use thiserror::Error;

/// Number of open tasks per page returned by [`TaskSource::open_tasks_page`]
pub const PAGE_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error("ambiguous list name: {0}")]
    AmbiguousList(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("not logged in (run: tasq login)")]
    NotLoggedIn,
    #[error("invalid session: {0}")]
    InvalidSession(String),
    #[error("request timed out")]
    Timeout,
    #[error("interrupted")]
    Interrupted,
    #[error("database error: {0}")]
    Database(rusqlite::Error),
    #[error("{0}")]
    Unavailable(String),
}

impl SourceError {
    /// Errors that mean the capability itself could not be obtained or trusted
    pub fn is_auth(&self) -> bool {
        matches!(self, SourceError::NotLoggedIn | SourceError::InvalidSession(_))
    }
}

/// Operations the core needs from a task provider
///
/// Every call receives the invocation [`Context`]; implementations must honour
/// its cancellation and bound blocking work by its timeout.
pub trait TaskSource {
    /// The provider's implicit, always-present list
    fn default_list(&self, ctx: &Context) -> Result<TaskList, SourceError>;

    /// All lists in provider order
    fn list_lists(&self, ctx: &Context) -> Result<Vec<TaskList>, SourceError>;

    /// Find a list by title (case-insensitive, trimmed)
    fn resolve_list(&self, ctx: &Context, name: &str) -> Result<TaskList, SourceError> {
        let name = name.trim();
        let mut matches = self
            .list_lists(ctx)?
            .into_iter()
            .filter(|list| list.title_matches(name));
        match (matches.next(), matches.next()) {
            (None, _) => Err(SourceError::ListNotFound(name.to_string())),
            (Some(list), None) => Ok(list),
            (Some(_), Some(_)) => Err(SourceError::AmbiguousList(name.to_string())),
        }
    }

    fn create_list(&self, ctx: &Context, title: &str) -> Result<TaskList, SourceError>;

    fn delete_list(&self, ctx: &Context, list_id: &str) -> Result<(), SourceError>;

    /// One 1-based page of open tasks, [`PAGE_SIZE`] per page, provider order.
    /// An empty page means there is no more data.
    fn open_tasks_page(
        &self,
        ctx: &Context,
        list_id: &str,
        page: u32,
    ) -> Result<Vec<Task>, SourceError>;

    fn has_open_tasks(&self, ctx: &Context, list_id: &str) -> Result<bool, SourceError>;

    fn create_task(&self, ctx: &Context, list_id: &str, title: &str) -> Result<Task, SourceError>;

    fn complete_task(&self, ctx: &Context, list_id: &str, task_id: &str)
        -> Result<(), SourceError>;

    fn delete_task(&self, ctx: &Context, list_id: &str, task_id: &str) -> Result<(), SourceError>;
}

/// Obtains the authenticated task source for commands that need one
pub trait SourceFactory {
    fn open(&self, config: &Config, ctx: &Context) -> Result<Box<dyn TaskSource>, SourceError>;
}
