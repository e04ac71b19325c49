use rusqlite::{Connection, Result};
use std::collections::HashMap;

/// Current database schema version
const CURRENT_VERSION: u32 = 2;

/// Title given to the default list when a ledger is created
pub const DEFAULT_LIST_TITLE: &str = "My Tasks";

/// Migration system for managing ledger schema versions
pub struct MigrationManager;

impl MigrationManager {
    /// Initialize the database with the current schema
    /// This creates the schema_version table and applies all pending migrations
    pub fn initialize(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            [],
        )?;

        let current_version = Self::get_version(conn)?;

        for version in (current_version + 1)..=CURRENT_VERSION {
            Self::apply_migration(conn, version)?;
        }

        Ok(())
    }

    /// Apply a specific migration by version number
    fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
        let migrations = get_migrations();
        if let Some(migration) = migrations.get(&version) {
            let tx = conn.unchecked_transaction()?;
            migration(&tx)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [version],
            )?;
            tx.commit()?;
            Ok(())
        } else {
            Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some(format!("No migration found for version {}", version)),
            ))
        }
    }

    /// Get the current schema version
    pub fn get_version(conn: &Connection) -> Result<u32> {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }
}

/// Get all migrations indexed by version
fn get_migrations() -> HashMap<u32, fn(&rusqlite::Transaction) -> Result<()>> {
    let mut migrations: HashMap<u32, fn(&rusqlite::Transaction) -> Result<()>> = HashMap::new();
    migrations.insert(1, migration_v1);
    migrations.insert(2, migration_v2);
    migrations
}

/// Migration v1: lists and tasks, plus the default list
fn migration_v1(tx: &rusqlite::Transaction) -> Result<()> {
    tx.execute(
        "CREATE TABLE lists (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL,
            created_ts INTEGER NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE tasks (
            id TEXT PRIMARY KEY,
            list_id TEXT NOT NULL REFERENCES lists(id),
            title TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('open','completed','deleted','hidden')),
            position INTEGER NOT NULL,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;

    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT INTO lists (id, title, is_default, position, created_ts) VALUES (?1, ?2, 1, 0, ?3)",
        rusqlite::params![uuid::Uuid::new_v4().to_string(), DEFAULT_LIST_TITLE, now],
    )?;

    Ok(())
}

/// Migration v2: index backing the open-task page queries
fn migration_v2(tx: &rusqlite::Transaction) -> Result<()> {
    tx.execute(
        "CREATE INDEX idx_tasks_list_status_position ON tasks(list_id, status, position)",
        [],
    )?;
    Ok(())
}
