use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use anyhow::{Context, Result};
use crate::db::migrations::MigrationManager;

/// Database connection manager for the task ledger
pub struct DbConnection;

impl DbConnection {
    /// Open the ledger at `path`, creating it and parent directories if needed
    pub fn create(path: &Path, busy_timeout: Duration) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Self::open(path, busy_timeout)
    }

    /// Open an existing ledger and bring its schema up to date
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Connection> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger: {}", path.display()))?;

        conn.busy_timeout(busy_timeout)
            .context("Failed to set busy timeout")?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize ledger schema")?;

        Ok(conn)
    }

    /// Connect to an in-memory ledger (for testing)
    pub fn open_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize ledger schema")?;

        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_makes_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("ledger.db");

        DbConnection::create(&db_path, Duration::from_secs(1)).unwrap();

        assert!(db_path.exists());
    }

    #[test]
    fn test_open_in_memory_has_schema() {
        let conn = DbConnection::open_in_memory().unwrap();
        let version = MigrationManager::get_version(&conn).unwrap();
        assert_eq!(version, 2);
    }
}
