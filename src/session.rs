//! Login session
//!
//! `login` writes `session.json` into the config directory; every command that
//! needs the task source goes through [`LedgerFactory`], which refuses to open
//! anything without a valid session.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::source::ledger::LedgerSource;
use crate::source::{Context, SourceError, SourceFactory, TaskSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Ledger this session was created for
    pub ledger: PathBuf,
    pub created_ts: i64,
}

impl Session {
    pub fn new(ledger: PathBuf) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ledger,
            created_ts: chrono::Utc::now().timestamp(),
        }
    }

    /// Read the session file; `Ok(None)` when there is none
    pub fn load(path: &Path) -> Result<Option<Self>, SourceError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SourceError::InvalidSession(err.to_string())),
        };
        let session: Session = serde_json::from_str(&contents)
            .map_err(|err| SourceError::InvalidSession(err.to_string()))?;
        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context as _;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to encode session")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write session: {}", path.display()))?;
        Ok(())
    }

    /// Delete the session file; returns false when there was none
    pub fn remove(path: &Path) -> anyhow::Result<bool> {
        use anyhow::Context as _;

        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove session: {}", path.display())),
        }
    }

    /// The session for `config`, checked against the ledger it points at
    pub fn require(config: &Config) -> Result<Self, SourceError> {
        let session = Self::load(&config.session_path())?.ok_or(SourceError::NotLoggedIn)?;
        if !session.ledger.exists() {
            return Err(SourceError::InvalidSession(format!(
                "ledger missing: {}",
                session.ledger.display()
            )));
        }
        Ok(session)
    }
}

/// Opens the ledger named by the current session
pub struct LedgerFactory;

impl SourceFactory for LedgerFactory {
    fn open(&self, config: &Config, ctx: &Context) -> Result<Box<dyn TaskSource>, SourceError> {
        let session = Session::require(config)?;
        log::debug!("opening ledger {} (session {})", session.ledger.display(), session.id);
        Ok(Box::new(LedgerSource::open(&session.ledger, ctx)?))
    }
}
