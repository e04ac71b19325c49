use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::source::DEFAULT_TIMEOUT;

const APP_DIR: &str = "tasq";
const RC_FILE: &str = "rc";
const SESSION_FILE: &str = "session.json";
const DEFAULT_LEDGER: &str = "ledger.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Per-invocation configuration
///
/// Built from the config directory (the `--config` override or the platform
/// default) and the optional `rc` file in it. `quiet` and `debug` come from the
/// common command-line flags and are filled in by the dispatcher.
#[derive(Debug, Clone)]
pub struct Config {
    pub dir: PathBuf,
    pub ledger_path: PathBuf,
    pub timeout: Duration,
    pub quiet: bool,
    pub debug: bool,
}

impl Config {
    /// Load configuration, reading `<dir>/rc` when it exists
    pub fn load(dir_override: Option<&str>) -> Result<Self, ConfigError> {
        let dir = match dir_override {
            Some(dir) => PathBuf::from(dir),
            None => Self::default_dir(),
        };
        let mut config = Self::with_dir(dir);

        let rc_path = config.rc_path();
        if rc_path.exists() {
            let contents = std::fs::read_to_string(&rc_path).map_err(|source| ConfigError::Read {
                path: rc_path.clone(),
                source,
            })?;
            config.apply_rc(&contents)?;
        }

        Ok(config)
    }

    /// Defaults for a given config directory, without reading anything
    pub fn with_dir(dir: PathBuf) -> Self {
        Self {
            ledger_path: dir.join(DEFAULT_LEDGER),
            dir,
            timeout: DEFAULT_TIMEOUT,
            quiet: false,
            debug: false,
        }
    }

    /// `$XDG_CONFIG_HOME/tasq` or the platform equivalent
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(APP_DIR))
    }

    pub fn rc_path(&self) -> PathBuf {
        self.dir.join(RC_FILE)
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn apply_rc(&mut self, contents: &str) -> Result<(), ConfigError> {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "data.location" => self.ledger_path = resolve_against(&self.dir, value),
                "timeout.secs" => {
                    let secs: u64 = value
                        .parse()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or_else(|| ConfigError::InvalidValue {
                            key: "timeout.secs".to_string(),
                            value: value.to_string(),
                        })?;
                    self.timeout = Duration::from_secs(secs);
                }
                other => log::debug!("ignoring unknown rc key: {}", other),
            }
        }
        Ok(())
    }
}

/// Relative paths in the rc file are relative to the config directory
fn resolve_against(dir: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_relative() {
        dir.join(path)
    } else {
        path
    }
}
