// Error type for a single command invocation, and its exit codes

use thiserror::Error;

use crate::cli::flags::FlagError;
use crate::config::ConfigError;
use crate::refs::RefError;
use crate::source::SourceError;

pub const EXIT_SUCCESS: i32 = 0;
/// Bad input: unknown command or flag, bad reference, missing list, ...
pub const EXIT_USER: i32 = 1;
/// Missing or invalid login, unreadable configuration
pub const EXIT_AUTH: i32 = 2;
/// Provider, timeout, interrupt or output failures
pub const EXIT_BACKEND: i32 = 3;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Flag(#[from] FlagError),
    #[error(transparent)]
    Ref(RefError),
    #[error("{0}")]
    User(String),
    #[error("{0}")]
    Auth(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("failed to fetch list: {title}: {cause}")]
    FetchList { title: String, cause: String },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        CliError::User(message.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::UnknownCommand(_)
            | CliError::Flag(_)
            | CliError::Ref(_)
            | CliError::User(_) => EXIT_USER,
            CliError::Auth(_) | CliError::Config(_) => EXIT_AUTH,
            CliError::Backend(_) | CliError::FetchList { .. } | CliError::Output(_) => EXIT_BACKEND,
        }
    }
}

impl From<SourceError> for CliError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::ListNotFound(_) | SourceError::AmbiguousList(_) => {
                CliError::User(err.to_string())
            }
            err if err.is_auth() => CliError::Auth(err.to_string()),
            err => CliError::Backend(err.to_string()),
        }
    }
}

impl From<RefError> for CliError {
    fn from(err: RefError) -> Self {
        match err {
            RefError::Source(err) => err.into(),
            err => CliError::Ref(err),
        }
    }
}
