//! Command-line surface: flag parsing, the command registry, the dispatcher
//! and the built-in commands.

pub mod commands;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod logging;
pub mod output;
pub mod registry;

pub use dispatch::Dispatcher;
pub use error::CliError;
pub use registry::{Command, Invocation, Registry, RegistryError};
