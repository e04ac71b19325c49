//! tasq - a command-line task list manager
//!
//! Tasks live in lists kept by a task source (the local SQLite ledger in the
//! shipped binary). This library provides:
//! - Task addressing: reference parsing, per-invocation list letters and a
//!   paginated, cached task locator
//! - The task source capability and its ledger and in-memory providers
//! - Configuration and the login session
//! - The command registry, flag parsing, dispatcher and built-in commands
//!
//! # Example
//!
//! ```no_run
//! use tasq::cli::commands::registry;
//! use tasq::cli::Dispatcher;
//! use tasq::session::LedgerFactory;
//! use tasq::source::Context;
//!
//! let registry = registry().unwrap();
//! let dispatcher = Dispatcher::new(&registry, Box::new(LedgerFactory));
//! let args: Vec<String> = std::env::args().skip(1).collect();
//! let code = dispatcher.run(
//!     &Context::default(),
//!     &args,
//!     &mut std::io::stdout(),
//!     &mut std::io::stderr(),
//! );
//! std::process::exit(code);
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod refs;
pub mod session;
pub mod source;
