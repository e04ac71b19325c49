// Core data models for tasq
// These mirror what a task source hands back; nothing here is persisted by the core

pub mod list;
pub mod task;

pub use list::*;
pub use task::*;
