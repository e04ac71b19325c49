//! Task addressing
//!
//! A task is addressed either by its 1-based position in a list (`7`) or by
//! a list letter plus position (`b7`, or `b 7`). Letters are handed out per
//! invocation to the non-default lists that currently have open tasks, in
//! provider order, so they are only meaningful within the output they were
//! printed next to.

pub mod letters;
pub mod locator;
pub mod parser;

pub use letters::{assign_letters, LetterCursor, ListLetters};
pub use locator::{page_position, TaskLocator};
pub use parser::{parse_task_ref, parse_task_refs, TaskRef};

use crate::source::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefError {
    #[error("task reference required")]
    ReferenceRequired,
    #[error("invalid task reference: {0}")]
    InvalidReference(String),
    #[error("task number out of range: {0}")]
    OutOfRange(u32),
    #[error("too many lists (max 26)")]
    TooManyLists,
    #[error("list letter not found: {0}")]
    LetterNotFound(char),
    #[error(transparent)]
    Source(#[from] SourceError),
}
