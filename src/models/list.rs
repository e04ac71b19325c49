use serde::{Deserialize, Serialize};

/// A task list as returned by a task source
///
/// Exactly one list per provider is the default list. It is always present,
/// is never assigned a list letter and cannot be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: String,
    pub title: String,
    pub is_default: bool,
}

impl TaskList {
    pub fn new(title: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            is_default: false,
        }
    }

    /// Case-insensitive, whitespace-trimmed title comparison used for list lookup
    pub fn title_matches(&self, name: &str) -> bool {
        self.title.trim().to_lowercase() == name.trim().to_lowercase()
    }
}
