use std::collections::HashMap;

use super::RefError;
use crate::models::Task;
use crate::source::{Context, SourceError, TaskSource, PAGE_SIZE};

/// Page number and index within that page for an absolute 1-based position
pub fn page_position(number: u32) -> (u32, usize) {
    let offset = number.saturating_sub(1) as usize;
    ((offset / PAGE_SIZE) as u32 + 1, offset % PAGE_SIZE)
}

/// Resolves absolute task numbers to tasks, fetching each page at most once
///
/// The page cache lives as long as the locator, which is one invocation; all
/// references and page reads in that invocation see the same snapshot.
pub struct TaskLocator<'a> {
    source: &'a dyn TaskSource,
    ctx: &'a Context,
    cache: HashMap<(String, u32), Vec<Task>>,
}

impl<'a> TaskLocator<'a> {
    pub fn new(source: &'a dyn TaskSource, ctx: &'a Context) -> Self {
        Self {
            source,
            ctx,
            cache: HashMap::new(),
        }
    }

    /// One page of open tasks for a list, from cache when already fetched
    pub fn page(&mut self, list_id: &str, page: u32) -> Result<&[Task], SourceError> {
        let key = (list_id.to_string(), page);
        if self.cache.contains_key(&key) {
            log::debug!("page cache hit: list {} page {}", list_id, page);
        } else {
            log::debug!("page cache miss: list {} page {}", list_id, page);
            let tasks = self.source.open_tasks_page(self.ctx, list_id, page)?;
            self.cache.insert(key.clone(), tasks);
        }
        Ok(self.cache.get(&key).map(Vec::as_slice).unwrap_or_default())
    }

    /// The task at 1-based `number` among the list's open tasks
    pub fn locate(&mut self, list_id: &str, number: u32) -> Result<Task, RefError> {
        if number == 0 {
            return Err(RefError::OutOfRange(0));
        }
        let (page, index) = page_position(number);
        self.page(list_id, page)?
            .get(index)
            .cloned()
            .ok_or(RefError::OutOfRange(number))
    }

    /// Number of distinct pages fetched so far
    pub fn cached_pages(&self) -> usize {
        self.cache.len()
    }
}
