use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Context, SourceError, SourceFactory, TaskSource, PAGE_SIZE};
use crate::config::Config;
use crate::db::DEFAULT_LIST_TITLE;
use crate::models::{Task, TaskList, TaskStatus};

/// Id of the default list in a fresh [`MemorySource`]
pub const DEFAULT_LIST_ID: &str = "@default";

/// Operations that can be made to fail with [`MemorySource::fail`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    DefaultList,
    ListLists,
    CreateList,
    DeleteList,
    HasOpenTasks,
    CreateTask,
    CompleteTask,
    DeleteTask,
}

struct MemoryList {
    list: TaskList,
    tasks: Vec<Task>,
}

#[derive(Default)]
struct State {
    lists: Vec<MemoryList>,
    failures: HashMap<Op, String>,
    page_failures: HashMap<String, String>,
    page_fetches: HashMap<(String, u32), usize>,
}

impl State {
    fn list(&self, list_id: &str) -> Result<&MemoryList, SourceError> {
        self.lists
            .iter()
            .find(|entry| entry.list.id == list_id)
            .ok_or_else(|| SourceError::ListNotFound(list_id.to_string()))
    }

    fn list_mut(&mut self, list_id: &str) -> Result<&mut MemoryList, SourceError> {
        self.lists
            .iter_mut()
            .find(|entry| entry.list.id == list_id)
            .ok_or_else(|| SourceError::ListNotFound(list_id.to_string()))
    }

    fn check(&self, op: Op) -> Result<(), SourceError> {
        match self.failures.get(&op) {
            Some(message) => Err(SourceError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

/// In-memory task source
///
/// Cloning shares the underlying state, so a test can hand one clone to the
/// dispatcher (through [`MemorySource::factory`]) and inspect another.
#[derive(Clone)]
pub struct MemorySource {
    state: Arc<Mutex<State>>,
}

impl MemorySource {
    /// A source holding only the default list "My Tasks"
    pub fn new() -> Self {
        let mut state = State::default();
        state.lists.push(MemoryList {
            list: TaskList {
                id: DEFAULT_LIST_ID.to_string(),
                title: DEFAULT_LIST_TITLE.to_string(),
                is_default: true,
            },
            tasks: Vec::new(),
        });
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn add_list(&self, id: &str, title: &str) {
        self.state().lists.push(MemoryList {
            list: TaskList {
                id: id.to_string(),
                title: title.to_string(),
                is_default: false,
            },
            tasks: Vec::new(),
        });
    }

    /// Append an open task; panics if the list does not exist
    pub fn add_task(&self, list_id: &str, task_id: &str, title: &str) {
        let mut state = self.state();
        let entry = state
            .list_mut(list_id)
            .unwrap_or_else(|_| panic!("no such list: {}", list_id));
        entry.tasks.push(Task {
            id: task_id.to_string(),
            title: title.to_string(),
            status: TaskStatus::Open,
        });
    }

    /// Make every later call of `op` fail with a backend error
    pub fn fail(&self, op: Op, message: &str) {
        self.state().failures.insert(op, message.to_string());
    }

    /// Make page fetches for one list fail with a backend error
    pub fn fail_pages(&self, list_id: &str, message: &str) {
        self.state()
            .page_failures
            .insert(list_id.to_string(), message.to_string());
    }

    /// Titles of the open tasks in a list, in order
    pub fn open_titles(&self, list_id: &str) -> Vec<String> {
        let state = self.state();
        state
            .list(list_id)
            .map(|entry| {
                entry
                    .tasks
                    .iter()
                    .filter(|task| task.status.is_open())
                    .map(|task| task.title.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Titles of every list, in order
    pub fn list_titles(&self) -> Vec<String> {
        self.state()
            .lists
            .iter()
            .map(|entry| entry.list.title.clone())
            .collect()
    }

    /// How many times a given page of a list has been fetched
    pub fn page_fetches(&self, list_id: &str, page: u32) -> usize {
        self.state()
            .page_fetches
            .get(&(list_id.to_string(), page))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_page_fetches(&self) -> usize {
        self.state().page_fetches.values().sum()
    }

    /// A factory that hands out clones of this source
    pub fn factory(&self) -> MemoryFactory {
        MemoryFactory {
            source: self.clone(),
        }
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskSource for MemorySource {
    fn default_list(&self, ctx: &Context) -> Result<TaskList, SourceError> {
        ctx.check()?;
        let state = self.state();
        state.check(Op::DefaultList)?;
        state
            .lists
            .iter()
            .find(|entry| entry.list.is_default)
            .map(|entry| entry.list.clone())
            .ok_or_else(|| SourceError::Unavailable("no default list".to_string()))
    }

    fn list_lists(&self, ctx: &Context) -> Result<Vec<TaskList>, SourceError> {
        ctx.check()?;
        let state = self.state();
        state.check(Op::ListLists)?;
        Ok(state.lists.iter().map(|entry| entry.list.clone()).collect())
    }

    fn create_list(&self, ctx: &Context, title: &str) -> Result<TaskList, SourceError> {
        ctx.check()?;
        let mut state = self.state();
        state.check(Op::CreateList)?;
        let list = TaskList::new(title.to_string());
        state.lists.push(MemoryList {
            list: list.clone(),
            tasks: Vec::new(),
        });
        Ok(list)
    }

    fn delete_list(&self, ctx: &Context, list_id: &str) -> Result<(), SourceError> {
        ctx.check()?;
        let mut state = self.state();
        state.check(Op::DeleteList)?;
        let before = state.lists.len();
        state.lists.retain(|entry| entry.list.id != list_id);
        if state.lists.len() == before {
            return Err(SourceError::ListNotFound(list_id.to_string()));
        }
        Ok(())
    }

    fn open_tasks_page(
        &self,
        ctx: &Context,
        list_id: &str,
        page: u32,
    ) -> Result<Vec<Task>, SourceError> {
        ctx.check()?;
        let mut state = self.state();
        *state
            .page_fetches
            .entry((list_id.to_string(), page))
            .or_insert(0) += 1;
        if let Some(message) = state.page_failures.get(list_id) {
            return Err(SourceError::Unavailable(message.clone()));
        }
        let entry = state.list(list_id)?;
        let start = (page.max(1) as usize - 1) * PAGE_SIZE;
        Ok(entry
            .tasks
            .iter()
            .filter(|task| task.status.is_open())
            .skip(start)
            .take(PAGE_SIZE)
            .cloned()
            .collect())
    }

    fn has_open_tasks(&self, ctx: &Context, list_id: &str) -> Result<bool, SourceError> {
        ctx.check()?;
        let state = self.state();
        state.check(Op::HasOpenTasks)?;
        Ok(state
            .list(list_id)?
            .tasks
            .iter()
            .any(|task| task.status.is_open()))
    }

    fn create_task(&self, ctx: &Context, list_id: &str, title: &str) -> Result<Task, SourceError> {
        ctx.check()?;
        let mut state = self.state();
        state.check(Op::CreateTask)?;
        let task = Task::new(title.to_string());
        state.list_mut(list_id)?.tasks.push(task.clone());
        Ok(task)
    }

    fn complete_task(
        &self,
        ctx: &Context,
        list_id: &str,
        task_id: &str,
    ) -> Result<(), SourceError> {
        ctx.check()?;
        let mut state = self.state();
        state.check(Op::CompleteTask)?;
        set_status(&mut state, list_id, task_id, TaskStatus::Completed)
    }

    fn delete_task(&self, ctx: &Context, list_id: &str, task_id: &str) -> Result<(), SourceError> {
        ctx.check()?;
        let mut state = self.state();
        state.check(Op::DeleteTask)?;
        set_status(&mut state, list_id, task_id, TaskStatus::Deleted)
    }
}

fn set_status(
    state: &mut State,
    list_id: &str,
    task_id: &str,
    status: TaskStatus,
) -> Result<(), SourceError> {
    let task = state
        .list_mut(list_id)?
        .tasks
        .iter_mut()
        .find(|task| task.id == task_id && task.status.is_open())
        .ok_or_else(|| SourceError::TaskNotFound(task_id.to_string()))?;
    task.status = status;
    Ok(())
}

/// [`SourceFactory`] handing out a shared [`MemorySource`]
pub struct MemoryFactory {
    source: MemorySource,
}

impl SourceFactory for MemoryFactory {
    fn open(&self, _config: &Config, ctx: &Context) -> Result<Box<dyn TaskSource>, SourceError> {
        ctx.check()?;
        Ok(Box::new(self.source.clone()))
    }
}

/// A factory that always fails, for exercising the auth gate
pub struct FailingFactory {
    make_error: fn() -> SourceError,
}

impl FailingFactory {
    pub fn new(make_error: fn() -> SourceError) -> Self {
        Self { make_error }
    }
}

impl SourceFactory for FailingFactory {
    fn open(&self, _config: &Config, _ctx: &Context) -> Result<Box<dyn TaskSource>, SourceError> {
        Err((self.make_error)())
    }
}
