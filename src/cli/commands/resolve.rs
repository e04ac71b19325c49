// Resolution of task references for the mutating commands
//
// Every reference is resolved against one snapshot before anything changes,
// so completing `1 2` removes the first and second tasks as listed, not the
// first and (shifted) third.

use std::collections::HashSet;

use crate::cli::error::CliError;
use crate::cli::registry::Invocation;
use crate::models::{Task, TaskList};
use crate::refs::{assign_letters, parse_task_refs, ListLetters, RefError, TaskLocator};

use super::target_list;

/// The distinct `(list, task)` pairs named by `args`, in reference order
pub(super) fn resolve_targets(
    inv: &Invocation<'_>,
    args: &[String],
) -> Result<Vec<(TaskList, Task)>, CliError> {
    let refs = parse_task_refs(args)?;
    let lettered = refs.iter().any(|r| r.has_letter());
    let numeric = refs.iter().any(|r| !r.has_letter());

    if lettered && inv.flag_str("list").is_some() {
        return Err(CliError::user("cannot use both --list and list letter"));
    }

    let source = inv.source()?;
    let ctx = inv.ctx;

    let numeric_list = if numeric { Some(target_list(inv)?) } else { None };
    let letters = if lettered {
        let lists = source.list_lists(ctx)?;
        assign_letters(&lists, |list| source.has_open_tasks(ctx, &list.id))?
    } else {
        ListLetters::default()
    };

    let mut locator = TaskLocator::new(source, ctx);
    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for task_ref in refs {
        let list = match task_ref.letter {
            Some(letter) => letters.get(letter)?,
            None => numeric_list.as_ref().ok_or(RefError::ReferenceRequired)?,
        };
        let task = locator.locate(&list.id, task_ref.number)?;
        log::debug!("{} -> task {} in list {}", task_ref, task.id, list.id);
        if seen.insert((list.id.clone(), task.id.clone())) {
            targets.push((list.clone(), task));
        }
    }

    Ok(targets)
}
