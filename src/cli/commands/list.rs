use clap::{value_parser, Arg};

use super::joined;
use crate::cli::error::CliError;
use crate::cli::output::{format_list_header, format_task, DisplayPos};
use crate::cli::registry::{Command, Invocation};
use crate::models::TaskList;
use crate::refs::{LetterCursor, TaskLocator};
use crate::source::{SourceError, PAGE_SIZE};

pub struct ListCmd;

impl Command for ListCmd {
    fn name(&self) -> &'static str {
        "list"
    }

    fn synopsis(&self) -> &'static str {
        "List open tasks (all lists, or one list by name)"
    }

    fn usage(&self) -> &'static str {
        "list [--page <n>] [<list-name>]"
    }

    fn needs_auth(&self) -> bool {
        true
    }

    fn flags(&self) -> Vec<Arg> {
        vec![Arg::new("page")
            .long("page")
            .value_name("n")
            .value_parser(value_parser!(i64))
            .help("Page of a named list to show (100 tasks per page)")]
    }

    fn run(&self, inv: &mut Invocation<'_>, args: &[String]) -> Result<(), CliError> {
        let page = inv.flags.get_one::<i64>("page").copied().unwrap_or(1);
        let page = u32::try_from(page)
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(|| CliError::user(format!("invalid page number: {}", page)))?;

        if args.is_empty() {
            list_all(inv)
        } else {
            list_one(inv, &joined(args), page)
        }
    }
}

/// Every list: the default list's first page flush, then one lettered section
/// per named list with open tasks
///
/// Output is streamed; if a later list fails to load, what was already
/// printed stays printed and the failure is reported after it.
fn list_all(inv: &mut Invocation<'_>) -> Result<(), CliError> {
    let source = inv.source()?;
    let ctx = inv.ctx;
    let mut locator = TaskLocator::new(source, ctx);
    let mut any = false;

    let default = source.default_list(ctx)?;
    for (i, task) in locator.page(&default.id, 1)?.iter().enumerate() {
        writeln!(inv.out, "{}", format_task(DisplayPos::Number(i as u64 + 1), task, false))?;
        any = true;
    }

    let lists = source.list_lists(ctx)?;
    let mut cursor = LetterCursor::new();
    for list in lists.iter().filter(|list| !list.is_default) {
        let tasks = locator
            .page(&list.id, 1)
            .map_err(|err| fetch_failed(list, err))?;
        if tasks.is_empty() {
            continue;
        }

        let letter = cursor.next_letter()?;
        writeln!(inv.out, "{}", format_list_header(list, false))?;
        for (i, task) in tasks.iter().enumerate() {
            let pos = DisplayPos::Lettered(letter, i as u64 + 1);
            writeln!(inv.out, "{}", format_task(pos, task, true))?;
        }
        any = true;
    }

    if !any {
        inv.say("no tasks found")?;
    }
    Ok(())
}

fn fetch_failed(list: &TaskList, err: SourceError) -> CliError {
    if err.is_auth() {
        return err.into();
    }
    CliError::FetchList {
        title: list.title.clone(),
        cause: err.to_string(),
    }
}

/// One page of one list, under its header, numbered from the page start
fn list_one(inv: &mut Invocation<'_>, name: &str, page: u32) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::user("list name required"));
    }

    let source = inv.source()?;
    let list = source.resolve_list(inv.ctx, name)?;
    let tasks = source.open_tasks_page(inv.ctx, &list.id, page)?;

    writeln!(inv.out, "{}", format_list_header(&list, true))?;
    let start = (u64::from(page) - 1) * PAGE_SIZE as u64 + 1;
    for (i, task) in tasks.iter().enumerate() {
        writeln!(inv.out, "{}", format_task(DisplayPos::Number(start + i as u64), task, true))?;
    }
    Ok(())
}
