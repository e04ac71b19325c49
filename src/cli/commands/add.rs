use clap::Arg;

use super::{joined, list_flag, target_list};
use crate::cli::error::CliError;
use crate::cli::registry::{Command, Invocation};

pub struct AddCmd;

impl Command for AddCmd {
    fn name(&self) -> &'static str {
        "add"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["create"]
    }

    fn synopsis(&self) -> &'static str {
        "Create a task"
    }

    fn usage(&self) -> &'static str {
        "add [--list <list-name>] <title...>"
    }

    fn needs_auth(&self) -> bool {
        true
    }

    fn flags(&self) -> Vec<Arg> {
        vec![list_flag()]
    }

    fn run(&self, inv: &mut Invocation<'_>, args: &[String]) -> Result<(), CliError> {
        let title = joined(args);
        if title.trim().is_empty() {
            return Err(CliError::user("title required"));
        }

        let list = target_list(inv)?;
        let task = inv.source()?.create_task(inv.ctx, &list.id, &title)?;
        log::debug!("created task {} in {}", task.id, list.id);
        inv.ok()
    }
}
