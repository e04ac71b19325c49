use clap::Arg;

use super::list_flag;
use super::resolve::resolve_targets;
use crate::cli::error::CliError;
use crate::cli::registry::{Command, Invocation};

pub struct DoneCmd;

impl Command for DoneCmd {
    fn name(&self) -> &'static str {
        "done"
    }

    fn synopsis(&self) -> &'static str {
        "Mark tasks completed"
    }

    fn usage(&self) -> &'static str {
        "done [--list <list-name>] <ref>..."
    }

    fn needs_auth(&self) -> bool {
        true
    }

    fn flags(&self) -> Vec<Arg> {
        vec![list_flag()]
    }

    fn run(&self, inv: &mut Invocation<'_>, args: &[String]) -> Result<(), CliError> {
        let targets = resolve_targets(inv, args)?;
        let source = inv.source()?;
        for (list, task) in &targets {
            source.complete_task(inv.ctx, &list.id, &task.id)?;
            log::debug!("completed task {} in {}", task.id, list.id);
        }
        inv.ok()
    }
}
