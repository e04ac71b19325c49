use clap::{Arg, ArgAction};

use super::joined;
use crate::cli::error::CliError;
use crate::cli::registry::{Command, Invocation};

pub struct RmListCmd;

impl Command for RmListCmd {
    fn name(&self) -> &'static str {
        "rmlist"
    }

    fn synopsis(&self) -> &'static str {
        "Delete a list"
    }

    fn usage(&self) -> &'static str {
        "rmlist [--force] <list-name>"
    }

    fn needs_auth(&self) -> bool {
        true
    }

    fn flags(&self) -> Vec<Arg> {
        vec![Arg::new("force")
            .long("force")
            .action(ArgAction::SetTrue)
            .help("Delete even if the list has open tasks")]
    }

    fn run(&self, inv: &mut Invocation<'_>, args: &[String]) -> Result<(), CliError> {
        let name = joined(args);
        let name = name.trim();
        if name.is_empty() {
            return Err(CliError::user("list name required"));
        }

        let source = inv.source()?;
        let list = source.resolve_list(inv.ctx, name)?;
        if list.is_default {
            return Err(CliError::user("cannot delete default list"));
        }
        if !inv.flags.get_flag("force") && source.has_open_tasks(inv.ctx, &list.id)? {
            return Err(CliError::user("list not empty (use --force)"));
        }

        source.delete_list(inv.ctx, &list.id)?;
        log::debug!("deleted list {} ({})", list.title, list.id);
        inv.ok()
    }
}
