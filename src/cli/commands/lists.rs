use crate::cli::error::CliError;
use crate::cli::output::format_list_name;
use crate::cli::registry::{Command, Invocation};

pub struct ListsCmd;

impl Command for ListsCmd {
    fn name(&self) -> &'static str {
        "lists"
    }

    fn synopsis(&self) -> &'static str {
        "Show every list"
    }

    fn usage(&self) -> &'static str {
        "lists"
    }

    fn needs_auth(&self) -> bool {
        true
    }

    fn run(&self, inv: &mut Invocation<'_>, _args: &[String]) -> Result<(), CliError> {
        let source = inv.source()?;
        for list in source.list_lists(inv.ctx)? {
            writeln!(inv.out, "{}", format_list_name(&list))?;
        }
        Ok(())
    }
}
