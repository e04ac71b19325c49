use super::joined;
use crate::cli::error::CliError;
use crate::cli::registry::{Command, Invocation};
use crate::source::SourceError;

pub struct CreateListCmd;

impl Command for CreateListCmd {
    fn name(&self) -> &'static str {
        "createlist"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["addlist"]
    }

    fn synopsis(&self) -> &'static str {
        "Create a list"
    }

    fn usage(&self) -> &'static str {
        "createlist <list-name>"
    }

    fn needs_auth(&self) -> bool {
        true
    }

    fn run(&self, inv: &mut Invocation<'_>, args: &[String]) -> Result<(), CliError> {
        let name = joined(args);
        let name = name.trim();
        if name.is_empty() {
            return Err(CliError::user("list name required"));
        }

        let source = inv.source()?;
        match source.resolve_list(inv.ctx, name) {
            Ok(_) | Err(SourceError::AmbiguousList(_)) => {
                return Err(CliError::user(format!("list already exists: {}", name)));
            }
            Err(SourceError::ListNotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }

        let list = source.create_list(inv.ctx, name)?;
        log::debug!("created list {} ({})", list.title, list.id);
        inv.ok()
    }
}
