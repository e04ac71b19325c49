use crate::cli::error::CliError;
use crate::cli::registry::{Command, Invocation};

pub struct VersionCmd;

impl Command for VersionCmd {
    fn name(&self) -> &'static str {
        "version"
    }

    fn synopsis(&self) -> &'static str {
        "Print version"
    }

    fn usage(&self) -> &'static str {
        "version"
    }

    fn needs_auth(&self) -> bool {
        false
    }

    fn run(&self, inv: &mut Invocation<'_>, _args: &[String]) -> Result<(), CliError> {
        writeln!(inv.out, "tasq {}", env!("CARGO_PKG_VERSION"))?;
        Ok(())
    }
}
