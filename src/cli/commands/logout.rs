use crate::cli::error::CliError;
use crate::cli::registry::{Command, Invocation};
use crate::session::Session;

pub struct LogoutCmd;

impl Command for LogoutCmd {
    fn name(&self) -> &'static str {
        "logout"
    }

    fn synopsis(&self) -> &'static str {
        "End the session (the ledger is kept)"
    }

    fn usage(&self) -> &'static str {
        "logout"
    }

    fn needs_auth(&self) -> bool {
        false
    }

    fn run(&self, inv: &mut Invocation<'_>, _args: &[String]) -> Result<(), CliError> {
        let removed = Session::remove(&inv.config.session_path())
            .map_err(|err| CliError::Auth(format!("{:#}", err)))?;
        if removed {
            inv.ok()
        } else {
            inv.say("not logged in")
        }
    }
}
