use crate::cli::error::CliError;
use crate::cli::registry::{Command, Invocation};
use crate::session::Session;
use crate::source::ledger::LedgerSource;

pub struct LoginCmd;

impl Command for LoginCmd {
    fn name(&self) -> &'static str {
        "login"
    }

    fn synopsis(&self) -> &'static str {
        "Create the local ledger and start a session"
    }

    fn usage(&self) -> &'static str {
        "login"
    }

    fn needs_auth(&self) -> bool {
        false
    }

    fn run(&self, inv: &mut Invocation<'_>, _args: &[String]) -> Result<(), CliError> {
        match Session::require(inv.config) {
            Ok(session) => {
                log::debug!("session {} already active", session.id);
                return inv.say("already logged in");
            }
            Err(err) if err.is_auth() => log::debug!("starting new session: {}", err),
            Err(err) => return Err(err.into()),
        }

        let ledger = &inv.config.ledger_path;
        LedgerSource::create(ledger, inv.ctx)?;
        Session::new(ledger.clone())
            .save(&inv.config.session_path())
            .map_err(|err| CliError::Auth(format!("{:#}", err)))?;
        inv.ok()
    }
}
