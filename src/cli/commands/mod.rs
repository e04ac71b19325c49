//! Built-in commands
//!
//! Each command is a unit struct implementing [`Command`]; [`registry`]
//! collects them into the table the dispatcher routes through.

mod add;
mod createlist;
mod done;
mod help;
mod list;
mod lists;
mod login;
mod logout;
mod resolve;
mod rm;
mod rmlist;
mod version;

pub use add::AddCmd;
pub use createlist::CreateListCmd;
pub use done::DoneCmd;
pub use help::HelpCmd;
pub use list::ListCmd;
pub use lists::ListsCmd;
pub use login::LoginCmd;
pub use logout::LogoutCmd;
pub use rm::RmCmd;
pub use rmlist::RmListCmd;
pub use version::VersionCmd;

use clap::Arg;

use crate::cli::error::CliError;
use crate::cli::registry::{Command, Invocation, Registry, RegistryError};
use crate::models::TaskList;

/// Name of the command run when no arguments are given
pub const DEFAULT_COMMAND: &str = "list";

/// The registry of every built-in command
pub fn registry() -> Result<Registry, RegistryError> {
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(ListCmd),
        Box::new(ListsCmd),
        Box::new(AddCmd),
        Box::new(DoneCmd),
        Box::new(RmCmd),
        Box::new(CreateListCmd),
        Box::new(RmListCmd),
        Box::new(LoginCmd),
        Box::new(LogoutCmd),
        Box::new(HelpCmd),
        Box::new(VersionCmd),
    ];

    let mut registry = Registry::new();
    for command in commands {
        registry.register(command)?;
    }
    Ok(registry)
}

/// `--list/-l <name>`, shared by the task commands
fn list_flag() -> Arg {
    Arg::new("list")
        .long("list")
        .short('l')
        .value_name("list-name")
        .help("Target list (default: the default list)")
}

/// Positional words joined into one name or title
fn joined(args: &[String]) -> String {
    args.join(" ")
}

/// The list named by `--list`, or the default list
fn target_list(inv: &Invocation<'_>) -> Result<TaskList, CliError> {
    let source = inv.source()?;
    let list = match inv.flag_str("list") {
        Some(name) => source.resolve_list(inv.ctx, name)?,
        None => source.default_list(inv.ctx)?,
    };
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = registry().unwrap();
        assert_eq!(registry.find("create").unwrap().name(), "add");
        assert_eq!(registry.find("addlist").unwrap().name(), "createlist");
        assert!(registry.find(DEFAULT_COMMAND).is_some());

        let names: Vec<&str> = registry.all().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "add",
                "createlist",
                "done",
                "help",
                "list",
                "lists",
                "login",
                "logout",
                "rm",
                "rmlist",
                "version"
            ]
        );
    }

    #[test]
    fn test_auth_requirements() {
        let registry = registry().unwrap();
        for name in ["list", "lists", "add", "done", "rm", "createlist", "rmlist"] {
            assert!(registry.find(name).unwrap().needs_auth(), "{} needs auth", name);
        }
        for name in ["login", "logout", "help", "version"] {
            assert!(!registry.find(name).unwrap().needs_auth(), "{} needs no auth", name);
        }
    }
}
