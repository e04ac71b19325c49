use clap::Args;

use crate::cli::error::CliError;
use crate::cli::flags::CommonFlags;
use crate::cli::registry::{Command, Invocation, Registry};

pub struct HelpCmd;

impl Command for HelpCmd {
    fn name(&self) -> &'static str {
        "help"
    }

    fn synopsis(&self) -> &'static str {
        "Print usage"
    }

    fn usage(&self) -> &'static str {
        "help"
    }

    fn needs_auth(&self) -> bool {
        false
    }

    fn run(&self, inv: &mut Invocation<'_>, _args: &[String]) -> Result<(), CliError> {
        write!(inv.out, "{}", help_text(inv.registry))?;
        Ok(())
    }
}

/// Usage for every registered command, then the common flags
pub fn help_text(registry: &Registry) -> String {
    let mut text = String::from("Usage:\n");
    text.push_str(&format!("  {:<48} {}\n", "tasq", "List all open tasks"));

    for command in registry.all() {
        let usage = format!("tasq {}", command.usage());
        text.push_str(&format!("  {:<48} {}", usage, command.synopsis()));
        if !command.aliases().is_empty() {
            text.push_str(&format!(" (alias: {})", command.aliases().join(", ")));
        }
        text.push('\n');
    }

    text.push_str("\nCommon flags:\n");
    let common = CommonFlags::augment_args(clap::Command::new("tasq"));
    for arg in common.get_arguments() {
        let mut flag = format!("--{}", arg.get_long().unwrap_or_else(|| arg.get_id().as_str()));
        if let Some(names) = arg.get_value_names() {
            for name in names {
                flag.push_str(&format!(" <{}>", name));
            }
        }
        let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
        text.push_str(&format!("  {:<16} {}\n", flag, help));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::registry;

    #[test]
    fn test_help_lists_every_command() {
        let text = help_text(&registry().unwrap());
        for usage in [
            "tasq list [--page <n>] [<list-name>]",
            "tasq add [--list <list-name>] <title...>",
            "tasq done [--list <list-name>] <ref>...",
            "tasq rmlist [--force] <list-name>",
            "tasq version",
        ] {
            assert!(text.contains(usage), "missing {:?} in:\n{}", usage, text);
        }
        assert!(text.contains("(alias: create)"));
        assert!(text.contains("(alias: addlist)"));
    }

    #[test]
    fn test_help_lists_common_flags() {
        let text = help_text(&registry().unwrap());
        assert!(text.contains("--config <dir>"));
        assert!(text.contains("Override config directory"));
        assert!(text.contains("--quiet"));
        assert!(text.contains("--debug"));
    }
}
