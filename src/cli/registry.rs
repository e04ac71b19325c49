use std::collections::HashMap;
use std::io::Write;

use clap::{Arg, ArgMatches};
use thiserror::Error;

use crate::cli::error::CliError;
use crate::config::Config;
use crate::source::{Context, SourceError, TaskSource};

/// Everything a command body gets for one invocation
pub struct Invocation<'a> {
    pub config: &'a Config,
    /// Parsed values of the command's own flags (and the common ones)
    pub flags: &'a ArgMatches,
    pub ctx: &'a Context,
    /// Present exactly when the command needs auth
    pub source: Option<&'a dyn TaskSource>,
    pub registry: &'a Registry,
    pub out: &'a mut dyn Write,
}

impl<'a> Invocation<'a> {
    pub fn source(&self) -> Result<&'a dyn TaskSource, CliError> {
        self.source
            .ok_or_else(|| CliError::from(SourceError::NotLoggedIn))
    }

    /// Value of a string flag, if given
    pub fn flag_str(&self, id: &str) -> Option<&'a str> {
        self.flags.get_one::<String>(id).map(String::as_str)
    }

    /// Informational output, suppressed by `--quiet`
    pub fn say(&mut self, message: &str) -> Result<(), CliError> {
        if !self.config.quiet {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }

    pub fn ok(&mut self) -> Result<(), CliError> {
        self.say("ok")
    }
}

/// A named unit of behaviour the dispatcher can route to
pub trait Command {
    fn name(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// One-line description for help
    fn synopsis(&self) -> &'static str;

    /// Usage line for help, without the binary name
    fn usage(&self) -> &'static str;

    fn needs_auth(&self) -> bool;

    /// The command's own flags; common flags are added by the dispatcher
    fn flags(&self) -> Vec<Arg> {
        Vec::new()
    }

    fn run(&self, inv: &mut Invocation<'_>, args: &[String]) -> Result<(), CliError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate command name: {0}")]
    DuplicateName(&'static str),
    #[error("duplicate command alias: {0}")]
    DuplicateAlias(&'static str),
}

/// The commands known to the binary, keyed by name and by every alias
///
/// Built once at startup and only read afterwards.
#[derive(Default)]
pub struct Registry {
    commands: Vec<Box<dyn Command>>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command; nothing is registered if its name or any alias is taken
    pub fn register(&mut self, command: Box<dyn Command>) -> Result<(), RegistryError> {
        let name = command.name();
        if self.index.contains_key(name) {
            return Err(RegistryError::DuplicateName(name));
        }

        let aliases = command.aliases();
        for (i, alias) in aliases.iter().enumerate() {
            if *alias == name || self.index.contains_key(alias) || aliases[..i].contains(alias) {
                return Err(RegistryError::DuplicateAlias(*alias));
            }
        }

        let slot = self.commands.len();
        self.index.insert(name, slot);
        for &alias in aliases {
            self.index.insert(alias, slot);
        }
        self.commands.push(command);
        Ok(())
    }

    /// Exact, case-sensitive lookup by name or alias
    pub fn find(&self, token: &str) -> Option<&dyn Command> {
        self.index
            .get(token)
            .map(|&slot| self.commands[slot].as_ref())
    }

    /// Every command once, sorted by name
    pub fn all(&self) -> Vec<&dyn Command> {
        let mut commands: Vec<&dyn Command> = self.commands.iter().map(|c| c.as_ref()).collect();
        commands.sort_by_key(|c| c.name());
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        name: &'static str,
        aliases: &'static [&'static str],
    }

    impl Command for Stub {
        fn name(&self) -> &'static str {
            self.name
        }
        fn aliases(&self) -> &'static [&'static str] {
            self.aliases
        }
        fn synopsis(&self) -> &'static str {
            "stub"
        }
        fn usage(&self) -> &'static str {
            self.name
        }
        fn needs_auth(&self) -> bool {
            false
        }
        fn run(&self, _inv: &mut Invocation<'_>, _args: &[String]) -> Result<(), CliError> {
            Ok(())
        }
    }

    fn stub(name: &'static str, aliases: &'static [&'static str]) -> Box<dyn Command> {
        Box::new(Stub { name, aliases })
    }

    #[test]
    fn test_find_by_name_and_alias() {
        let mut registry = Registry::new();
        registry.register(stub("add", &["create"])).unwrap();
        registry.register(stub("list", &[])).unwrap();

        assert_eq!(registry.find("add").unwrap().name(), "add");
        assert_eq!(registry.find("create").unwrap().name(), "add");
        assert!(registry.find("Add").is_none());
        assert!(registry.find("ad").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = Registry::new();
        registry.register(stub("add", &["create"])).unwrap();
        assert_eq!(
            registry.register(stub("add", &[])),
            Err(RegistryError::DuplicateName("add"))
        );
        // a name may not shadow an existing alias either
        assert_eq!(
            registry.register(stub("create", &[])),
            Err(RegistryError::DuplicateName("create"))
        );
    }

    #[test]
    fn test_duplicate_alias_rejected_atomically() {
        let mut registry = Registry::new();
        registry.register(stub("add", &["create"])).unwrap();
        assert_eq!(
            registry.register(stub("new", &["fresh", "create"])),
            Err(RegistryError::DuplicateAlias("create"))
        );
        assert!(registry.find("new").is_none());
        assert!(registry.find("fresh").is_none());

        assert_eq!(
            registry.register(stub("rm", &["rm"])),
            Err(RegistryError::DuplicateAlias("rm"))
        );
        assert_eq!(
            registry.register(stub("del", &["x", "x"])),
            Err(RegistryError::DuplicateAlias("x"))
        );
    }

    #[test]
    fn test_all_is_sorted_and_deduplicated() {
        let mut registry = Registry::new();
        registry.register(stub("version", &[])).unwrap();
        registry.register(stub("add", &["create", "new"])).unwrap();
        registry.register(stub("list", &[])).unwrap();

        let names: Vec<&str> = registry.all().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["add", "list", "version"]);
    }
}
