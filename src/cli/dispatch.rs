use std::io::Write;

use crate::cli::commands::DEFAULT_COMMAND;
use crate::cli::error::{CliError, EXIT_SUCCESS};
use crate::cli::flags::FlagSet;
use crate::cli::logging;
use crate::cli::registry::{Command, Invocation, Registry};
use crate::config::Config;
use crate::source::{Context, SourceFactory};

/// Routes one command line to a command
///
/// Grammar: `tasq [<command> [flags...] [args...]]`. Flags are only accepted
/// after the command name. Commands that need the task source get one from
/// the factory before their body runs; if that fails the body never runs.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    factory: Box<dyn SourceFactory + 'a>,
    default_command: &'static str,
    config_dir: Option<String>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, factory: Box<dyn SourceFactory + 'a>) -> Self {
        Self {
            registry,
            factory,
            default_command: DEFAULT_COMMAND,
            config_dir: None,
        }
    }

    /// Command run when no arguments are given
    pub fn with_default_command(mut self, name: &'static str) -> Self {
        self.default_command = name;
        self
    }

    /// Config directory used when `--config` is not given, instead of the
    /// platform default
    pub fn with_config_dir(mut self, dir: impl Into<String>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Run one invocation and return its exit code
    ///
    /// Failures are written to `err` as a single `error: ...` line.
    pub fn run(
        &self,
        ctx: &Context,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> i32 {
        match self.dispatch(ctx, args, out) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                log::debug!("command failed: {:?}", e);
                let message = e.to_string().replace(['\r', '\n'], " ");
                let _ = writeln!(err, "error: {}", message);
                e.exit_code()
            }
        }
    }

    fn select<'s>(&self, args: &'s [String]) -> Result<(&'a dyn Command, &'s [String]), CliError> {
        let Some((first, rest)) = args.split_first() else {
            let command = self
                .registry
                .find(self.default_command)
                .ok_or_else(|| CliError::UnknownCommand(self.default_command.to_string()))?;
            return Ok((command, &[]));
        };

        if first.starts_with('-') {
            return Err(CliError::UnknownCommand(first.clone()));
        }
        let command = self
            .registry
            .find(first)
            .ok_or_else(|| CliError::UnknownCommand(first.clone()))?;
        Ok((command, rest))
    }

    fn dispatch(&self, ctx: &Context, args: &[String], out: &mut dyn Write) -> Result<(), CliError> {
        let (command, rest) = self.select(args)?;

        let flags = FlagSet::new(command.name(), command.flags());
        let parsed = flags.parse(rest)?;

        let dir = parsed.common.config.as_deref().or(self.config_dir.as_deref());
        let mut config = Config::load(dir)?;
        config.quiet = parsed.common.quiet;
        config.debug = parsed.common.debug;
        if config.debug {
            logging::enable_debug();
        }
        log::debug!(
            "command {} args {:?} config {}",
            command.name(),
            parsed.positionals,
            config.dir.display()
        );

        let ctx = ctx.with_timeout(config.timeout);
        let source = if command.needs_auth() {
            Some(self.factory.open(&config, &ctx)?)
        } else {
            None
        };

        let mut inv = Invocation {
            config: &config,
            flags: &parsed.matches,
            ctx: &ctx,
            source: source.as_deref(),
            registry: self.registry,
            out,
        };
        command.run(&mut inv, &parsed.positionals)
    }
}
