// Flag parsing
//
// The grammar is ours: one left-to-right pass over the tokens after the
// command name; flags may interleave, and the first token that is not
// flag-shaped ends the flag region (everything after it is positional, even
// `-x`). `--` ends the region and is dropped, but the token right after it
// must not start with `-`. A lone `-` is an unknown flag.
// Flags take one or two dashes (`-quiet`, `--quiet`), single-letter shorts
// (`-l`), and inline values (`--list=Work`).
//
// clap supplies the schema (`Arg` definitions) and typed value parsing: the
// scan rewrites every recognised flag to `--long[=value]` and hands those to
// clap, so clap never sees a positional.

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgMatches, Args, FromArgMatches};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("flag needs an argument: {0}")]
    FlagNeedsArgument(String),
    #[error("invalid value \"{value}\" for flag {flag}")]
    InvalidFlagValue { flag: String, value: String },
    #[error("invalid flags: {0}")]
    Invalid(String),
}

/// Flags every command accepts
#[derive(Debug, Clone, Default, Args)]
pub struct CommonFlags {
    /// Override config directory
    #[arg(long, value_name = "dir")]
    pub config: Option<String>,
    /// Suppress informational output
    #[arg(long)]
    pub quiet: bool,
    /// Print debug logs to stderr
    #[arg(long)]
    pub debug: bool,
}

/// Result of parsing the tokens after a command name
#[derive(Debug)]
pub struct ParsedFlags {
    pub common: CommonFlags,
    pub matches: ArgMatches,
    pub positionals: Vec<String>,
}

/// The combined flag set for one invocation: common flags plus the command's own
pub struct FlagSet {
    schema: clap::Command,
}

impl FlagSet {
    pub fn new(command_name: &'static str, command_flags: Vec<Arg>) -> Self {
        let schema = clap::Command::new(command_name)
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true);
        let schema = CommonFlags::augment_args(schema).args(command_flags);
        Self { schema }
    }

    fn lookup(&self, name: &str, single_dash: bool) -> Option<&Arg> {
        let mut chars = name.chars();
        let short = match (chars.next(), chars.next()) {
            (Some(c), None) if single_dash => Some(c),
            _ => None,
        };
        self.schema.get_arguments().find(|arg| {
            arg.get_long() == Some(name) || (short.is_some() && arg.get_short() == short)
        })
    }

    pub fn parse(&self, tokens: &[String]) -> Result<ParsedFlags, FlagError> {
        // (long name, inline value) in the order given
        let mut given: Vec<(String, Option<String>)> = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            if token == "--" {
                i += 1;
                // a dash token right after `--` is still a flag attempt
                if let Some(next) = tokens.get(i).filter(|next| next.starts_with('-')) {
                    return Err(FlagError::UnknownFlag(next.clone()));
                }
                break;
            }
            if !token.starts_with('-') {
                break;
            }

            let (body, single_dash) = match token.strip_prefix("--") {
                Some(body) => (body, false),
                None => (&token[1..], true),
            };
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (body, None),
            };
            let typed = &token[..token.len() - inline.as_ref().map_or(0, |v| v.len() + 1)];

            let arg = self
                .lookup(name, single_dash)
                .ok_or_else(|| FlagError::UnknownFlag(typed.to_string()))?;
            let long = arg
                .get_long()
                .unwrap_or_else(|| arg.get_id().as_str())
                .to_string();

            if arg.get_action().takes_values() {
                let value = match inline {
                    Some(value) => value,
                    None => {
                        i += 1;
                        tokens
                            .get(i)
                            .cloned()
                            .ok_or_else(|| FlagError::FlagNeedsArgument(typed.to_string()))?
                    }
                };
                given.push((long, Some(value)));
            } else {
                match inline.as_deref() {
                    None | Some("true") | Some("1") => given.push((long, None)),
                    Some("false") | Some("0") => given.retain(|(name, _)| *name != long),
                    Some(other) => {
                        return Err(FlagError::InvalidFlagValue {
                            flag: typed.to_string(),
                            value: other.to_string(),
                        })
                    }
                }
            }
            i += 1;
        }

        let normalized: Vec<String> = given
            .into_iter()
            .map(|(long, value)| match value {
                Some(value) => format!("--{}={}", long, value),
                None => format!("--{}", long),
            })
            .collect();
        log::debug!("flags: {:?}", normalized);

        let matches = self
            .schema
            .clone()
            .try_get_matches_from(normalized)
            .map_err(clap_error)?;
        let common = CommonFlags::from_arg_matches(&matches).map_err(clap_error)?;

        Ok(ParsedFlags {
            common,
            matches,
            positionals: tokens[i..].to_vec(),
        })
    }
}

fn context_string(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind) {
        Some(ContextValue::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Reduce a clap error to a one-line flag error
fn clap_error(err: clap::Error) -> FlagError {
    let flag = context_string(&err, ContextKind::InvalidArg);
    let value = context_string(&err, ContextKind::InvalidValue);
    match (err.kind(), flag, value) {
        (ErrorKind::InvalidValue | ErrorKind::ValueValidation, Some(flag), Some(value)) => {
            // clap reports the arg as `--page <n>`
            let flag = flag.split_whitespace().next().unwrap_or_default().to_string();
            FlagError::InvalidFlagValue { flag, value }
        }
        (kind, _, _) => FlagError::Invalid(kind.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ArgAction;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn list_flags() -> FlagSet {
        FlagSet::new(
            "test",
            vec![
                Arg::new("list").long("list").short('l').value_name("name"),
                Arg::new("force").long("force").action(ArgAction::SetTrue),
                Arg::new("page")
                    .long("page")
                    .value_name("n")
                    .value_parser(clap::value_parser!(i64)),
            ],
        )
    }

    #[test]
    fn test_flags_then_positionals() {
        let parsed = list_flags()
            .parse(&tokens(&["--quiet", "--list", "Work", "a1", "--force"]))
            .unwrap();
        assert!(parsed.common.quiet);
        assert!(!parsed.common.debug);
        assert_eq!(parsed.matches.get_one::<String>("list").unwrap(), "Work");
        assert!(!parsed.matches.get_flag("force"));
        assert_eq!(parsed.positionals, tokens(&["a1", "--force"]));
    }

    #[test]
    fn test_single_dash_short_and_inline_forms() {
        let parsed = list_flags()
            .parse(&tokens(&["-debug", "-l", "Home", "--config=/tmp/x", "--page=3", "7"]))
            .unwrap();
        assert!(parsed.common.debug);
        assert_eq!(parsed.common.config.as_deref(), Some("/tmp/x"));
        assert_eq!(parsed.matches.get_one::<String>("list").unwrap(), "Home");
        assert_eq!(*parsed.matches.get_one::<i64>("page").unwrap(), 3);
        assert_eq!(parsed.positionals, tokens(&["7"]));
    }

    #[test]
    fn test_double_dash_ends_flags() {
        let parsed = list_flags()
            .parse(&tokens(&["--force", "--", "milk", "--quiet"]))
            .unwrap();
        assert!(parsed.matches.get_flag("force"));
        assert!(!parsed.common.quiet);
        assert_eq!(parsed.positionals, tokens(&["milk", "--quiet"]));
    }

    #[test]
    fn test_dash_token_after_double_dash_is_unknown() {
        let err = list_flags().parse(&tokens(&["--", "-x"])).unwrap_err();
        assert!(matches!(&err, FlagError::UnknownFlag(flag) if flag == "-x"));
        assert_eq!(err.to_string(), "unknown flag: -x");
    }

    #[test]
    fn test_lone_dash_is_unknown() {
        let err = list_flags().parse(&tokens(&["-", "x"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown flag: -");
    }

    #[test]
    fn test_unknown_flag_reported_as_typed() {
        let err = list_flags().parse(&tokens(&["--bogus=1", "x"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown flag: --bogus");

        // a short is only a short with a single dash
        let err = list_flags().parse(&tokens(&["--l", "Work"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown flag: --l");
    }

    #[test]
    fn test_value_flag_without_value() {
        let err = list_flags().parse(&tokens(&["--list"])).unwrap_err();
        assert_eq!(err.to_string(), "flag needs an argument: --list");
    }

    #[test]
    fn test_value_flag_takes_dash_token() {
        let parsed = list_flags().parse(&tokens(&["--list", "-odd", "1"])).unwrap();
        assert_eq!(parsed.matches.get_one::<String>("list").unwrap(), "-odd");
        assert_eq!(parsed.positionals, tokens(&["1"]));
    }

    #[test]
    fn test_switch_inline_values() {
        let flags = list_flags();
        assert!(flags.parse(&tokens(&["--quiet=true"])).unwrap().common.quiet);
        assert!(!flags.parse(&tokens(&["--quiet", "--quiet=0"])).unwrap().common.quiet);

        let err = flags.parse(&tokens(&["--quiet=maybe"])).unwrap_err();
        assert!(matches!(err, FlagError::InvalidFlagValue { .. }));
    }

    #[test]
    fn test_typed_value_rejected() {
        let err = list_flags().parse(&tokens(&["--page", "two"])).unwrap_err();
        match err {
            FlagError::InvalidFlagValue { flag, value } => {
                assert_eq!(flag, "--page");
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_repeated_value_flag_last_wins() {
        let parsed = list_flags()
            .parse(&tokens(&["--list", "A", "--list", "B"]))
            .unwrap();
        assert_eq!(parsed.matches.get_one::<String>("list").unwrap(), "B");
    }

    #[test]
    fn test_no_tokens() {
        let parsed = list_flags().parse(&[]).unwrap();
        assert!(parsed.positionals.is_empty());
        assert!(parsed.common.config.is_none());
    }
}
