//! Usage grammar parsing.
//!
//! The dispatcher never interprets usage texts itself. It hands them to a
//! [`UsageParser`] together with the remaining argument tokens and gets back
//! a [`ParsedOptions`] map or a [`GrammarError`]. [`DocoptParser`] is the
//! stock implementation backed by the `docopt` crate.

use thiserror::Error;
use tracing::trace;

use crate::options::{OptionValue, ParsedOptions};

/// Errors reported by a usage parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The arguments do not conform to the usage text.
    #[error("arguments do not match usage: {0}")]
    Mismatch(String),

    /// The usage text itself is not a valid grammar.
    #[error("invalid usage grammar: {0}")]
    Invalid(String),
}

/// Settings applied to a single parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSettings {
    /// Once a non-option token appears, treat every later token as
    /// positional instead of re-reading it as an option.
    pub options_first: bool,

    /// Placeholder passed as `argv[0]`; tokens never include it.
    pub program_name: String,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            options_first: true,
            program_name: "prog".to_string(),
        }
    }
}

impl ParseSettings {
    pub fn options_first(mut self, yes: bool) -> Self {
        self.options_first = yes;
        self
    }
}

/// Parses argument tokens against a usage text.
pub trait UsageParser: Send + Sync {
    fn parse(
        &self,
        usage: &str,
        args: &[String],
        settings: &ParseSettings,
    ) -> Result<ParsedOptions, GrammarError>;
}

/// [`UsageParser`] backed by the `docopt` crate.
///
/// Built-in `--help` and `--version` handling is disabled; the dispatcher
/// decides what a help request means at each level.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocoptParser;

impl UsageParser for DocoptParser {
    fn parse(
        &self,
        usage: &str,
        args: &[String],
        settings: &ParseSettings,
    ) -> Result<ParsedOptions, GrammarError> {
        let parser =
            docopt::Docopt::new(usage).map_err(|e| GrammarError::Invalid(e.to_string()))?;

        let argv = std::iter::once(settings.program_name.as_str())
            .chain(args.iter().map(String::as_str));

        let matched = parser
            .argv(argv)
            .options_first(settings.options_first)
            .help(false)
            .parse()
            .map_err(|e| GrammarError::Mismatch(e.to_string()))?;

        let mut entries: Vec<(String, OptionValue)> = matched
            .map
            .iter()
            .map(|(key, value)| (key.clone(), convert_value(value)))
            .collect();
        // docopt keeps its matches in a hash map; sort for a stable order.
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        trace!(tokens = args.len(), keys = entries.len(), "usage matched");
        Ok(entries.into_iter().collect())
    }
}

fn convert_value(value: &docopt::Value) -> OptionValue {
    match value {
        docopt::Value::Switch(flag) => OptionValue::Flag(*flag),
        docopt::Value::Counted(count) => OptionValue::Count(*count),
        docopt::Value::Plain(text) => OptionValue::Text(text.clone()),
        docopt::Value::List(items) => OptionValue::List(items.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const USAGE: &str = "
Usage:
  app [options] [COMMAND] [ARGS...]

Options:
  -h, --help     Show this screen.
  -v, --verbose  Be verbose.
  --env=<name>   Target environment.
";

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn parse(tokens: &[&str]) -> Result<ParsedOptions, GrammarError> {
        DocoptParser.parse(USAGE, &argv(tokens), &ParseSettings::default())
    }

    #[test]
    fn test_options_then_command() {
        let parsed = parse(&["-v", "--env=prod", "build", "--fast", "x"]).unwrap();
        assert!(parsed.get_bool("--verbose"));
        assert_eq!(parsed.get_str("--env"), Some("prod"));
        assert_eq!(parsed.command(), "build");
        assert_eq!(parsed.args(), &argv(&["--fast", "x"])[..]);
    }

    #[test]
    fn test_options_first_keeps_late_flags_positional() {
        let parsed = parse(&["build", "-v"]).unwrap();
        assert!(!parsed.get_bool("--verbose"));
        assert_eq!(parsed.args(), &argv(&["-v"])[..]);
    }

    #[test]
    fn test_unset_values() {
        let parsed = parse(&[]).unwrap();
        assert_eq!(parsed.get(crate::COMMAND_KEY), Some(&OptionValue::Text(None)));
        assert_eq!(parsed.get(crate::ARGS_KEY), Some(&OptionValue::List(vec![])));
        assert_eq!(parsed.get("--env"), Some(&OptionValue::Text(None)));
        assert_eq!(parsed.get("--help"), Some(&OptionValue::Flag(false)));
    }

    #[test]
    fn test_help_switch_is_reported_not_handled() {
        let parsed = parse(&["--help"]).unwrap();
        assert!(parsed.get_bool("--help"));
    }

    #[test]
    fn test_unknown_option_is_mismatch() {
        let err = parse(&["--bogus"]).unwrap_err();
        assert!(matches!(err, GrammarError::Mismatch(_)));
    }

    #[test]
    fn test_invalid_grammar() {
        let err = DocoptParser
            .parse("no grammar here", &[], &ParseSettings::default())
            .unwrap_err();
        assert!(matches!(err, GrammarError::Invalid(_)));
    }

    #[test]
    fn test_keys_are_sorted() {
        let parsed = parse(&["build"]).unwrap();
        let keys: Vec<_> = parsed.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
