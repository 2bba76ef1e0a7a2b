//! Which options were typed on the command line.
//!
//! A parsed option carrying a value does not mean the user supplied it: a
//! `[default: x]` declaration fills it as well. The environment overlay
//! needs the difference, so each level scans the tokens it consumed for the
//! spellings of its options.

use std::collections::HashSet;

use crate::options::{OptionValue, ParsedOptions};

/// Whether `key` names an option (as opposed to a positional or command).
pub fn is_option_key(key: &str) -> bool {
    key.len() > 1 && key.starts_with('-')
}

struct OptionSpelling<'a> {
    key: &'a str,
    spellings: Vec<String>,
    takes_arg: bool,
}

impl OptionSpelling<'_> {
    fn has(&self, spelling: &str) -> bool {
        self.spellings.iter().any(|s| s == spelling)
    }

    fn has_long_prefix(&self, prefix: &str) -> bool {
        self.spellings
            .iter()
            .any(|s| s.starts_with("--") && s.starts_with(prefix))
    }
}

/// Spellings declared on each option description line of `usage`.
///
/// `  -o FILE, --output=FILE  Where to write.` yields `["-o", "--output"]`.
fn described_spellings(usage: &str) -> Vec<Vec<String>> {
    usage
        .lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with('-'))
        .map(|line| {
            let head = line
                .split("  ")
                .next()
                .unwrap_or(line)
                .split('\t')
                .next()
                .unwrap_or(line);
            head.split([',', ' ', '='])
                .filter(|part| is_option_key(part))
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|spellings| !spellings.is_empty())
        .collect()
}

/// Long option `name` as docopt would resolve it: an exact spelling first,
/// then the single option it abbreviates.
fn find_long<'s, 'a>(specs: &'s [OptionSpelling<'a>], name: &str) -> Option<&'s OptionSpelling<'a>> {
    if let Some(exact) = specs.iter().find(|spec| spec.has(name)) {
        return Some(exact);
    }
    let mut candidates = specs.iter().filter(|spec| spec.has_long_prefix(name));
    let first = candidates.next()?;
    candidates.next().is_none().then_some(first)
}

/// Keys of the options in `parsed` that appear in `tokens`.
///
/// `usage` supplies the aliases of each option; an option missing from its
/// description lines is only known by its key. Option arguments are
/// skipped, and scanning stops at `--`.
pub fn explicit_options(usage: &str, parsed: &ParsedOptions, tokens: &[String]) -> HashSet<String> {
    let described = described_spellings(usage);
    let specs: Vec<OptionSpelling<'_>> = parsed
        .iter()
        .filter(|(key, _)| is_option_key(key))
        .map(|(key, value)| OptionSpelling {
            key,
            spellings: described
                .iter()
                .find(|spellings| spellings.iter().any(|s| s == key))
                .cloned()
                .unwrap_or_else(|| vec![key.clone()]),
            takes_arg: matches!(value, OptionValue::Text(_) | OptionValue::List(_)),
        })
        .collect();

    let mut explicit = HashSet::new();
    let mut tokens = tokens.iter();
    while let Some(token) = tokens.next() {
        if token == "--" {
            break;
        }
        if let Some(long) = token.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            if let Some(spec) = find_long(&specs, &format!("--{name}")) {
                explicit.insert(spec.key.to_string());
                if spec.takes_arg && !inline {
                    tokens.next();
                }
            }
        } else if let Some(cluster) = token.strip_prefix('-') {
            for (at, c) in cluster.char_indices() {
                let Some(spec) = specs.iter().find(|spec| spec.has(&format!("-{c}"))) else {
                    continue;
                };
                explicit.insert(spec.key.to_string());
                if spec.takes_arg {
                    // The rest of the cluster, or the next token, is the argument.
                    if at + c.len_utf8() == cluster.len() {
                        tokens.next();
                    }
                    break;
                }
            }
        }
    }
    explicit
}
