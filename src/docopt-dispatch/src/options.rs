//! Parsed option values and the accumulator merged across dispatch levels.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved key holding the subcommand resolved at the current level.
pub const COMMAND_KEY: &str = "COMMAND";

/// Reserved key holding the tokens left unconsumed at the current level.
pub const ARGS_KEY: &str = "ARGS";

/// A single value produced by a usage grammar.
///
/// The shape follows the grammar declaration: switches and literal
/// subcommands are flags, repeatable switches are counts, options with an
/// argument and single positionals are text, repeated positionals are lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Count(u64),
    Text(Option<String>),
    List(Vec<String>),
}

impl OptionValue {
    /// Whether the value was actually supplied rather than left in the
    /// grammar's unset state.
    pub fn is_set(&self) -> bool {
        match self {
            OptionValue::Flag(flag) => *flag,
            OptionValue::Count(count) => *count > 0,
            OptionValue::Text(text) => text.is_some(),
            OptionValue::List(items) => !items.is_empty(),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            OptionValue::Flag(flag) => *flag,
            OptionValue::Count(count) => *count > 0,
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(text) => text.as_deref(),
            _ => None,
        }
    }

    pub fn as_count(&self) -> u64 {
        match self {
            OptionValue::Count(count) => *count,
            OptionValue::Flag(flag) => u64::from(*flag),
            _ => 0,
        }
    }

    pub fn as_list(&self) -> &[String] {
        match self {
            OptionValue::List(items) => items,
            _ => &[],
        }
    }

    /// Convert raw environment text into a value of the same shape as `self`.
    ///
    /// Returns `None` when the text cannot represent this shape.
    pub fn coerce_from_env(&self, raw: &str) -> Option<OptionValue> {
        match self {
            OptionValue::Flag(_) => parse_flag(raw).map(OptionValue::Flag),
            OptionValue::Count(_) => raw.trim().parse().ok().map(OptionValue::Count),
            OptionValue::Text(_) => Some(OptionValue::Text(Some(raw.to_string()))),
            OptionValue::List(_) => shlex::split(raw).map(OptionValue::List),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl From<bool> for OptionValue {
    fn from(flag: bool) -> Self {
        OptionValue::Flag(flag)
    }
}

impl From<&str> for OptionValue {
    fn from(text: &str) -> Self {
        OptionValue::Text(Some(text.to_string()))
    }
}

impl From<String> for OptionValue {
    fn from(text: String) -> Self {
        OptionValue::Text(Some(text))
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(items: Vec<String>) -> Self {
        OptionValue::List(items)
    }
}

/// Ordered mapping from option or positional name to its value.
///
/// Equality compares entries as a map; insertion order only affects
/// iteration and serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedOptions {
    values: IndexMap<String, OptionValue>,
}

impl ParsedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous one while keeping its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Text value of `key`, if it is set.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).is_some_and(OptionValue::as_bool)
    }

    pub fn get_count(&self, key: &str) -> u64 {
        self.get(key).map_or(0, OptionValue::as_count)
    }

    pub fn get_list(&self, key: &str) -> &[String] {
        self.get(key).map(OptionValue::as_list).unwrap_or_default()
    }

    /// Subcommand resolved at the deepest level so far; empty when none.
    pub fn command(&self) -> &str {
        self.get_str(COMMAND_KEY).unwrap_or_default()
    }

    /// Tokens left unconsumed at the deepest level so far.
    pub fn args(&self) -> &[String] {
        self.get_list(ARGS_KEY)
    }

    /// Merge `newer` into `self`; values from `newer` win on collision.
    pub fn merge(&mut self, newer: ParsedOptions) {
        self.values.extend(newer.values);
    }

    /// Make sure `COMMAND` and `ARGS` exist, leaving present values alone.
    pub fn ensure_reserved(&mut self) {
        self.values
            .entry(COMMAND_KEY.to_string())
            .or_insert(OptionValue::Text(None));
        self.values
            .entry(ARGS_KEY.to_string())
            .or_insert_with(|| OptionValue::List(Vec::new()));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, OptionValue)> for ParsedOptions {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ParsedOptions {
    type Item = (String, OptionValue);
    type IntoIter = indexmap::map::IntoIter<String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParsedOptions {
    type Item = (&'a String, &'a OptionValue);
    type IntoIter = indexmap::map::Iter<'a, String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
