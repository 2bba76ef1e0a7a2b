//! Environment overlay for parsed options.
//!
//! Every option key maps to a variable name: leading dashes are stripped,
//! remaining dashes become underscores, the result is upper-cased and
//! prefixed with `PREFIX_`. So with prefix `MYAPP`, `--dry-run` reads
//! `MYAPP_DRY_RUN` and `<target>` reads `MYAPP_<TARGET>`.
//!
//! Values supplied on the command line always win. An option is supplied
//! when one of its spellings was typed, so a grammar default still yields
//! to the environment. A positional is supplied when it holds a value.

use std::collections::{HashMap, HashSet};

use tracing::{trace, warn};

use crate::explicit::is_option_key;
use crate::options::ParsedOptions;

/// Source of environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the current process, read at lookup time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Environment variable consulted for option `key` under `prefix`.
pub fn env_var_name(prefix: &str, key: &str) -> String {
    let name = key.trim_start_matches('-').replace('-', "_").to_uppercase();
    format!("{prefix}_{name}")
}

/// Fill options the command line did not supply from the environment.
///
/// `explicit` holds the option keys typed on the command line (see
/// [`crate::explicit_options`]). Environment text is converted to the shape
/// the grammar declared for the key; text that does not fit that shape is
/// ignored.
pub fn overlay(
    mut options: ParsedOptions,
    prefix: &str,
    env: &dyn EnvSource,
    explicit: &HashSet<String>,
) -> ParsedOptions {
    let from_env: Vec<_> = options
        .iter()
        .filter(|(key, value)| {
            if is_option_key(key) {
                !explicit.contains(key.as_str())
            } else {
                !value.is_set()
            }
        })
        .filter_map(|(key, value)| {
            let name = env_var_name(prefix, key);
            let raw = env.var(&name)?;
            match value.coerce_from_env(&raw) {
                Some(coerced) => {
                    trace!(option = %key, variable = %name, "option taken from environment");
                    Some((key.clone(), coerced))
                }
                None => {
                    warn!(variable = %name, value = %raw, "ignoring environment value of the wrong shape");
                    None
                }
            }
        })
        .collect();

    for (key, value) in from_env {
        options.insert(key, value);
    }
    options
}
