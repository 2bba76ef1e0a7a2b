//! Command tree of the demo binary.
//!
//! Every handler prints the command it resolved to together with the final
//! option map as pretty JSON on stdout.

use docopt_dispatch::{CommandRegistry, CommandTable, ParsedOptions};
use serde_json::json;

pub const ROOT_USAGE: &str = "
Demonstrates recursive command dispatch.

Usage:
  docopt-dispatch [options] [COMMAND] [ARGS...]
  docopt-dispatch -h | --help

Options:
  -h, --help     Show this screen.
  -v, --verbose  Report more detail.

Commands:
  build   Build a target
  remote  Manage remotes
  config  Read or write settings
";

pub const BUILD_USAGE: &str = "
Build a target.

Usage:
  build [options] [<target>]

Options:
  -h, --help      Show this screen.
  --release       Build with optimizations.
  --jobs=<n>      Number of parallel jobs.
  --profile=<p>   Build profile [default: dev].
";

pub const REMOTE_USAGE: &str = "
Manage remotes.

Usage:
  docopt-dispatch remote [options] [COMMAND] [ARGS...]

Options:
  -h, --help  Show this screen.

Commands:
  add     Add a remote
  remove  Remove a remote
  list    List remotes
";

pub const REMOTE_ADD_USAGE: &str = "
Add a remote.

Usage:
  add [options] <name> <url>

Options:
  -h, --help  Show this screen.
  --fetch     Fetch after adding.
";

pub const REMOTE_REMOVE_USAGE: &str = "
Remove a remote.

Usage:
  remove [options] <name>

Options:
  -h, --help  Show this screen.
";

pub const REMOTE_LIST_USAGE: &str = "
List remotes.

Usage:
  list [options]

Options:
  -h, --help     Show this screen.
  -v, --verbose  Show urls.
";

pub const CONFIG_USAGE: &str = "
Read or write settings.

Usage:
  config [options] [<key>] [<value>]

Options:
  -h, --help  Show this screen.
  --unset     Remove the setting.
";

/// Handler printing `command` and the options it received.
fn echo(
    command: &'static str,
) -> impl Fn(&ParsedOptions) -> anyhow::Result<()> + Send + Sync + 'static {
    move |options| {
        let report = json!({ "command": command, "options": options });
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

/// `config` handler: echoes like the others, but `--unset` needs a key.
fn config(options: &ParsedOptions) -> anyhow::Result<()> {
    if options.get_bool("--unset") && options.get_str("<key>").is_none() {
        anyhow::bail!("--unset needs a <key>");
    }
    echo("config")(options)
}

/// Build the registry behind the binary.
pub fn registry() -> CommandRegistry {
    let root = CommandTable::new(ROOT_USAGE)
        .command("build", BUILD_USAGE, echo("build"))
        .command("config", CONFIG_USAGE, config)
        .undocumented("self-check", echo("self-check"));

    let remote = CommandTable::new(REMOTE_USAGE)
        .command("add", REMOTE_ADD_USAGE, echo("remote add"))
        .command("remove", REMOTE_REMOVE_USAGE, echo("remote remove"))
        .command("list", REMOTE_LIST_USAGE, echo("remote list"));

    CommandRegistry::with_root(root).with("remote", remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docopt_dispatch::{Dispatcher, Outcome, ROOT_KEY};

    fn resolve(args: &[&str]) -> Outcome {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        match Dispatcher::default().resolve(&registry(), &args) {
            Ok(outcome) => outcome,
            Err(e) => panic!("dispatch failed: {e}"),
        }
    }

    #[test]
    fn test_registry_keys() {
        assert_eq!(registry().names(), vec![ROOT_KEY, "remote"]);
    }

    #[test]
    fn test_build_resolves() {
        match resolve(&["build", "--release", "app"]) {
            Outcome::Resolved(dispatch) => {
                assert_eq!(dispatch.handler().name(), "build");
                assert!(dispatch.options().get_bool("--release"));
                assert_eq!(dispatch.options().get_str("<target>"), Some("app"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_remote_add_resolves() {
        match resolve(&["remote", "add", "origin", "https://example.com/repo"]) {
            Outcome::Resolved(dispatch) => {
                assert_eq!(dispatch.handler().name(), "add");
                assert_eq!(dispatch.options().get_str("<name>"), Some("origin"));
                assert_eq!(
                    dispatch.options().get_str("<url>"),
                    Some("https://example.com/repo")
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_config_unset_requires_key() {
        match resolve(&["config", "--unset"]) {
            Outcome::Resolved(dispatch) => {
                let err = dispatch.invoke().unwrap_err();
                assert_eq!(err.to_string(), "--unset needs a <key>");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_undocumented_is_not_dispatched() {
        assert!(matches!(resolve(&["self-check"]), Outcome::NoSuchCommand(_)));
    }
}
