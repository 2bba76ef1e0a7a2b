//! Recursive command dispatch driven by docopt usage texts.
//!
//! A program is described as a tree of command classes. Each class carries a
//! usage text that doubles as the grammar for its level; each documented
//! method of a class is a leaf command with a grammar of its own. Dispatch
//! walks the tree until a leaf is reached and hands back the handler plus
//! every option parsed on the way, deeper levels overriding shallower ones.
//!
//! # Example
//!
//! ```rust,ignore
//! use docopt_dispatch::{App, CommandRegistry, CommandTable, DispatchConfig, Dispatcher};
//!
//! const ROOT: &str = "
//! Usage:
//!   tool [options] [COMMAND] [ARGS...]
//!
//! Options:
//!   -h, --help  Show this screen.
//!
//! Commands:
//!   build  Build a target
//! ";
//!
//! let registry = CommandRegistry::with_root(CommandTable::new(ROOT).command(
//!     "build",
//!     "Usage: build [--release] [<target>]",
//!     |opts| {
//!         println!("release = {}", opts.get_bool("--release"));
//!         Ok(())
//!     },
//! ));
//!
//! let app = App::new(registry)
//!     .with_dispatcher(Dispatcher::new(DispatchConfig::new().with_env_prefix("TOOL")));
//! let status = app.run(None)?;
//! std::process::exit(status.code());
//! ```
//!
//! # Nested command classes
//!
//! When `COMMAND` names another registry key the dispatcher descends into
//! that class with the command token put back in front of the remaining
//! arguments, so the child usage text must spell it as a literal:
//!
//! ```text
//! Usage:
//!   tool remote [COMMAND] [ARGS...]
//!
//! Commands:
//!   add     Add a remote
//!   remove  Remove a remote
//! ```
//!
//! # Environment
//!
//! With an environment prefix configured, options the command line did not
//! spell out are filled from `PREFIX_<NAME>` variables, grammar defaults
//! included (see [`env`]).


mod app;
mod config;
mod engine;
pub mod env;
mod error;
mod explicit;
mod grammar;
mod handler;
mod options;
mod registry;
mod section;

pub use app::{App, ConsoleReporter, ExitStatus, Prepared, Reporter};
pub use config::{ConfigError, DispatchConfig, ROOT_KEY};
pub use engine::{Dispatch, Dispatcher, Outcome};
pub use env::{EnvSource, ProcessEnv, env_var_name, overlay};
pub use error::{COMMANDS_SECTION, DispatchError, NoSuchCommand};
pub use explicit::{explicit_options, is_option_key};
pub use grammar::{DocoptParser, GrammarError, ParseSettings, UsageParser};
pub use handler::{Handler, HandlerFn, method_name, resolve_handler};
pub use options::{ARGS_KEY, COMMAND_KEY, OptionValue, ParsedOptions};
pub use registry::{CommandClass, CommandObject, CommandRegistry, CommandTable};
pub use section::extract_section;
