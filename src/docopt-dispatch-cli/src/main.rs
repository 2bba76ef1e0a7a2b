//! Demo binary for `docopt-dispatch`.
//!
//! Resolves its arguments against a small command tree and prints the
//! resolved command with its options as JSON. Options not given on the
//! command line are read from `DOCOPT_DISPATCH_<NAME>` variables.

mod commands;
mod logging;

use docopt_dispatch::{App, DispatchConfig, Dispatcher};
use tracing::debug;

const ENV_PREFIX: &str = "DOCOPT_DISPATCH";
const PROGRAM_NAME: &str = "docopt-dispatch";

fn main() {
    logging::init();

    let config = DispatchConfig::new()
        .with_env_prefix(ENV_PREFIX)
        .with_program_name(PROGRAM_NAME);
    debug!(?config, "starting dispatch");

    let app = App::new(commands::registry()).with_dispatcher(Dispatcher::new(config));
    app.run_and_exit(None)
}
