//! Process-facing entry point.

use std::ffi::OsString;
use std::process::ExitCode;

use tracing::{error, warn};

use crate::engine::{Dispatch, Dispatcher, Outcome};
use crate::error::{DispatchError, NoSuchCommand};
use crate::registry::CommandRegistry;

/// How a run ended, mapped to a process exit code by [`ExitStatus::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The handler ran and returned `Ok`.
    Success,
    /// Help text was printed on request.
    Help,
    /// The arguments did not match a usage text.
    UsageError,
    /// The command could not be resolved.
    NoSuchCommand,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success | ExitStatus::Help => 0,
            ExitStatus::UsageError | ExitStatus::NoSuchCommand => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self.code() == 0
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            0 => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        }
    }
}

/// Output capability used by [`App`] for everything it shows the user.
pub trait Reporter: Send + Sync {
    /// Help was requested; show the usage text.
    fn help(&self, usage: &str);

    /// The arguments did not match; show the usage text.
    fn usage_error(&self, usage: &str);

    /// A command could not be resolved.
    fn no_such_command(&self, missing: &NoSuchCommand);
}

/// Reporter writing help to stdout, usage errors to stderr and logging
/// unknown commands through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn help(&self, usage: &str) {
        println!("{}", usage.trim());
    }

    fn usage_error(&self, usage: &str) {
        eprintln!("{}", usage.trim());
    }

    fn no_such_command(&self, missing: &NoSuchCommand) {
        error!("{}", missing.render());
    }
}

/// A dispatch whose handler has not been called yet.
#[derive(Debug)]
pub enum Prepared {
    Invoke(Dispatch),
    Exit(ExitStatus),
}

/// Ties a registry, a dispatcher and a reporter together.
pub struct App {
    registry: CommandRegistry,
    dispatcher: Dispatcher,
    reporter: Box<dyn Reporter>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("registry", &self.registry)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            dispatcher: Dispatcher::default(),
            reporter: Box::new(ConsoleReporter),
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatch `args`, reporting every outcome except success.
    ///
    /// `None` reads the process arguments, skipping the program name.
    pub fn prepare(&self, args: Option<Vec<String>>) -> Result<Prepared, DispatchError> {
        let Some(args) = args else {
            return self.prepare_os(std::env::args_os().skip(1));
        };

        let prepared = match self.dispatcher.resolve(&self.registry, &args)? {
            Outcome::Resolved(dispatch) => Prepared::Invoke(dispatch),
            Outcome::Help { usage } => {
                self.reporter.help(&usage);
                Prepared::Exit(ExitStatus::Help)
            }
            Outcome::UsageMismatch { usage } => {
                self.reporter.usage_error(&usage);
                Prepared::Exit(ExitStatus::UsageError)
            }
            Outcome::NoSuchCommand(missing) => {
                self.reporter.no_such_command(&missing);
                Prepared::Exit(ExitStatus::NoSuchCommand)
            }
        };
        Ok(prepared)
    }

    /// [`prepare`](Self::prepare) for raw OS arguments, without the program
    /// name. An argument that is not valid UTF-8 is a usage error against the
    /// root usage text.
    pub fn prepare_os<I>(&self, args: I) -> Result<Prepared, DispatchError>
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        let mut tokens = Vec::new();
        for arg in args {
            match arg.into().into_string() {
                Ok(token) => tokens.push(token),
                Err(raw) => {
                    warn!(argument = ?raw, "argument is not valid UTF-8");
                    let root_key = &self.dispatcher.config().root_key;
                    let root = self
                        .registry
                        .get(root_key)
                        .ok_or_else(|| DispatchError::MissingRegistryEntry(root_key.clone()))?;
                    self.reporter.usage_error(root.usage());
                    return Ok(Prepared::Exit(ExitStatus::UsageError));
                }
            }
        }
        self.prepare(Some(tokens))
    }

    /// Dispatch `args` and call the resolved handler.
    ///
    /// Handler errors and dispatch errors propagate; every other way a run
    /// can end is reported and returned as an [`ExitStatus`].
    pub fn run(&self, args: Option<Vec<String>>) -> anyhow::Result<ExitStatus> {
        match self.prepare(args)? {
            Prepared::Invoke(dispatch) => {
                dispatch.invoke()?;
                Ok(ExitStatus::Success)
            }
            Prepared::Exit(status) => Ok(status),
        }
    }

    /// [`run`](Self::run) and terminate the process with its exit code.
    /// Errors are logged and exit with status 1.
    pub fn run_and_exit(&self, args: Option<Vec<String>>) -> ! {
        match self.run(args) {
            Ok(status) => std::process::exit(status.code()),
            Err(e) => {
                error!("{e:#}");
                std::process::exit(1)
            }
        }
    }
}
