//! The recursive dispatch engine.
//!
//! Dispatch walks the registry one level at a time. Each level parses its
//! usage text against the remaining tokens and reads `COMMAND` from the
//! merged options:
//!
//! ```text
//! COMMAND is a registry key      -> next level, args = [COMMAND] + ARGS
//! COMMAND is empty, -h, --help   -> Help (this level's usage)
//! COMMAND is a documented method -> parse its usage against ARGS -> Resolved
//! anything else                  -> NoSuchCommand
//! ```
//!
//! The engine has no side effects beyond reading the environment; what an
//! outcome means for the process is decided by [`crate::App`].

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::config::DispatchConfig;
use crate::env::{EnvSource, ProcessEnv, overlay};
use crate::error::{DispatchError, NoSuchCommand};
use crate::explicit::explicit_options;
use crate::grammar::{DocoptParser, GrammarError, ParseSettings, UsageParser};
use crate::handler::{Handler, resolve_handler};
use crate::options::{OptionValue, ParsedOptions};
use crate::registry::CommandRegistry;

const HELP_FLAGS: [&str; 2] = ["-h", "--help"];

/// Whether a level's own parse switched on one of the help flags.
fn help_requested(parsed: &ParsedOptions) -> bool {
    HELP_FLAGS
        .iter()
        .any(|flag| matches!(parsed.get(flag), Some(OptionValue::Flag(true))))
}

/// Tokens a level consumed: everything before the `ARGS` it handed on.
fn consumed<'a>(args: &'a [String], parsed: &ParsedOptions) -> &'a [String] {
    &args[..args.len().saturating_sub(parsed.args().len())]
}

/// A resolved handler together with its final options.
#[derive(Debug, Clone)]
pub struct Dispatch {
    handler: Handler,
    options: ParsedOptions,
}

impl Dispatch {
    pub fn new(handler: Handler, options: ParsedOptions) -> Self {
        Self { handler, options }
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn options(&self) -> &ParsedOptions {
        &self.options
    }

    pub fn into_parts(self) -> (Handler, ParsedOptions) {
        (self.handler, self.options)
    }

    /// Call the handler with the final options.
    pub fn invoke(&self) -> anyhow::Result<()> {
        self.handler.call(&self.options)
    }
}

/// Result of a dispatch.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A leaf handler was found and its grammar matched.
    Resolved(Dispatch),

    /// Help was requested; `usage` is the text of the level it was asked at.
    Help { usage: String },

    /// The arguments did not match the usage text of some level.
    UsageMismatch { usage: String },

    /// A command name could not be resolved.
    NoSuchCommand(NoSuchCommand),
}

impl Outcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved(_))
    }
}

/// State carried from one level to the next.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Frame {
    pub(crate) key: String,
    pub(crate) args: Vec<String>,
    pub(crate) options: ParsedOptions,
    /// Option keys typed on the command line at any level so far.
    pub(crate) explicit: HashSet<String>,
}

impl Frame {
    pub(crate) fn new(key: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            key: key.into(),
            args,
            options: ParsedOptions::new(),
            explicit: HashSet::new(),
        }
    }
}

/// What one level decided.
#[derive(Debug)]
pub(crate) enum Step {
    Descend(Frame),
    Finish(Outcome),
}

/// Resolves argument vectors against a [`CommandRegistry`].
pub struct Dispatcher {
    config: DispatchConfig,
    parser: Box<dyn UsageParser>,
    env: Box<dyn EnvSource>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Dispatcher using docopt grammars and the process environment.
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            parser: Box::new(DocoptParser),
            env: Box::new(ProcessEnv),
        }
    }

    pub fn with_parser(mut self, parser: impl UsageParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Resolve `args` (without the program name) starting at the configured
    /// root key.
    pub fn resolve(
        &self,
        registry: &CommandRegistry,
        args: &[String],
    ) -> Result<Outcome, DispatchError> {
        let mut frame = Frame::new(self.config.root_key.clone(), args.to_vec());
        let mut visited = HashSet::new();

        loop {
            if !visited.insert((frame.key.clone(), frame.args.clone())) {
                return Err(DispatchError::CommandCycle { command: frame.key });
            }
            match self.step(registry, frame)? {
                Step::Descend(next) => frame = next,
                Step::Finish(outcome) => return Ok(outcome),
            }
        }
    }

    /// Process a single level of the command tree.
    pub(crate) fn step(
        &self,
        registry: &CommandRegistry,
        frame: Frame,
    ) -> Result<Step, DispatchError> {
        let Frame {
            key,
            args,
            mut options,
            mut explicit,
        } = frame;

        let class = registry
            .get(&key)
            .ok_or_else(|| DispatchError::MissingRegistryEntry(key.clone()))?;
        let usage = class.usage();
        trace!(level = %key, ?args, "parsing command class grammar");

        let parsed = match self.parse(&key, usage, &args, &self.config.parse_settings())? {
            Ok(parsed) => parsed,
            Err(outcome) => return Ok(Step::Finish(outcome)),
        };
        let help = help_requested(&parsed);
        explicit.extend(explicit_options(usage, &parsed, consumed(&args, &parsed)));
        options.merge(parsed);
        options.ensure_reserved();

        if help {
            return Ok(Step::Finish(Outcome::Help {
                usage: usage.to_string(),
            }));
        }

        let command = options.command().to_string();

        if registry.contains(&command) {
            debug!(from = %key, to = %command, "descending into command class");
            let mut next_args = Vec::with_capacity(options.args().len() + 1);
            next_args.push(command.clone());
            next_args.extend_from_slice(options.args());
            return Ok(Step::Descend(Frame {
                key: command,
                args: next_args,
                options,
                explicit,
            }));
        }

        if command.is_empty() || HELP_FLAGS.contains(&command.as_str()) {
            return Ok(Step::Finish(Outcome::Help {
                usage: usage.to_string(),
            }));
        }

        let handler = match resolve_handler(&key, class, &command) {
            Ok(handler) => handler,
            Err(missing) => return Ok(Step::Finish(Outcome::NoSuchCommand(missing))),
        };
        let Some(handler_usage) = handler.usage().map(str::to_string) else {
            debug!(command = %command, "handler has no usage text");
            return Ok(Step::Finish(Outcome::NoSuchCommand(NoSuchCommand::new(
                command, key, usage,
            ))));
        };

        let leaf_args = options.args().to_vec();
        let leaf_settings = self.config.parse_settings().options_first(true);
        let parsed = match self.parse(&command, &handler_usage, &leaf_args, &leaf_settings)? {
            Ok(parsed) => parsed,
            Err(outcome) => return Ok(Step::Finish(outcome)),
        };
        let help = help_requested(&parsed);
        explicit.extend(explicit_options(
            &handler_usage,
            &parsed,
            consumed(&leaf_args, &parsed),
        ));
        options.merge(parsed);

        if help {
            return Ok(Step::Finish(Outcome::Help {
                usage: handler_usage,
            }));
        }

        if let Some(prefix) = self.config.env_prefix.as_deref() {
            options = overlay(options, prefix, self.env.as_ref(), &explicit);
        }

        debug!(command = %command, keys = options.len(), "dispatch resolved");
        Ok(Step::Finish(Outcome::Resolved(Dispatch::new(handler, options))))
    }

    /// Parse one usage text. A mismatch becomes a finished outcome; an
    /// unusable grammar is an error.
    fn parse(
        &self,
        command: &str,
        usage: &str,
        args: &[String],
        settings: &ParseSettings,
    ) -> Result<Result<ParsedOptions, Outcome>, DispatchError> {
        match self.parser.parse(usage, args, settings) {
            Ok(parsed) => Ok(Ok(parsed)),
            Err(GrammarError::Mismatch(reason)) => {
                debug!(command, %reason, "arguments do not match usage");
                Ok(Err(Outcome::UsageMismatch {
                    usage: usage.to_string(),
                }))
            }
            Err(GrammarError::Invalid(message)) => {
                Err(DispatchError::invalid_grammar(command, message))
            }
        }
    }
}
