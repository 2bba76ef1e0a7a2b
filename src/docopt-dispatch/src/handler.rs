//! Command handlers and handler resolution.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::NoSuchCommand;
use crate::options::ParsedOptions;
use crate::registry::CommandClass;

/// Signature of a handler body.
pub type HandlerFn = dyn Fn(&ParsedOptions) -> anyhow::Result<()> + Send + Sync;

/// A callable subcommand bound to a command class instance.
///
/// The usage text is the handler's own grammar. A handler without one is
/// not treated as a command by the dispatcher.
#[derive(Clone)]
pub struct Handler {
    name: String,
    usage: Option<String>,
    func: Arc<HandlerFn>,
}

impl Handler {
    pub fn new<F>(name: impl Into<String>, usage: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ParsedOptions) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            usage: Some(usage.into()),
            func: Arc::new(func),
        }
    }

    /// A handler that carries no usage text.
    pub fn undocumented<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ParsedOptions) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            usage: None,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn call(&self, options: &ParsedOptions) -> anyhow::Result<()> {
        (self.func)(options)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("documented", &self.usage.is_some())
            .finish_non_exhaustive()
    }
}

/// Method name a command maps to: every `-` becomes `_`.
pub fn method_name(command: &str) -> String {
    command.replace('-', "_")
}

/// Find the handler for `command` on a fresh instance of `class`.
///
/// `container` is the registry key of `class`, reported back when the
/// command cannot be found.
pub fn resolve_handler(
    container: &str,
    class: &dyn CommandClass,
    command: &str,
) -> Result<Handler, NoSuchCommand> {
    let method = method_name(command);
    let instance = class.instantiate();

    match instance.method(&method) {
        Some(handler) => {
            debug!(container, command, method = %method, "resolved handler");
            Ok(handler)
        }
        None => Err(NoSuchCommand::new(command, container, class.usage())),
    }
}
