//! Error types for command dispatch.

use thiserror::Error;

use crate::section::extract_section;

/// Label of the usage section listing the subcommands of a container.
pub const COMMANDS_SECTION: &str = "commands:";

/// A resolved command name has no registry entry and no documented handler
/// on the command class that was asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No such command: {command}")]
pub struct NoSuchCommand {
    /// The command name as typed.
    pub command: String,

    /// Registry key of the command class that failed to resolve it.
    pub container: String,

    /// Usage text of that command class.
    pub container_usage: String,
}

impl NoSuchCommand {
    pub fn new(
        command: impl Into<String>,
        container: impl Into<String>,
        container_usage: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            container: container.into(),
            container_usage: container_usage.into(),
        }
    }

    /// The `commands:` blocks of the container's usage text.
    pub fn available_commands(&self) -> Vec<String> {
        extract_section(COMMANDS_SECTION, &self.container_usage)
    }

    /// Message shown to the user: the error line followed by the
    /// container's command listing.
    pub fn render(&self) -> String {
        format!("{self}\n{}", self.available_commands().join("\n"))
    }
}

/// Failures that abort a dispatch outside the normal outcomes.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The registry has no entry for the key a dispatch starts from.
    #[error("command registry has no entry for '{0}'")]
    MissingRegistryEntry(String),

    /// A usage text could not be understood as a grammar.
    #[error("invalid usage grammar for '{command}': {message}")]
    InvalidGrammar { command: String, message: String },

    /// A command class dispatched back to itself without consuming input.
    #[error("command '{command}' dispatches to itself without consuming arguments")]
    CommandCycle { command: String },
}

impl DispatchError {
    pub fn invalid_grammar(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGrammar {
            command: command.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_such_command_render() {
        let err = NoSuchCommand::new(
            "frobnicate",
            "__root__",
            "Usage:\n  app [COMMAND]\n\nCommands:\n  build  Build\n  test   Test\n",
        );
        assert_eq!(err.to_string(), "No such command: frobnicate");
        assert_eq!(
            err.render(),
            "No such command: frobnicate\nCommands:\n  build  Build\n  test   Test"
        );
    }

    #[test]
    fn test_no_such_command_without_listing() {
        let err = NoSuchCommand::new("x", "__root__", "Usage: app [COMMAND]");
        assert!(err.available_commands().is_empty());
        assert_eq!(err.render(), "No such command: x\n");
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::MissingRegistryEntry("__root__".to_string());
        assert_eq!(err.to_string(), "command registry has no entry for '__root__'");

        let err = DispatchError::invalid_grammar("build", "no usage section");
        assert!(err.to_string().contains("build"));
        assert!(err.to_string().contains("no usage section"));
    }
}
