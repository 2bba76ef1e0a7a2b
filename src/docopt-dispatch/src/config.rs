//! Dispatcher configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grammar::ParseSettings;

/// Registry key of the top-level command class.
pub const ROOT_KEY: &str = "__root__";

/// Errors raised while loading a [`DispatchConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse dispatch config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid dispatch config: {0}")]
    Invalid(String),
}

/// Configuration for the dispatcher.
///
/// ```toml
/// root_key = "__root__"
/// env_prefix = "MYAPP"
/// options_first = true
/// program_name = "myapp"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Registry key the dispatch starts from.
    pub root_key: String,

    /// Prefix for environment variables overlaid beneath parsed options.
    /// No overlay is applied when unset.
    pub env_prefix: Option<String>,

    /// Options-first parsing for command class grammars. Handler grammars
    /// are always parsed options-first.
    pub options_first: bool,

    /// Name handed to the grammar parser as `argv[0]`.
    pub program_name: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            root_key: ROOT_KEY.to_string(),
            env_prefix: None,
            options_first: true,
            program_name: "prog".to_string(),
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: DispatchConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_root_key(mut self, key: impl Into<String>) -> Self {
        self.root_key = key.into();
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn with_options_first(mut self, yes: bool) -> Self {
        self.options_first = yes;
        self
    }

    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_key.is_empty() {
            return Err(ConfigError::Invalid("root_key must not be empty".to_string()));
        }
        if self
            .env_prefix
            .as_deref()
            .is_some_and(|p| p.is_empty() || p.contains('='))
        {
            return Err(ConfigError::Invalid(
                "env_prefix must be non-empty and must not contain '='".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings used for command class grammars.
    pub fn parse_settings(&self) -> ParseSettings {
        ParseSettings {
            options_first: self.options_first,
            program_name: self.program_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.root_key, ROOT_KEY);
        assert!(config.env_prefix.is_none());
        assert!(config.options_first);
    }

    #[test]
    fn test_from_toml() {
        let config = DispatchConfig::from_toml_str(
            r#"
env_prefix = "MYAPP"
program_name = "myapp"
"#,
        )
        .unwrap();
        assert_eq!(config.env_prefix.as_deref(), Some("MYAPP"));
        assert_eq!(config.program_name, "myapp");
        assert_eq!(config.root_key, ROOT_KEY);
        assert!(config.options_first);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = DispatchConfig::from_toml_str("envprefix = \"X\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            DispatchConfig::from_toml_str("root_key = \"\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DispatchConfig::from_toml_str("env_prefix = \"\""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = DispatchConfig::new()
            .with_root_key("main")
            .with_env_prefix("APP")
            .with_options_first(false)
            .with_program_name("app");
        assert_eq!(config.root_key, "main");
        let settings = config.parse_settings();
        assert!(!settings.options_first);
        assert_eq!(settings.program_name, "app");
    }
}
