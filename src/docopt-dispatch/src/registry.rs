//! Command classes and the registry the dispatcher walks.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::ROOT_KEY;
use crate::handler::{Handler, method_name};
use crate::options::ParsedOptions;

/// An object whose methods are the subcommands of one command class.
pub trait CommandObject {
    /// Look up the handler bound to `method`. Names arrive normalized, with
    /// dashes already replaced by underscores.
    fn method(&self, method: &str) -> Option<Handler>;
}

/// One level of the command tree.
pub trait CommandClass: Send + Sync {
    /// Usage text used as the grammar for this level.
    fn usage(&self) -> &str;

    /// Create a fresh handler-providing object. Called once per dispatch
    /// that resolves a handler on this class.
    fn instantiate(&self) -> Box<dyn CommandObject>;
}

/// A [`CommandClass`] built from a usage text and a table of closures.
#[derive(Clone)]
pub struct CommandTable {
    usage: String,
    methods: IndexMap<String, Handler>,
}

impl CommandTable {
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            methods: IndexMap::new(),
        }
    }

    /// Add a documented subcommand. Dashes in `name` are stored as
    /// underscores.
    pub fn command<F>(mut self, name: &str, usage: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ParsedOptions) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let method = method_name(name);
        self.methods
            .insert(method.clone(), Handler::new(method, usage, func));
        self
    }

    /// Add a method without a usage text. It can be called directly but is
    /// never dispatched to.
    pub fn undocumented<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&ParsedOptions) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let method = method_name(name);
        self.methods
            .insert(method.clone(), Handler::undocumented(method, func));
        self
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

struct TableInstance {
    methods: IndexMap<String, Handler>,
}

impl CommandObject for TableInstance {
    fn method(&self, method: &str) -> Option<Handler> {
        self.methods.get(method).cloned()
    }
}

impl CommandClass for CommandTable {
    fn usage(&self) -> &str {
        &self.usage
    }

    fn instantiate(&self) -> Box<dyn CommandObject> {
        Box::new(TableInstance {
            methods: self.methods.clone(),
        })
    }
}

/// Registry of command classes keyed by command name.
///
/// The key [`ROOT_KEY`] holds the top-level grammar unless the dispatcher is
/// configured with another root key.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    classes: IndexMap<String, Arc<dyn CommandClass>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with `root` stored under [`ROOT_KEY`].
    pub fn with_root(root: impl CommandClass + 'static) -> Self {
        Self::new().with(ROOT_KEY, root)
    }

    /// Register a class, replacing any previous class under the same name.
    pub fn register(&mut self, name: impl Into<String>, class: impl CommandClass + 'static) {
        self.classes.insert(name.into(), Arc::new(class));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, class: impl CommandClass + 'static) -> Self {
        self.register(name, class);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn CommandClass> {
        self.classes.get(name).map(|class| class.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("classes", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(usage: &str) -> CommandTable {
        CommandTable::new(usage)
            .command("build", "Usage: build", |_| Ok(()))
            .command("dry-run", "Usage: dry-run", |_| Ok(()))
            .undocumented("reset", |_| Ok(()))
    }

    #[test]
    fn test_table_stores_normalized_names() {
        let table = table("Usage: app");
        let names: Vec<_> = table.method_names().collect();
        assert_eq!(names, vec!["build", "dry_run", "reset"]);
    }

    #[test]
    fn test_instantiate_lookup() {
        let class = table("Usage: app");
        let instance = class.instantiate();
        assert!(instance.method("build").is_some());
        assert!(instance.method("dry_run").is_some());
        assert!(instance.method("dry-run").is_none());
        assert!(instance.method("reset").is_some_and(|h| h.usage().is_none()));
        assert!(instance.method("deploy").is_none());
    }

    #[test]
    fn test_registry_register_and_get() {
        let registry = CommandRegistry::with_root(table("Usage: app"))
            .with("remote", CommandTable::new("Usage: app remote"));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(ROOT_KEY));
        assert!(registry.contains("remote"));
        assert!(!registry.contains("build"));
        assert_eq!(registry.get("remote").map(|c| c.usage()), Some("Usage: app remote"));
        assert_eq!(registry.names(), vec![ROOT_KEY, "remote"]);
    }

    #[test]
    fn test_registry_replace() {
        let mut registry = CommandRegistry::new();
        assert!(registry.is_empty());
        registry.register("x", CommandTable::new("first"));
        registry.register("x", CommandTable::new("second"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").map(|c| c.usage()), Some("second"));
    }

    #[test]
    fn test_registry_debug_lists_names() {
        let registry = CommandRegistry::with_root(CommandTable::new("Usage: app"));
        assert_eq!(
            format!("{registry:?}"),
            "CommandRegistry { classes: [\"__root__\"] }"
        );
    }
}
