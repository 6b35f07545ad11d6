//! Function handler registry
//!
//! A function reference like `[[upper:foo]]` is expanded at render time by
//! a caller-supplied handler. Handlers are registered per `(name, role)`
//! pair on the registry owned by one document; registrations never leak
//! between documents.

use std::collections::{HashMap, HashSet};
use std::fmt;

use wikidok_ast::FunctionRole;

use crate::element::Markup;
use crate::error::{Result, WikiError};

/// One function reference as it appears in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<String>,
    pub role: FunctionRole,
}

impl FunctionCall {
    /// The canonical markup form of this call
    pub fn to_markup(&self) -> String {
        format!("[[{}:{}]]", self.name, self.args.join(" "))
    }
}

/// Expansion callback for a registered function
///
/// One method per output format, so a single handler serves every
/// renderer. All methods may fail; failures surface as
/// [`WikiError::Handler`] on the render call that hit them.
pub trait FunctionHandler {
    /// Expand the call for the plain-text renderer
    fn to_text(&self, call: &FunctionCall) -> anyhow::Result<String>;

    /// Expand the call for the element-tree renderer
    fn to_element(&self, call: &FunctionCall) -> anyhow::Result<Markup>;

    /// Expand the call for the tagged renderer; the default re-emits the
    /// canonical markup form
    fn to_tagged(&self, call: &FunctionCall) -> anyhow::Result<String> {
        Ok(call.to_markup())
    }
}

/// Registry of function handlers keyed by exact `(name, role)` match
#[derive(Default)]
pub struct FunctionRegistry {
    handlers: HashMap<(String, FunctionRole), Box<dyn FunctionHandler>>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a name and role
    ///
    /// A second registration under the same `(name, role)` pair is
    /// rejected here, at registration time, not at first use.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        role: FunctionRole,
        handler: Box<dyn FunctionHandler>,
    ) -> Result<()> {
        let name = name.into();
        let key = (name.clone(), role);
        if self.handlers.contains_key(&key) {
            return Err(WikiError::DuplicateHandler { name, role });
        }
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Look up a handler, if one is registered
    pub fn resolve(&self, name: &str, role: FunctionRole) -> Option<&dyn FunctionHandler> {
        self.handlers
            .get(&(name.to_string(), role))
            .map(|handler| handler.as_ref())
    }

    /// Look up a handler, failing with an unresolved-handler error
    pub fn require(&self, name: &str, role: FunctionRole) -> Result<&dyn FunctionHandler> {
        self.resolve(name, role)
            .ok_or_else(|| WikiError::UnresolvedHandler {
                name: name.to_string(),
                role,
            })
    }

    /// Snapshot of the registered keys, used for parse-time validation
    pub fn keys(&self) -> HashSet<(String, FunctionRole)> {
        self.handlers.keys().cloned().collect()
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("keys", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl FunctionHandler for Echo {
        fn to_text(&self, call: &FunctionCall) -> anyhow::Result<String> {
            Ok(call.args.join(" "))
        }

        fn to_element(&self, call: &FunctionCall) -> anyhow::Result<Markup> {
            Ok(Markup::Text(call.args.join(" ")))
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = FunctionRegistry::new();
        registry
            .register("echo", FunctionRole::Inline, Box::new(Echo))
            .unwrap();
        assert!(registry.resolve("echo", FunctionRole::Inline).is_some());
        assert!(registry.resolve("echo", FunctionRole::Block).is_none());
        assert!(registry.resolve("other", FunctionRole::Inline).is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = FunctionRegistry::new();
        registry
            .register("echo", FunctionRole::Inline, Box::new(Echo))
            .unwrap();
        let err = registry
            .register("echo", FunctionRole::Inline, Box::new(Echo))
            .unwrap_err();
        assert!(matches!(err, WikiError::DuplicateHandler { .. }));
        // same name under the other role is a distinct key
        registry
            .register("echo", FunctionRole::Block, Box::new(Echo))
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_default_tagged_form_is_canonical() {
        let call = FunctionCall {
            name: "upper".to_string(),
            args: vec!["foo".to_string(), "bar".to_string()],
            role: FunctionRole::Inline,
        };
        assert_eq!(Echo.to_tagged(&call).unwrap(), "[[upper:foo bar]]");
    }

    #[test]
    fn test_require_reports_unresolved() {
        let registry = FunctionRegistry::new();
        match registry.require("missing", FunctionRole::Block) {
            Err(err) => assert!(matches!(err, WikiError::UnresolvedHandler { .. })),
            Ok(_) => panic!("expected UnresolvedHandler error"),
        }
    }
}
