//! Service definitions: the unit of container configuration.

use std::fmt;
use std::sync::Arc;

use crate::contract::Contract;
use crate::reference;
use crate::value::{Attrs, Value};

/// How a definition produces its base instance.
#[derive(Clone)]
pub enum Base {
    /// A value template, delegate-constructed by copy.
    Template(Value),
    /// A zero-argument constructor invoked per build.
    Constructor(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl fmt::Debug for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Base::Template(value) => f.debug_tuple("Template").field(value).finish(),
            Base::Constructor(_) => f.write_str("Constructor(..)"),
        }
    }
}

/// A named service definition with symbolic dependency values.
///
/// `dependency_keys` is derived, never authored: it is the flattened set of
/// reference targets found inside `dependencies` (plus the root segment of
/// dotted paths, so a definition referencing a nested field still orders
/// after the service that owns it). It is re-derived whenever the
/// dependencies change, and must be complete before sorting.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use wirebox::Definition;
///
/// let definition = Definition::new("database", json!({ "pool": 4 }))
///     .with_dependency("dsn", "#config.dsn")
///     .with_dependency("logger", "#logger");
///
/// assert_eq!(
///     definition.dependency_keys().to_vec(),
///     vec!["config.dsn", "config", "logger"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Definition {
    key: String,
    base: Base,
    singleton: bool,
    dependencies: Attrs,
    need: Option<Contract>,
    dependency_keys: Vec<String>,
}

impl Definition {
    /// Create a definition whose base is a value template.
    pub fn new(key: impl Into<String>, base: impl Into<Value>) -> Self {
        Definition {
            key: key.into(),
            base: Base::Template(base.into()),
            singleton: false,
            dependencies: Attrs::new(),
            need: None,
            dependency_keys: Vec::new(),
        }
    }

    /// Create a definition whose base is built by a constructor closure.
    pub fn constructed<F>(key: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Definition {
            key: key.into(),
            base: Base::Constructor(Arc::new(constructor)),
            singleton: false,
            dependencies: Attrs::new(),
            need: None,
            dependency_keys: Vec::new(),
        }
    }

    /// Flag the base value as a pre-built singleton, used as-is rather than
    /// re-instantiated.
    pub fn as_singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    /// Add one dependency value; reference strings are symbolic.
    pub fn with_dependency(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.dependencies.insert(name.into(), value.into());
        self.refresh_dependency_keys();
        self
    }

    /// Replace the whole dependency map.
    pub fn with_dependencies(mut self, dependencies: Attrs) -> Self {
        self.dependencies = dependencies;
        self.refresh_dependency_keys();
        self
    }

    /// Attach a need contract merged into the instance at build time,
    /// definition entries winning over the object's own.
    pub fn with_need(mut self, need: Contract) -> Self {
        self.need = Some(need);
        self
    }

    /// The unique definition key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the base is a pre-built singleton.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// The dependency map.
    pub fn dependencies(&self) -> &Attrs {
        &self.dependencies
    }

    /// The attached need contract, if any.
    pub fn need(&self) -> Option<&Contract> {
        self.need.as_ref()
    }

    /// The derived reference targets of the dependency map.
    pub fn dependency_keys(&self) -> &[String] {
        &self.dependency_keys
    }

    /// Produce a fresh instance of the base.
    ///
    /// Value templates are delegate-constructed by copy (singletons
    /// included: in an owned-value model the copy is the identity that never
    /// lets injection write through to the template); constructors are
    /// invoked.
    pub fn instantiate(&self) -> Value {
        match &self.base {
            Base::Template(value) => value.clone(),
            Base::Constructor(constructor) => constructor(),
        }
    }

    pub(crate) fn replace_dependencies(mut self, dependencies: Attrs) -> Definition {
        self.dependencies = dependencies;
        self.refresh_dependency_keys();
        self
    }

    pub(crate) fn refresh_dependency_keys(&mut self) {
        let mut keys = Vec::new();
        for reference in reference::find_in_attrs(&self.dependencies) {
            let root = reference
                .split('.')
                .next()
                .unwrap_or(reference.as_str())
                .to_string();
            let dotted = root != reference;
            keys.push(reference);
            if dotted {
                keys.push(root);
            }
        }
        self.dependency_keys = keys;
    }
}
