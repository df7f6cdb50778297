//! Need contracts: a service's self-declared dependency schema.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::Attrs;

/// A need contract: ordered map from property name to per-definer
/// configuration.
///
/// Each entry configures the injection pipeline for one property; the inner
/// map is keyed by definer key (`"optional"`, `"property"`, `"proxy"`,
/// `"value"`, `"interface"`) and validated against the merged definer schema
/// before the pipeline runs.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use wirebox::{attrs, Contract};
///
/// let contract = Contract::new()
///     .with("printer", attrs(json!({
///         "interface": { "methods": ["print"] }
///     })))
///     .with("timeout", attrs(json!({ "optional": true })));
///
/// assert_eq!(contract.names(), vec!["printer", "timeout"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contract {
    properties: IndexMap<String, Attrs>,
}

impl Contract {
    /// Create an empty contract.
    pub fn new() -> Self {
        Contract::default()
    }

    /// Add a property entry, replacing any previous entry for the name.
    pub fn with(mut self, property: impl Into<String>, config: Attrs) -> Self {
        self.properties.insert(property.into(), config);
        self
    }

    /// The configuration for a property, if declared.
    pub fn get(&self, property: &str) -> Option<&Attrs> {
        self.properties.get(property)
    }

    /// Declared property names, in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    /// Iterate declared properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Attrs)> {
        self.properties.iter()
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the contract declares no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Merge another contract over this one, the other's entries winning on
    /// conflicting property names.
    pub fn merged_with(&self, other: &Contract) -> Contract {
        let mut merged = self.clone();
        for (property, config) in &other.properties {
            merged.properties.insert(property.clone(), config.clone());
        }
        merged
    }
}

/// How an object declares its need contract: as a static value or as a
/// zero-argument producer, constant once read.
#[derive(Clone)]
pub enum NeedSource {
    /// Contract declared inline.
    Static(Contract),
    /// Contract produced on demand.
    Deferred(Arc<dyn Fn() -> Contract + Send + Sync>),
}

impl NeedSource {
    /// Wrap a producer closure.
    pub fn deferred<F>(producer: F) -> Self
    where
        F: Fn() -> Contract + Send + Sync + 'static,
    {
        NeedSource::Deferred(Arc::new(producer))
    }

    /// Materialize the contract.
    pub fn contract(&self) -> Contract {
        match self {
            NeedSource::Static(contract) => contract.clone(),
            NeedSource::Deferred(producer) => producer(),
        }
    }
}

impl fmt::Debug for NeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeedSource::Static(contract) => f.debug_tuple("Static").field(contract).finish(),
            NeedSource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl PartialEq for NeedSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NeedSource::Static(a), NeedSource::Static(b)) => a == b,
            (NeedSource::Deferred(a), NeedSource::Deferred(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
