//! Keyed item collections injectable through the registry proxy.

use indexmap::IndexMap;

use crate::error::{WireError, WireResult};
use crate::value::Value;

/// An ordered, keyed collection of items of one declared type.
///
/// Registries are service values in their own right: the registry proxy
/// explodes their items for individual validation and rebuilds a fresh
/// registry of the same item type from the validated elements.
///
/// # Examples
///
/// ```rust
/// use wirebox::{Registry, Value};
///
/// let mut handlers = Registry::new("handler");
/// handlers.set("json", Value::from("json-handler"));
/// handlers.set("xml", Value::from("xml-handler"));
///
/// assert_eq!(handlers.get("json").unwrap(), &Value::from("json-handler"));
/// assert!(handlers.get("yaml").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Registry {
    item_type: String,
    items: IndexMap<String, Value>,
}

impl Registry {
    /// Create an empty registry for the given item type.
    ///
    /// The item type only labels diagnostics on unknown-key lookups.
    pub fn new(item_type: impl Into<String>) -> Self {
        Registry {
            item_type: item_type.into(),
            items: IndexMap::new(),
        }
    }

    /// The declared item type.
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// Store an item under a key, replacing any previous item.
    pub fn set(&mut self, key: impl Into<String>, item: Value) {
        self.items.insert(key.into(), item);
    }

    /// Look up an item, failing with [`WireError::MissingItem`] on an
    /// unknown key.
    pub fn get(&self, key: &str) -> WireResult<&Value> {
        self.items.get(key).ok_or_else(|| WireError::MissingItem {
            item_type: self.item_type.clone(),
            key: key.to_string(),
        })
    }

    /// The item map, in insertion order.
    pub fn map(&self) -> &IndexMap<String, Value> {
        &self.items
    }

    /// The items as a list, in insertion order.
    pub fn list(&self) -> Vec<&Value> {
        self.items.values().collect()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// An empty registry of the same item type, for rebuilds.
    pub fn fresh(&self) -> Registry {
        Registry::new(self.item_type.clone())
    }
}
