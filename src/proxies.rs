//! Proxy injectors: explode collection-like values into per-element
//! candidates and rebuild fresh collections from the validated elements.

use crate::definers::{Candidate, Slot};
use crate::error::{WireError, WireResult};
use crate::value::Value;

/// A collection mediator for the proxy definer.
///
/// `explode` turns a collection-like value into individually validatable
/// candidates; `rebuild` re-collapses the validated candidates into a fresh,
/// populated collection derived from the original's prototype. Neither
/// operation mutates its input.
pub trait ProxyInjector: Send + Sync {
    /// Split a value into per-element candidates.
    fn explode(&self, value: &Value) -> WireResult<Vec<Candidate>>;

    /// Rebuild the final collection from validated candidates.
    fn rebuild(&self, original: &Value, validated: &[Candidate]) -> WireResult<Value>;
}

/// Identity proxy: the value itself is the single candidate.
pub struct DirectProxy;

impl ProxyInjector for DirectProxy {
    fn explode(&self, value: &Value) -> WireResult<Vec<Candidate>> {
        Ok(vec![Candidate::whole(value.clone())])
    }

    fn rebuild(&self, original: &Value, validated: &[Candidate]) -> WireResult<Value> {
        Ok(validated
            .first()
            .map(|candidate| candidate.value.clone())
            .unwrap_or_else(|| original.clone()))
    }
}

/// List proxy: elements become candidates by index; rebuilds a fresh list.
pub struct ListProxy;

impl ProxyInjector for ListProxy {
    fn explode(&self, value: &Value) -> WireResult<Vec<Candidate>> {
        match value {
            Value::List(items) => Ok(items
                .iter()
                .enumerate()
                .map(|(index, item)| Candidate {
                    slot: Slot::Index(index),
                    value: item.clone(),
                })
                .collect()),
            other => Err(WireError::BadDependency(format!(
                "expected a list, got {}",
                other.type_label()
            ))),
        }
    }

    fn rebuild(&self, _original: &Value, validated: &[Candidate]) -> WireResult<Value> {
        let mut items = Vec::with_capacity(validated.len());
        for candidate in validated {
            if matches!(candidate.slot, Slot::Index(_)) {
                items.push(candidate.value.clone());
            }
        }
        Ok(Value::List(items))
    }
}

/// Registry proxy: items become candidates by key; rebuilds a fresh registry
/// of the same item type.
pub struct RegistryProxy;

impl ProxyInjector for RegistryProxy {
    fn explode(&self, value: &Value) -> WireResult<Vec<Candidate>> {
        match value {
            Value::Registry(registry) => Ok(registry
                .map()
                .iter()
                .map(|(key, item)| Candidate {
                    slot: Slot::Key(key.clone()),
                    value: item.clone(),
                })
                .collect()),
            other => Err(WireError::BadDependency(format!(
                "expected a registry, got {}",
                other.type_label()
            ))),
        }
    }

    fn rebuild(&self, original: &Value, validated: &[Candidate]) -> WireResult<Value> {
        let registry = match original {
            Value::Registry(registry) => registry,
            other => {
                return Err(WireError::BadDependency(format!(
                    "expected a registry, got {}",
                    other.type_label()
                )))
            }
        };
        let mut rebuilt = registry.fresh();
        for candidate in validated {
            if let Slot::Key(key) = &candidate.slot {
                rebuilt.set(key.clone(), candidate.value.clone());
            }
        }
        Ok(Value::Registry(rebuilt))
    }
}
