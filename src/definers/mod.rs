//! Injection definers: pluggable per-dependency policies.
//!
//! A definer is a named policy unit contributing up to four hooks, invoked
//! by the injector in a fixed order for the definers whose key appears in a
//! property's validated configuration:
//!
//! 1. [`InjectionDefiner::source`] expands or replaces the candidate list;
//! 2. [`InjectionDefiner::validate`] checks or coerces each candidate value;
//! 3. [`InjectionDefiner::target_property`] chain-transforms the storage
//!    property name;
//! 4. [`InjectionDefiner::recompose`] reassembles the final value to store.
//!
//! Candidates thread through the pipeline as slot/value pairs so exploded
//! collection elements remember their home slot for recomposition.

mod interface;
mod optional;
mod property;
mod proxy;
mod value;

pub use interface::InterfaceDefiner;
pub use optional::OptionalDefiner;
pub use property::PropertyDefiner;
pub use proxy::ProxyDefiner;
pub use value::ValueDefiner;

use crate::error::WireResult;
use crate::schema::Schema;
use crate::value::Value;

/// Where a candidate value lives relative to the stored dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// The stored value itself.
    Whole,
    /// One element of an exploded list.
    Index(usize),
    /// One item of an exploded registry.
    Key(String),
}

/// A value moving through the pipeline, tagged with its home slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Where the value came from.
    pub slot: Slot,
    /// The candidate value.
    pub value: Value,
}

impl Candidate {
    /// A candidate standing for the whole stored value.
    pub fn whole(value: Value) -> Self {
        Candidate {
            slot: Slot::Whole,
            value,
        }
    }
}

/// A pluggable injection policy.
///
/// Implementations override the hooks they care about; defaults pass
/// through. Errors of kind `MissingDependency` or `BadDependency` raised
/// from any hook are attributed to the property at the injector boundary;
/// anything else is wrapped as `Unexpected`.
pub trait InjectionDefiner: Send + Sync {
    /// Validation schema for this definer's entry in a need contract.
    fn schema(&self) -> Schema;

    /// Expand or replace the candidate list before validation.
    fn source(&self, candidates: Vec<Candidate>, _config: &Value) -> WireResult<Vec<Candidate>> {
        Ok(candidates)
    }

    /// Check or coerce one candidate value.
    fn validate(&self, value: Value, _config: &Value) -> WireResult<Value> {
        Ok(value)
    }

    /// Transform the storage property name.
    fn target_property(&self, name: &str, _config: &Value) -> String {
        name.to_string()
    }

    /// Reassemble the final value to store from the validated candidates.
    fn recompose(
        &self,
        current: Value,
        _validated: &[Candidate],
        _config: &Value,
    ) -> WireResult<Value> {
        Ok(current)
    }
}
