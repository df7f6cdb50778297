//! Optional-dependency semantics.

use crate::definers::{Candidate, InjectionDefiner};
use crate::error::{WireError, WireResult};
use crate::schema::Schema;
use crate::value::Value;

/// Declares whether a dependency may be left uninjected.
///
/// Configured as a boolean defaulting to `false`, so every contract property
/// is required unless explicitly marked optional: a missing (null) value on
/// a non-optional dependency fails with `MissingDependency`.
pub struct OptionalDefiner;

impl InjectionDefiner for OptionalDefiner {
    fn schema(&self) -> Schema {
        Schema::bool().with_default(false)
    }

    fn source(&self, candidates: Vec<Candidate>, config: &Value) -> WireResult<Vec<Candidate>> {
        let optional = config.as_bool().unwrap_or(false);
        let only_missing = candidates.len() <= 1
            && candidates
                .first()
                .map(|candidate| candidate.value.is_null())
                .unwrap_or(true);
        if !optional && only_missing {
            return Err(WireError::MissingDependency);
        }
        Ok(candidates)
    }
}
