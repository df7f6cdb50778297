//! Target-property renaming.

use crate::definers::InjectionDefiner;
use crate::schema::Schema;
use crate::value::Value;

/// Renames the storage property of a dependency.
///
/// Configured as a string naming the member the value is written to instead
/// of the contract property name.
pub struct PropertyDefiner;

impl InjectionDefiner for PropertyDefiner {
    fn schema(&self) -> Schema {
        Schema::string()
    }

    fn target_property(&self, name: &str, config: &Value) -> String {
        match config.as_str() {
            Some(target) => target.to_string(),
            None => name.to_string(),
        }
    }
}
