//! Literal-value schema validation.

use crate::definers::InjectionDefiner;
use crate::error::{WireError, WireResult};
use crate::schema::{self, CompileOptions, Schema};
use crate::value::Value;

/// Validates a literal dependency value against a data-driven schema.
///
/// The definer configuration is itself schema data (`{type, required,
/// default, items, properties}`). A null value passes untouched so
/// optionality stays the optional definer's concern; any other mismatch
/// fails with `BadDependency` carrying the schema diagnostic.
pub struct ValueDefiner;

impl InjectionDefiner for ValueDefiner {
    fn schema(&self) -> Schema {
        Schema::any_map()
    }

    fn validate(&self, value: Value, config: &Value) -> WireResult<Value> {
        if config.is_null() {
            return Ok(value);
        }
        let compiled = match Schema::from_value(config, "value") {
            Ok(schema) => schema::compile(
                schema,
                CompileOptions {
                    required: true,
                    immutable: true,
                },
            ),
            Err(error) => {
                if value.is_null() {
                    return Ok(value);
                }
                return Err(WireError::BadDependency(error.to_string()));
            }
        };
        match compiled.validate(&value, "value") {
            Ok(validated) => Ok(validated),
            Err(_) if value.is_null() => Ok(value),
            Err(error) => Err(WireError::BadDependency(error.to_string())),
        }
    }
}
