//! Interface narrowing and facade restriction.

use std::collections::BTreeSet;

use crate::definers::InjectionDefiner;
use crate::error::{WireError, WireResult};
use crate::schema::Schema;
use crate::value::{Exposure, Value};

/// Checks a dependency against a declared interface and narrows access.
///
/// The configuration lists required method, getter, and setter names
/// (defaulting to empty lists). A value missing any required capability
/// fails with `BadDependency` naming each missing member explicitly; a
/// conforming value is wrapped in a restricted facade exposing only the
/// declared capability sets.
pub struct InterfaceDefiner;

fn required_names(config: &Value, category: &str) -> Vec<String> {
    match config.attr(category) {
        Some(Value::List(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn describe(category: &str, required: &[String], missing: &[String]) -> String {
    let listed = required.join(", ");
    if missing.is_empty() {
        format!("[{}] {}", listed, category)
    } else {
        format!("[{}] {} (missing: {})", listed, category, missing.join(", "))
    }
}

impl InjectionDefiner for InterfaceDefiner {
    fn schema(&self) -> Schema {
        let names = Schema::list_of(Schema::string()).with_default(Value::List(Vec::new()));
        Schema::map(
            [
                ("methods".to_string(), names.clone()),
                ("getters".to_string(), names.clone()),
                ("setters".to_string(), names),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn validate(&self, value: Value, config: &Value) -> WireResult<Value> {
        if value.is_null() {
            return Ok(value);
        }
        let object = match &value {
            Value::Object(object) => object,
            other => {
                return Err(WireError::BadDependency(format!(
                    "expected an object, got {}",
                    other.type_label()
                )))
            }
        };

        let methods = required_names(config, "methods");
        let getters = required_names(config, "getters");
        let setters = required_names(config, "setters");

        let missing_methods: Vec<String> = methods
            .iter()
            .filter(|name| !object.has_method(name))
            .cloned()
            .collect();
        let missing_getters: Vec<String> = getters
            .iter()
            .filter(|name| !object.has_getter(name))
            .cloned()
            .collect();
        let missing_setters: Vec<String> = setters
            .iter()
            .filter(|name| !object.has_setter(name))
            .cloned()
            .collect();

        if !missing_methods.is_empty()
            || !missing_getters.is_empty()
            || !missing_setters.is_empty()
        {
            return Err(WireError::BadDependency(format!(
                "expected an object implementing {}, {}, {}",
                describe("methods", &methods, &missing_methods),
                describe("getters", &getters, &missing_getters),
                describe("setters", &setters, &missing_setters),
            )));
        }

        let exposure = Exposure {
            methods: methods.into_iter().collect::<BTreeSet<_>>(),
            getters: getters.into_iter().collect::<BTreeSet<_>>(),
            setters: setters.into_iter().collect::<BTreeSet<_>>(),
        };
        Ok(Value::Object(object.restrict(exposure)))
    }
}
