//! The injector: drives the definer pipeline against an object's need
//! contract.
//!
//! Injection never mutates its argument: dependencies are written onto a
//! fresh derivation of the object, so repeated re-injection and
//! re-validation are always safe.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use crate::contract::Contract;
use crate::definers::{
    Candidate, InjectionDefiner, InterfaceDefiner, OptionalDefiner, PropertyDefiner, ProxyDefiner,
    Slot, ValueDefiner,
};
use crate::error::{WireError, WireResult};
use crate::schema::{self, CompileOptions, CompiledSchema, Schema};
use crate::value::{Attrs, Value};

/// Applies the definer pipeline to validate, transform, and store each
/// dependency of an object.
///
/// Definers are registered under string keys at composition time; their
/// configuration schemas merge into one compiled schema that validates every
/// need-contract entry before the pipeline runs. Definer failures are
/// normalized at this boundary: expected failures become
/// [`WireError::Dependency`] naming the property, anything else becomes
/// [`WireError::Unexpected`].
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use wirebox::{attrs, Contract, Injector, ServiceObject, Value};
///
/// let injector = Injector::standard();
/// let service = ServiceObject::new("Mailer").with_need(
///     Contract::new().with("transport", attrs(json!({ "optional": true }))),
/// );
///
/// let injected = injector
///     .inject(&Value::from(service), "transport", Value::from("smtp"))
///     .unwrap();
/// assert_eq!(injected.attr("transport"), Some(&Value::from("smtp")));
/// ```
pub struct Injector {
    definers: Vec<(String, Arc<dyn InjectionDefiner>)>,
    contract_schema: CompiledSchema,
}

impl Injector {
    /// An injector with no registered definers.
    ///
    /// Without definers, need-contract entries only accept empty
    /// configurations; register definers to give them meaning.
    pub fn new() -> Self {
        Injector {
            definers: Vec::new(),
            contract_schema: schema::compile(
                Schema::map(IndexMap::new()),
                CompileOptions {
                    required: true,
                    immutable: true,
                },
            ),
        }
    }

    /// An injector with the standard definer chain: `optional`, `property`,
    /// `proxy` (with the standard proxies), `value`, `interface`.
    pub fn standard() -> Self {
        let mut injector = Injector::new();
        injector.set_injection_definer("optional", Arc::new(OptionalDefiner));
        injector.set_injection_definer("property", Arc::new(PropertyDefiner));
        injector.set_injection_definer("proxy", Arc::new(ProxyDefiner::standard()));
        injector.set_injection_definer("value", Arc::new(ValueDefiner));
        injector.set_injection_definer("interface", Arc::new(InterfaceDefiner));
        injector
    }

    /// Register an injection definer under a key, replacing any previous
    /// registration, and recompile the merged contract schema.
    pub fn set_injection_definer(&mut self, key: impl Into<String>, definer: Arc<dyn InjectionDefiner>) {
        let key = key.into();
        match self.definers.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = definer,
            None => self.definers.push((key, definer)),
        }
        self.recompile_contract_schema();
    }

    fn recompile_contract_schema(&mut self) {
        let properties: IndexMap<String, Schema> = self
            .definers
            .iter()
            .map(|(key, definer)| (key.clone(), definer.schema()))
            .collect();
        self.contract_schema = schema::compile(
            Schema::map(properties),
            CompileOptions {
                required: true,
                immutable: true,
            },
        );
    }

    /// Inject a single dependency, validating nothing else.
    ///
    /// Sugar for [`Injector::inject_set`] with a single-entry map.
    pub fn inject(&self, object: &Value, property: &str, dependency: Value) -> WireResult<Value> {
        let mut dependencies = Attrs::new();
        dependencies.insert(property.to_string(), dependency);
        self.inject_set(object, &dependencies, false)
    }

    /// Inject a set of dependencies onto a fresh derivation of `object`.
    ///
    /// Each property is looked up in the object's need contract: a contract
    /// that exists but omits the property fails with
    /// `NotDefinedDependency` listing all valid names; contract-less objects
    /// accept anything unchecked. When `validate` is set, the injected
    /// object is immediately re-validated.
    pub fn inject_set(
        &self,
        object: &Value,
        dependencies: &Attrs,
        validate: bool,
    ) -> WireResult<Value> {
        let injected = self.inject_dependencies(object, dependencies)?;
        if validate {
            self.validate(&injected)
        } else {
            Ok(injected)
        }
    }

    /// Run the full pipeline over every contract property and re-inject,
    /// returning a new, fully validated derivation.
    ///
    /// Objects declaring no contract are returned unchanged.
    pub fn validate(&self, object: &Value) -> WireResult<Value> {
        let Some(contract) = need_contract(object) else {
            return Ok(object.clone());
        };
        let context = context_name(object);

        let mut validated_dependencies = Attrs::new();
        for (property, _) in contract.iter() {
            let config = self
                .property_config(&contract, &context, property)?
                .unwrap_or_default();
            let chain = self.configured_definers(&config);
            let target = self.target_property_for(&config, property);
            let stored = stored_value(object, &target);

            // Sourcing
            let mut candidates = vec![Candidate::whole(stored.clone())];
            for &(key, definer) in &chain {
                candidates = definer
                    .source(candidates, config_of(&config, key))
                    .map_err(|error| attribute(error, property))?;
            }

            // Validating
            let mut validated = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                let mut value = candidate.value;
                for &(key, definer) in &chain {
                    value = definer
                        .validate(value, config_of(&config, key))
                        .map_err(|error| attribute(error, property))?;
                }
                validated.push(Candidate {
                    slot: candidate.slot,
                    value,
                });
            }

            // Recomposing
            let mut final_value = stored;
            if validated.len() == 1 && validated[0].slot == Slot::Whole {
                final_value = validated[0].value.clone();
            }
            for &(key, definer) in &chain {
                final_value = definer
                    .recompose(final_value, &validated, config_of(&config, key))
                    .map_err(|error| attribute(error, property))?;
            }

            trace!(property = %property, "dependency validated");
            validated_dependencies.insert(property.clone(), final_value);
        }

        self.inject_dependencies(object, &validated_dependencies)
    }

    fn inject_dependencies(&self, object: &Value, dependencies: &Attrs) -> WireResult<Value> {
        let contract = need_contract(object);
        let context = context_name(object);
        let mut derived = object.clone();

        for (property, value) in dependencies {
            let config = match &contract {
                Some(contract) => self.property_config(contract, &context, property)?,
                None => None,
            };
            let target = match &config {
                Some(config) => self.target_property_for(config, property),
                None => property.clone(),
            };
            match &mut derived {
                Value::Data(attrs) => {
                    attrs.insert(target, value.clone());
                }
                Value::Object(instance) => {
                    instance.put_member(target, value.clone());
                }
                other => {
                    return Err(WireError::Unexpected(format!(
                        "cannot inject '{}' into {} value",
                        property,
                        other.type_label()
                    )))
                }
            }
        }
        Ok(derived)
    }

    /// Validate one contract entry against the merged definer schema.
    fn property_config(
        &self,
        contract: &Contract,
        context: &str,
        property: &str,
    ) -> WireResult<Option<Attrs>> {
        let Some(config) = contract.get(property) else {
            return Err(WireError::Dependency {
                property: property.to_string(),
                source: Box::new(WireError::NotDefinedDependency(contract.names())),
            });
        };
        let namespace = format!("{}.{}", context, property);
        match self
            .contract_schema
            .validate(&Value::Data(config.clone()), &namespace)
        {
            Ok(Value::Data(validated)) => Ok(Some(validated)),
            Ok(_) => Ok(Some(Attrs::new())),
            Err(error) => Err(WireError::Dependency {
                property: property.to_string(),
                source: Box::new(WireError::BadDefinition(error)),
            }),
        }
    }

    /// The definers configured for a property, in registration order.
    fn configured_definers(&self, config: &Attrs) -> Vec<(&str, &Arc<dyn InjectionDefiner>)> {
        self.definers
            .iter()
            .filter(|(key, _)| config.contains_key(key))
            .map(|(key, definer)| (key.as_str(), definer))
            .collect()
    }

    fn target_property_for(&self, config: &Attrs, default: &str) -> String {
        self.configured_definers(config)
            .into_iter()
            .fold(default.to_string(), |name, (key, definer)| {
                definer.target_property(&name, config_of(config, key))
            })
    }
}

impl Default for Injector {
    fn default() -> Self {
        Injector::standard()
    }
}

fn config_of<'a>(config: &'a Attrs, key: &str) -> &'a Value {
    config.get(key).unwrap_or(&Value::Null)
}

/// The object's need contract, if it declares one.
fn need_contract(object: &Value) -> Option<Contract> {
    object.as_object().and_then(|o| o.need_contract())
}

fn context_name(object: &Value) -> String {
    match object.as_object() {
        Some(o) => o.type_name().to_string(),
        None => "service".to_string(),
    }
}

fn stored_value(object: &Value, target: &str) -> Value {
    object.attr(target).cloned().unwrap_or(Value::Null)
}

/// Attribute an expected definer failure to its property; wrap anything
/// unexpected.
fn attribute(error: WireError, property: &str) -> WireError {
    match error {
        WireError::MissingDependency | WireError::BadDependency(_) => WireError::Dependency {
            property: property.to_string(),
            source: Box::new(error),
        },
        already @ WireError::Dependency { .. } => already,
        other => WireError::Unexpected(other.to_string()),
    }
}
