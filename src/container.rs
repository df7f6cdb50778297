//! The container: orders definitions, resolves references, and produces
//! injected service instances.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::definition::Definition;
use crate::error::{WireError, WireResult};
use crate::injector::Injector;
use crate::reference::{self, ReferenceMap};
use crate::sorter;
use crate::value::{ServiceObject, Value};

/// Builds services from definitions in dependency order.
///
/// A build pass sorts the definitions, then walks them in order: each
/// definition's base is instantiated, its symbolic dependencies are resolved
/// against everything produced so far, and the resolved set is injected and
/// validated through the [`Injector`]. Produced services contribute their
/// nested field paths back to the reference map, so later definitions can
/// reference `#service.field.sub` directly.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use wirebox::{Container, Definition, Value};
///
/// let mut container = Container::standard();
/// container.add_definitions(vec![
///     Definition::new("config", json!({ "dsn": "postgres://localhost" })),
///     Definition::new("database", json!({}))
///         .with_dependency("dsn", "#config.dsn"),
/// ]);
/// container.build().unwrap();
///
/// let database = container.get("database").unwrap();
/// assert_eq!(
///     database.attr("dsn"),
///     Some(&Value::from("postgres://localhost"))
/// );
/// ```
pub struct Container {
    injector: Injector,
    definitions: Vec<Definition>,
    services: IndexMap<String, Value>,
}

impl Container {
    /// A container wired with the given injector.
    pub fn new(injector: Injector) -> Self {
        Container {
            injector,
            definitions: Vec::new(),
            services: IndexMap::new(),
        }
    }

    /// A container wired with the standard injector.
    pub fn standard() -> Self {
        Container::new(Injector::standard())
    }

    /// The container's injector.
    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    /// The container's injector, for registering extra definers.
    pub fn injector_mut(&mut self) -> &mut Injector {
        &mut self.injector
    }

    /// The currently registered definitions, in registration order.
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Register definitions, replacing any existing definition with the same
    /// key. Replaced keys keep nothing from the prior registration; new keys
    /// append in the given order.
    pub fn add_definitions(&mut self, definitions: Vec<Definition>) {
        for definition in definitions {
            self.definitions
                .retain(|existing| existing.key() != definition.key());
            self.definitions.push(definition);
        }
    }

    /// Build every registered definition in dependency order, replacing any
    /// previously built services.
    ///
    /// Definitions are never consumed, so rebuilding after registering more
    /// of them is always valid. A failed build leaves the prior service map
    /// untouched.
    pub fn build(&mut self) -> WireResult<()> {
        let sorted = sorter::sort(&self.definitions)?;
        debug!(count = sorted.len(), "building definitions");

        let mut references = ReferenceMap::new();
        let mut services = IndexMap::with_capacity(sorted.len());

        for definition in &sorted {
            let service = self.produce(definition, &references)?;
            // First writer wins: an earlier service owns any contested path.
            for (path, value) in reference::build_map(definition.key(), &service) {
                references.entry(path).or_insert(value);
            }
            services.insert(definition.key().to_string(), service);
        }

        self.services = services;
        Ok(())
    }

    fn produce(&self, definition: &Definition, references: &ReferenceMap) -> WireResult<Value> {
        trace!(key = definition.key(), "producing service");

        let mut instance = definition.instantiate();

        if let Some(need) = definition.need() {
            instance = match instance {
                Value::Object(mut object) => {
                    object.merge_need(need);
                    Value::Object(object)
                }
                // A bare data base gains type identity so the contract has a
                // place to live.
                Value::Data(attrs) => Value::Object(
                    ServiceObject::new(definition.key())
                        .with_members(attrs)
                        .with_need(need.clone()),
                ),
                other => other,
            };
        }

        let resolved = reference::resolve(
            &Value::Data(definition.dependencies().clone()),
            references,
        )?;
        let dependencies = match resolved {
            Value::Data(attrs) => attrs,
            other => {
                return Err(WireError::Unexpected(format!(
                    "dependencies of '{}' resolved to {}",
                    definition.key(),
                    other.type_label()
                )))
            }
        };

        self.injector.inject_set(&instance, &dependencies, true)
    }

    /// A built service by key.
    pub fn get(&self, key: &str) -> WireResult<&Value> {
        self.services
            .get(key)
            .ok_or_else(|| WireError::NotInstantiated(key.to_string()))
    }

    /// Keys of every built service, in production order.
    pub fn service_keys(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Drop all registered definitions and built services.
    pub fn clear(&mut self) {
        self.definitions.clear();
        self.services.clear();
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::standard()
    }
}
