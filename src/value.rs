//! Runtime value model for definition data and service instances.
//!
//! Definitions, dependencies, and built services are all expressed as
//! [`Value`] trees. Plain data (`Value::Data`) is transparent to the
//! reference algebra, while values carrying extra type identity
//! ([`ServiceObject`], [`Registry`], lists) are opaque dependency values.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;

use crate::contract::{Contract, NeedSource};
use crate::error::{WireError, WireResult};
use crate::registry::Registry;

/// Ordered string-keyed map of values.
///
/// Insertion order is preserved, which backs the first-seen ordering
/// guarantees of reference extraction.
pub type Attrs = IndexMap<String, Value>;

/// A runtime value: definition data, a dependency, or a built service.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer or float, JSON semantics.
    Number(serde_json::Number),
    /// String, possibly carrying embedded references.
    String(String),
    /// List of values. Opaque to reference scanning.
    List(Vec<Value>),
    /// Bare data container, scanned and rewritten recursively.
    Data(Attrs),
    /// Service object carrying type identity. Opaque to reference scanning.
    Object(ServiceObject),
    /// Keyed item collection. Opaque to reference scanning.
    Registry(Registry),
}

impl Value {
    /// Whether this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short human-readable label for diagnostics.
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::List(_) => "a list",
            Value::Data(_) => "a data map",
            Value::Object(_) => "an object",
            Value::Registry(_) => "a registry",
        }
    }

    /// String content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Data map content, if this is a bare data container.
    pub fn as_data(&self) -> Option<&Attrs> {
        match self {
            Value::Data(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Service object content, if this value carries type identity.
    pub fn as_object(&self) -> Option<&ServiceObject> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Registry content, if this is a registry value.
    pub fn as_registry(&self) -> Option<&Registry> {
        match self {
            Value::Registry(registry) => Some(registry),
            _ => None,
        }
    }

    /// Look up a named field on a data map or service object.
    ///
    /// Service-object lookups go through the unrestricted member table; use
    /// [`ServiceObject::member`] to honor a facade's exposure.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Data(attrs) => attrs.get(name),
            Value::Object(object) => object.member_raw(name),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Attrs> for Value {
    fn from(value: Attrs) -> Self {
        Value::Data(value)
    }
}

impl From<ServiceObject> for Value {
    fn from(value: ServiceObject) -> Self {
        Value::Object(value)
    }
}

impl From<Registry> for Value {
    fn from(value: Registry) -> Self {
        Value::Registry(value)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(values: Vec<V>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Data(
                map.into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect(),
            ),
        }
    }
}

/// Convert a JSON object literal into an [`Attrs`] map.
///
/// Non-object values convert to an empty map. Convenient with `json!`:
///
/// ```rust
/// use serde_json::json;
/// use wirebox::attrs;
///
/// let config = attrs(json!({ "optional": true }));
/// assert!(config.get("optional").is_some());
/// ```
pub fn attrs(value: serde_json::Value) -> Attrs {
    match Value::from(value) {
        Value::Data(map) => map,
        _ => Attrs::new(),
    }
}

/// The members and capabilities a restricted facade exposes.
///
/// Produced by the interface definer: a facade only permits reading members
/// listed as methods or getters and writing members listed as setters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exposure {
    /// Exposed method names.
    pub methods: BTreeSet<String>,
    /// Exposed getter names.
    pub getters: BTreeSet<String>,
    /// Exposed setter names.
    pub setters: BTreeSet<String>,
}

impl Exposure {
    fn permits_read(&self, name: &str) -> bool {
        self.methods.contains(name) || self.getters.contains(name)
    }

    fn permits_write(&self, name: &str) -> bool {
        self.setters.contains(name)
    }
}

/// A service value carrying type identity beyond a bare data container.
///
/// A service object holds ordered data members plus three declared capability
/// sets (methods, getters, setters) standing in for runtime introspection:
/// interface checks compare required names against the declared sets. It may
/// also self-declare a need contract and may be restricted by an [`Exposure`]
/// facade.
///
/// All derivations are record updates on a fresh copy; nothing mutates a
/// stored instance.
///
/// # Examples
///
/// ```rust
/// use wirebox::ServiceObject;
///
/// let logger = ServiceObject::new("Logger")
///     .with_member("level", "info")
///     .with_method("log");
///
/// assert!(logger.has_method("log"));
/// assert_eq!(logger.member("level").unwrap().and_then(|v| v.as_str()), Some("info"));
/// ```
#[derive(Clone)]
pub struct ServiceObject {
    type_name: String,
    members: Attrs,
    methods: BTreeSet<String>,
    getters: BTreeSet<String>,
    setters: BTreeSet<String>,
    exposure: Option<Exposure>,
    need: Option<NeedSource>,
}

impl ServiceObject {
    /// Create an empty service object with the given type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        ServiceObject {
            type_name: type_name.into(),
            members: Attrs::new(),
            methods: BTreeSet::new(),
            getters: BTreeSet::new(),
            setters: BTreeSet::new(),
            exposure: None,
            need: None,
        }
    }

    /// Add a data member.
    pub fn with_member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    /// Add several data members at once.
    pub fn with_members(mut self, members: Attrs) -> Self {
        self.members.extend(members);
        self
    }

    /// Declare a method capability.
    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.methods.insert(name.into());
        self
    }

    /// Declare a getter capability.
    pub fn with_getter(mut self, name: impl Into<String>) -> Self {
        self.getters.insert(name.into());
        self
    }

    /// Declare a setter capability.
    pub fn with_setter(mut self, name: impl Into<String>) -> Self {
        self.setters.insert(name.into());
        self
    }

    /// Declare a static need contract.
    pub fn with_need(mut self, contract: Contract) -> Self {
        self.need = Some(NeedSource::Static(contract));
        self
    }

    /// Declare a deferred need contract, produced on first read.
    pub fn with_deferred_need<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Contract + Send + Sync + 'static,
    {
        self.need = Some(NeedSource::deferred(producer));
        self
    }

    /// The object's type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The object's data members, ignoring any exposure restriction.
    pub fn members(&self) -> &Attrs {
        &self.members
    }

    /// Declared method names.
    pub fn methods(&self) -> &BTreeSet<String> {
        &self.methods
    }

    /// Declared getter names.
    pub fn getters(&self) -> &BTreeSet<String> {
        &self.getters
    }

    /// Declared setter names.
    pub fn setters(&self) -> &BTreeSet<String> {
        &self.setters
    }

    /// Whether the object declares the named method.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    /// Whether the object declares the named getter.
    pub fn has_getter(&self, name: &str) -> bool {
        self.getters.contains(name)
    }

    /// Whether the object declares the named setter.
    pub fn has_setter(&self, name: &str) -> bool {
        self.setters.contains(name)
    }

    /// The facade exposure, if this object is restricted.
    pub fn exposure(&self) -> Option<&Exposure> {
        self.exposure.as_ref()
    }

    /// Read a member, honoring a facade's exposure.
    ///
    /// Unrestricted objects allow any read. On a restricted facade, reading a
    /// member outside the exposed methods and getters fails with
    /// [`WireError::InaccessibleMember`].
    pub fn member(&self, name: &str) -> WireResult<Option<&Value>> {
        if let Some(exposure) = &self.exposure {
            if !exposure.permits_read(name) {
                return Err(WireError::InaccessibleMember {
                    object: self.type_name.clone(),
                    member: name.to_string(),
                });
            }
        }
        Ok(self.members.get(name))
    }

    /// Derive a copy with one member replaced, honoring a facade's exposure.
    pub fn write_member(&self, name: &str, value: Value) -> WireResult<ServiceObject> {
        if let Some(exposure) = &self.exposure {
            if !exposure.permits_write(name) {
                return Err(WireError::InaccessibleMember {
                    object: self.type_name.clone(),
                    member: name.to_string(),
                });
            }
        }
        let mut derived = self.clone();
        derived.members.insert(name.to_string(), value);
        Ok(derived)
    }

    /// Unrestricted member read, used by the injection machinery.
    pub(crate) fn member_raw(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    /// Unrestricted member write, used by the injection machinery.
    pub(crate) fn put_member(&mut self, name: String, value: Value) {
        self.members.insert(name, value);
    }

    /// The object's need contract, producing it if declared deferred.
    pub fn need_contract(&self) -> Option<Contract> {
        self.need.as_ref().map(NeedSource::contract)
    }

    /// Merge extra contract entries into the object's need, extra entries
    /// winning on conflict.
    pub(crate) fn merge_need(&mut self, extra: &Contract) {
        let merged = self
            .need_contract()
            .unwrap_or_default()
            .merged_with(extra);
        self.need = Some(NeedSource::Static(merged));
    }

    /// Derive a restricted facade exposing only the given capability sets.
    pub fn restrict(&self, exposure: Exposure) -> ServiceObject {
        let mut facade = self.clone();
        facade.exposure = Some(exposure);
        facade
    }

    /// Flat projection of two objects onto a fresh one, the right side
    /// winning on member conflicts and capability sets unioned so the merged
    /// value stays functionally live.
    pub(crate) fn project(left: &ServiceObject, right: &ServiceObject) -> ServiceObject {
        let mut members = left.members.clone();
        for (name, value) in &right.members {
            members.insert(name.clone(), value.clone());
        }
        ServiceObject {
            type_name: right.type_name.clone(),
            members,
            methods: left.methods.union(&right.methods).cloned().collect(),
            getters: left.getters.union(&right.getters).cloned().collect(),
            setters: left.setters.union(&right.setters).cloned().collect(),
            exposure: None,
            need: right.need.clone().or_else(|| left.need.clone()),
        }
    }

    /// View a bare data map as a plain service object, for merging.
    pub(crate) fn from_data(type_name: &str, attrs: &Attrs) -> ServiceObject {
        ServiceObject::new(type_name).with_members(attrs.clone())
    }
}

impl fmt::Debug for ServiceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceObject")
            .field("type_name", &self.type_name)
            .field("members", &self.members)
            .field("methods", &self.methods)
            .field("getters", &self.getters)
            .field("setters", &self.setters)
            .field("exposure", &self.exposure)
            .field("need", &self.need)
            .finish()
    }
}

impl PartialEq for ServiceObject {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.members == other.members
            && self.methods == other.methods
            && self.getters == other.getters
            && self.setters == other.setters
            && self.exposure == other.exposure
            && self.need == other.need
    }
}
