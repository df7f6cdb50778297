//! Schema compilation and validation for definition data.
//!
//! This is the validator backend behind the injection pipeline: definer
//! configuration schemas are merged into one compiled schema that validates
//! each need-contract entry, and the value definer compiles user-supplied
//! schema data to validate literal dependency values.
//!
//! Validation never mutates its input; it returns a fresh value with defaults
//! substituted.

use std::fmt;

use indexmap::IndexMap;

use crate::value::Value;

/// A schema violation, carrying the context path and what was expected.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Context path of the offending value (e.g. `Logger.printer.interface`).
    pub namespace: String,
    /// Description of the expected type.
    pub expected: String,
    /// Accepted values, when the schema constrains to an enumeration.
    pub expected_values: Vec<String>,
    /// Short description of the actual value.
    pub got: String,
}

impl SchemaError {
    fn new(namespace: &str, expected: &str, got: String) -> Self {
        SchemaError {
            namespace: namespace.to_string(),
            expected: expected.to_string(),
            expected_values: Vec::new(),
            got,
        }
    }

    fn required(namespace: &str, expected: &str) -> Self {
        SchemaError::new(namespace, expected, "nothing".to_string())
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expected_values.is_empty() {
            write!(
                f,
                "[{}]: expected {}, got {}",
                self.namespace, self.expected, self.got
            )
        } else {
            write!(
                f,
                "[{}]: expected {} (one of [{}]), got {}",
                self.namespace,
                self.expected,
                self.expected_values
                    .iter()
                    .map(|v| format!("'{}'", v))
                    .collect::<Vec<_>>()
                    .join(", "),
                self.got
            )
        }
    }
}

impl std::error::Error for SchemaError {}

/// The shape a schema accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// Any value.
    Any,
    /// A boolean.
    Bool,
    /// A number.
    Number,
    /// A string.
    Str,
    /// A string drawn from a fixed set of options.
    StrEnum {
        /// Description used in diagnostics (e.g. "a proxy injector key").
        expected: String,
        /// The accepted strings.
        options: Vec<String>,
    },
    /// A list, optionally with a per-item schema.
    List {
        /// Schema applied to each item, when given.
        items: Option<Box<Schema>>,
    },
    /// A data map with an enumerated property set; unknown keys are rejected.
    Map {
        /// Per-property schemas.
        properties: IndexMap<String, Schema>,
    },
    /// A data map with arbitrary content.
    AnyMap,
}

impl SchemaKind {
    fn describe(&self) -> &str {
        match self {
            SchemaKind::Any => "a value",
            SchemaKind::Bool => "a boolean",
            SchemaKind::Number => "a number",
            SchemaKind::Str => "a string",
            SchemaKind::StrEnum { expected, .. } => expected,
            SchemaKind::List { .. } => "a list",
            SchemaKind::Map { .. } | SchemaKind::AnyMap => "a data map",
        }
    }
}

/// A validation schema: a shape, a required flag, and an optional default
/// substituted for missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: SchemaKind,
    required: bool,
    default: Option<Value>,
}

impl Schema {
    fn of(kind: SchemaKind) -> Self {
        Schema {
            kind,
            required: false,
            default: None,
        }
    }

    /// Accept any value.
    pub fn any() -> Self {
        Schema::of(SchemaKind::Any)
    }

    /// Accept a boolean.
    pub fn bool() -> Self {
        Schema::of(SchemaKind::Bool)
    }

    /// Accept a number.
    pub fn number() -> Self {
        Schema::of(SchemaKind::Number)
    }

    /// Accept a string.
    pub fn string() -> Self {
        Schema::of(SchemaKind::Str)
    }

    /// Accept one of a fixed set of strings.
    pub fn string_enum(expected: impl Into<String>, options: Vec<String>) -> Self {
        Schema::of(SchemaKind::StrEnum {
            expected: expected.into(),
            options,
        })
    }

    /// Accept a list whose items each match the given schema.
    pub fn list_of(items: Schema) -> Self {
        Schema::of(SchemaKind::List {
            items: Some(Box::new(items)),
        })
    }

    /// Accept a data map with the given property schemas.
    pub fn map(properties: IndexMap<String, Schema>) -> Self {
        Schema::of(SchemaKind::Map { properties })
    }

    /// Accept any data map.
    pub fn any_map() -> Self {
        Schema::of(SchemaKind::AnyMap)
    }

    /// Mark the value as required: missing values without a default fail.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Substitute a default for missing values.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Build a schema from schema-describing data, as supplied to the value
    /// definer: `{type, required, default, items, properties}`.
    ///
    /// `type` is one of `any`, `boolean`, `number`, `string`, `array`,
    /// `object`; an `object` with `properties` enumerates and closes its
    /// property set, without `properties` it accepts any data map.
    pub fn from_value(value: &Value, namespace: &str) -> Result<Schema, SchemaError> {
        let map = match value {
            Value::Data(map) => map,
            other => {
                return Err(SchemaError::new(
                    namespace,
                    "a schema data map",
                    other.type_label().to_string(),
                ))
            }
        };

        let type_name = match map.get("type") {
            None => "any",
            Some(Value::String(name)) => name.as_str(),
            Some(other) => {
                return Err(SchemaError::new(
                    &format!("{}.type", namespace),
                    "a string",
                    other.type_label().to_string(),
                ))
            }
        };

        let kind = match type_name {
            "any" => SchemaKind::Any,
            "boolean" => SchemaKind::Bool,
            "number" => SchemaKind::Number,
            "string" => SchemaKind::Str,
            "array" => {
                let items = match map.get("items") {
                    None => None,
                    Some(items) => Some(Box::new(Schema::from_value(
                        items,
                        &format!("{}.items", namespace),
                    )?)),
                };
                SchemaKind::List { items }
            }
            "object" => match map.get("properties") {
                None => SchemaKind::AnyMap,
                Some(Value::Data(properties)) => {
                    let mut parsed = IndexMap::new();
                    for (name, property) in properties {
                        parsed.insert(
                            name.clone(),
                            Schema::from_value(
                                property,
                                &format!("{}.properties.{}", namespace, name),
                            )?,
                        );
                    }
                    SchemaKind::Map { properties: parsed }
                }
                Some(other) => {
                    return Err(SchemaError::new(
                        &format!("{}.properties", namespace),
                        "a data map",
                        other.type_label().to_string(),
                    ))
                }
            },
            other => {
                let mut err = SchemaError::new(
                    &format!("{}.type", namespace),
                    "a schema type",
                    format!("'{}'", other),
                );
                err.expected_values = ["any", "boolean", "number", "string", "array", "object"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                return Err(err);
            }
        };

        let mut schema = Schema::of(kind);
        if let Some(Value::Bool(true)) = map.get("required") {
            schema = schema.required();
        }
        if let Some(default) = map.get("default") {
            schema = schema.with_default(default.clone());
        }
        Ok(schema)
    }

    fn check(&self, value: Option<&Value>, namespace: &str) -> Result<Option<Value>, SchemaError> {
        let present = match value {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        };
        let value = match present {
            Some(value) => value,
            None => {
                if let Some(default) = &self.default {
                    return Ok(Some(default.clone()));
                }
                if self.required {
                    return Err(SchemaError::required(namespace, self.kind.describe()));
                }
                return Ok(None);
            }
        };

        let mismatch = || {
            SchemaError::new(
                namespace,
                self.kind.describe(),
                value.type_label().to_string(),
            )
        };

        match &self.kind {
            SchemaKind::Any => Ok(Some(value.clone())),
            SchemaKind::Bool => match value {
                Value::Bool(_) => Ok(Some(value.clone())),
                _ => Err(mismatch()),
            },
            SchemaKind::Number => match value {
                Value::Number(_) => Ok(Some(value.clone())),
                _ => Err(mismatch()),
            },
            SchemaKind::Str => match value {
                Value::String(_) => Ok(Some(value.clone())),
                _ => Err(mismatch()),
            },
            SchemaKind::StrEnum { expected, options } => match value {
                Value::String(s) if options.contains(s) => Ok(Some(value.clone())),
                Value::String(s) => {
                    let mut err =
                        SchemaError::new(namespace, expected, format!("'{}'", s));
                    err.expected_values = options.clone();
                    Err(err)
                }
                _ => Err(mismatch()),
            },
            SchemaKind::List { items } => match value {
                Value::List(values) => {
                    let Some(item_schema) = items else {
                        return Ok(Some(value.clone()));
                    };
                    let mut checked = Vec::with_capacity(values.len());
                    for (index, item) in values.iter().enumerate() {
                        let item_ns = format!("{}[{}]", namespace, index);
                        match item_schema.check(Some(item), &item_ns)? {
                            Some(valid) => checked.push(valid),
                            None => checked.push(Value::Null),
                        }
                    }
                    Ok(Some(Value::List(checked)))
                }
                _ => Err(mismatch()),
            },
            SchemaKind::Map { properties } => match value {
                Value::Data(map) => {
                    for key in map.keys() {
                        if !properties.contains_key(key) {
                            return Err(SchemaError::new(
                                namespace,
                                "a declared property",
                                format!("unexpected property '{}'", key),
                            ));
                        }
                    }
                    let mut checked = IndexMap::new();
                    for (name, property_schema) in properties {
                        let property_ns = format!("{}.{}", namespace, name);
                        if let Some(valid) =
                            property_schema.check(map.get(name), &property_ns)?
                        {
                            checked.insert(name.clone(), valid);
                        }
                    }
                    Ok(Some(Value::Data(checked)))
                }
                _ => Err(mismatch()),
            },
            SchemaKind::AnyMap => match value {
                Value::Data(_) => Ok(Some(value.clone())),
                _ => Err(mismatch()),
            },
        }
    }
}

/// Compilation options, per the validator interface: `required` demands a
/// present top-level value; `immutable` records that validation must not
/// write through its input (always the case here, outputs are fresh values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    /// Fail when the top-level value is missing and has no default.
    pub required: bool,
    /// Validation returns a fresh value rather than writing through.
    pub immutable: bool,
}

/// A schema paired with its compilation options, ready to validate values.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    schema: Schema,
    options: CompileOptions,
}

/// Compile a schema for repeated validation.
pub fn compile(schema: Schema, options: CompileOptions) -> CompiledSchema {
    CompiledSchema { schema, options }
}

impl CompiledSchema {
    /// Validate a value, returning a fresh value with defaults substituted.
    ///
    /// `namespace` labels diagnostics with the validation context.
    pub fn validate(&self, value: &Value, namespace: &str) -> Result<Value, SchemaError> {
        match self.schema.check(Some(value), namespace)? {
            Some(valid) => Ok(valid),
            None if self.options.required => Err(SchemaError::required(
                namespace,
                self.schema.kind.describe(),
            )),
            None => Ok(Value::Null),
        }
    }
}
