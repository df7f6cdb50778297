//! Reference algebra: find, resolve, and namespace symbolic `#` references
//! embedded in definition data.
//!
//! A reference is a string beginning with an unescaped sigil (`#`) followed
//! by a dotted path. One string may concatenate several references
//! back-to-back (`#a#b` merges the resolutions of `a` and `b`). A doubled
//! sigil (`##`) escapes to a literal sigil and never opens or splits a
//! reference; the extracted path text keeps the doubled sigil verbatim, so
//! lookups use the raw segment.
//!
//! Every operation here is pure: inputs are never mutated, outputs are fresh
//! values.

use indexmap::IndexMap;

use crate::definition::Definition;
use crate::error::{WireError, WireResult};
use crate::value::{Attrs, ServiceObject, Value};

/// Map from reference path to resolved value, accumulated during a build.
pub type ReferenceMap = IndexMap<String, Value>;

/// Depth bound for reference-map construction over nested values.
const MAP_MAX_DEPTH: usize = 8;
/// Total entry bound for reference-map construction.
const MAP_MAX_ENTRIES: usize = 256;

const SIGIL: char = '#';

/// Extract the reference segments of a reference-bearing string.
///
/// Returns `None` when the string is not reference-bearing: it must start
/// with a single (unescaped) sigil. Segment boundaries are isolated sigils,
/// a sigil with a non-sigil on both sides; doubled sigils stay inside their
/// segment.
fn scan(text: &str) -> Option<Vec<String>> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 2 || chars[0] != SIGIL || chars[1] == SIGIL {
        return None;
    }

    let mut boundaries = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        if c != SIGIL {
            continue;
        }
        let opens = i == 0 || chars[i - 1] != SIGIL;
        let closes = i + 1 < chars.len() && chars[i + 1] != SIGIL;
        if opens && closes {
            boundaries.push(i);
        }
    }

    let mut segments = Vec::with_capacity(boundaries.len());
    for (n, &start) in boundaries.iter().enumerate() {
        let end = boundaries.get(n + 1).copied().unwrap_or(chars.len());
        let segment: String = chars[start + 1..end].iter().collect();
        if !segment.is_empty() {
            segments.push(segment);
        }
    }
    Some(segments)
}

/// Find every reference inside a value, in first-seen order.
///
/// Recurses through bare data containers only; lists, service objects, and
/// registries are opaque dependency values. Duplicates are preserved.
///
/// # Examples
///
/// ```rust
/// use wirebox::{reference, Value};
///
/// assert_eq!(reference::find(&Value::from("#foo#bar")), vec!["foo", "bar"]);
/// assert!(reference::find(&Value::from("##foo")).is_empty());
/// assert_eq!(
///     reference::find(&Value::from("#foo##bar#foobar")),
///     vec!["foo##bar", "foobar"]
/// );
/// ```
pub fn find(value: &Value) -> Vec<String> {
    let mut references = Vec::new();
    collect_references(value, &mut references);
    references
}

/// Find every reference inside an attribute map, in first-seen order.
pub(crate) fn find_in_attrs(attrs: &Attrs) -> Vec<String> {
    let mut references = Vec::new();
    for value in attrs.values() {
        collect_references(value, &mut references);
    }
    references
}

fn collect_references(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Data(attrs) => {
            for nested in attrs.values() {
                collect_references(nested, out);
            }
        }
        Value::String(text) => {
            if let Some(segments) = scan(text) {
                out.extend(segments);
            }
        }
        _ => {}
    }
}

/// Resolve every reference inside a value against a reference map.
///
/// A string containing exactly one reference resolves to the referenced
/// value's own type. Concatenated references merge left-to-right:
///
/// - two bare data maps shallow-merge, the later reference winning on
///   conflicting fields;
/// - when either side carries type identity, both sides' fields are
///   projected flat onto a fresh service object (members merged later-wins,
///   capability sets unioned) so the merged value stays functionally live;
/// - two registries merge their items, the later winning;
/// - two strings concatenate;
/// - anything else fails with [`WireError::UnmergeableReferences`] naming
///   the full reference list.
///
/// A reference absent from the map fails with
/// [`WireError::UnresolvableReference`] naming the path.
pub fn resolve(value: &Value, map: &ReferenceMap) -> WireResult<Value> {
    match value {
        Value::Data(attrs) => {
            let mut resolved = Attrs::with_capacity(attrs.len());
            for (key, nested) in attrs {
                resolved.insert(key.clone(), resolve(nested, map)?);
            }
            Ok(Value::Data(resolved))
        }
        Value::String(text) => match scan(text) {
            None => Ok(value.clone()),
            Some(references) => resolve_references(&references, map),
        },
        other => Ok(other.clone()),
    }
}

fn lookup(reference: &str, map: &ReferenceMap) -> WireResult<Value> {
    map.get(reference)
        .cloned()
        .ok_or_else(|| WireError::UnresolvableReference(reference.to_string()))
}

fn resolve_references(references: &[String], map: &ReferenceMap) -> WireResult<Value> {
    let mut accumulated: Option<Value> = None;
    for reference in references {
        let next = lookup(reference, map)?;
        accumulated = Some(match accumulated {
            None => next,
            Some(current) => merge(current, next, references)?,
        });
    }
    Ok(accumulated.unwrap_or(Value::Null))
}

fn merge(left: Value, right: Value, references: &[String]) -> WireResult<Value> {
    match (left, right) {
        (Value::Data(mut a), Value::Data(b)) => {
            for (key, value) in b {
                a.insert(key, value);
            }
            Ok(Value::Data(a))
        }
        (Value::Object(a), Value::Object(b)) => {
            Ok(Value::Object(ServiceObject::project(&a, &b)))
        }
        (Value::Object(a), Value::Data(b)) => {
            let plain = ServiceObject::from_data(a.type_name(), &b);
            Ok(Value::Object(ServiceObject::project(&a, &plain)))
        }
        (Value::Data(a), Value::Object(b)) => {
            let plain = ServiceObject::from_data(b.type_name(), &a);
            Ok(Value::Object(ServiceObject::project(&plain, &b)))
        }
        (Value::Registry(a), Value::Registry(b)) => {
            let mut merged = b.fresh();
            for (key, item) in a.map() {
                merged.set(key.clone(), item.clone());
            }
            for (key, item) in b.map() {
                merged.set(key.clone(), item.clone());
            }
            Ok(Value::Registry(merged))
        }
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
        _ => Err(WireError::UnmergeableReferences(references.to_vec())),
    }
}

/// Build the reference-map entries contributed by one produced instance.
///
/// Emits `{namespace: value}` plus one entry per reachable nested field path
/// (`namespace.field`, `namespace.field.sub`, ...) across data-map entries
/// and service-object members, depth-first, bounded in depth and total entry
/// count.
pub fn build_map(namespace: &str, value: &Value) -> ReferenceMap {
    let mut map = ReferenceMap::new();
    map.insert(namespace.to_string(), value.clone());
    collect_paths(namespace, value, &mut map, 0);
    map
}

fn collect_paths(prefix: &str, value: &Value, out: &mut ReferenceMap, depth: usize) {
    if depth >= MAP_MAX_DEPTH {
        return;
    }
    let fields: Vec<(&String, &Value)> = match value {
        Value::Data(attrs) => attrs.iter().collect(),
        Value::Object(object) => object.members().iter().collect(),
        _ => return,
    };
    for (name, nested) in fields {
        if out.len() >= MAP_MAX_ENTRIES {
            return;
        }
        let path = format!("{}.{}", prefix, name);
        out.insert(path.clone(), nested.clone());
        collect_paths(&path, nested, out, depth + 1);
    }
}

/// Namespace-qualify every reference inside each definition's dependencies.
///
/// Non-reference values are untouched; dependency keys are re-derived on the
/// returned definitions.
pub fn prefix(namespace: &str, definitions: &[Definition]) -> Vec<Definition> {
    definitions
        .iter()
        .map(|definition| {
            let mut prefixed = Attrs::with_capacity(definition.dependencies().len());
            for (name, value) in definition.dependencies() {
                prefixed.insert(name.clone(), prefix_value(namespace, value));
            }
            definition.clone().replace_dependencies(prefixed)
        })
        .collect()
}

fn prefix_value(namespace: &str, value: &Value) -> Value {
    match value {
        Value::Data(attrs) => {
            let mut prefixed = Attrs::with_capacity(attrs.len());
            for (key, nested) in attrs {
                prefixed.insert(key.clone(), prefix_value(namespace, nested));
            }
            Value::Data(prefixed)
        }
        Value::String(text) => match scan(text) {
            None => value.clone(),
            Some(references) => {
                let qualified: Vec<String> = references
                    .iter()
                    .map(|reference| format!("{}.{}", namespace, reference))
                    .collect();
                Value::String(format!("#{}", qualified.join("#")))
            }
        },
        other => other.clone(),
    }
}
