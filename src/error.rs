//! Error types for the wiring container.

use std::fmt;

use crate::schema::SchemaError;

/// Wiring errors
///
/// Represents the error conditions that can occur while resolving references,
/// sorting definitions, or injecting and validating dependencies.
///
/// Every failure raised inside an injection definer is normalized at the
/// injector boundary: expected failures surface as [`WireError::Dependency`]
/// naming the offending property, anything else as [`WireError::Unexpected`].
/// Sort-time and resolve-time failures propagate unchanged with their full
/// diagnostic context.
///
/// # Examples
///
/// ```rust
/// use wirebox::WireError;
///
/// let cycle = WireError::CyclicDependency(vec![
///     "foo".to_string(),
///     "bar".to_string(),
///     "foo".to_string(),
/// ]);
/// assert_eq!(cycle.to_string(), "Cyclic dependency ['foo' < 'bar' < 'foo']");
///
/// let missing = WireError::UnresolvableReference("logger".to_string());
/// assert_eq!(missing.to_string(), "Cannot resolve 'logger' reference");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum WireError {
    /// A declared dependency has no injected value
    MissingDependency,
    /// A dependency value is present but fails validation
    BadDependency(String),
    /// A property is not present in the object's need contract (lists valid names)
    NotDefinedDependency(Vec<String>),
    /// A need contract entry is malformed
    BadDefinition(SchemaError),
    /// A dependency failure, attributed to the property being injected
    Dependency {
        /// The property whose injection failed.
        property: String,
        /// The underlying failure.
        source: Box<WireError>,
    },
    /// The definition graph has no valid instantiation order (includes path)
    CyclicDependency(Vec<String>),
    /// A reference names a key absent from the reference map
    UnresolvableReference(String),
    /// Concatenated references resolve to values that cannot be merged
    UnmergeableReferences(Vec<String>),
    /// A member access outside a restricted facade's exposure
    InaccessibleMember {
        /// The restricted object's type name.
        object: String,
        /// The member that was accessed.
        member: String,
    },
    /// A registry lookup for an unknown item key
    MissingItem {
        /// The registry's item type.
        item_type: String,
        /// The key that was looked up.
        key: String,
    },
    /// A service was requested before the container built it
    NotInstantiated(String),
    /// Anything else, always wrapping a cause description
    Unexpected(String),
}

fn quote_join(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("'{}'", item))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::MissingDependency => {
                write!(f, "Dependency has not been injected")
            }
            WireError::BadDependency(detail) => write!(f, "Bad dependency: {}", detail),
            WireError::NotDefinedDependency(names) => write!(
                f,
                "Dependency is not defined in the list of needed dependencies [{}]",
                quote_join(names)
            ),
            WireError::BadDefinition(cause) => write!(f, "Bad need definition: {}", cause),
            WireError::Dependency { property, source } => {
                write!(f, "[{}]: {}", property, source)
            }
            WireError::CyclicDependency(path) => {
                write!(
                    f,
                    "Cyclic dependency [{}]",
                    path.iter()
                        .map(|key| format!("'{}'", key))
                        .collect::<Vec<_>>()
                        .join(" < ")
                )
            }
            WireError::UnresolvableReference(path) => {
                write!(f, "Cannot resolve '{}' reference", path)
            }
            WireError::UnmergeableReferences(references) => {
                write!(f, "Cannot merge [{}] references", quote_join(references))
            }
            WireError::InaccessibleMember { object, member } => {
                write!(f, "'{}' is not accessible on restricted '{}'", member, object)
            }
            WireError::MissingItem { item_type, key } => {
                write!(f, "Unknown {} '{}'", item_type, key)
            }
            WireError::NotInstantiated(key) => {
                write!(f, "Service '{}' has not been instantiated", key)
            }
            WireError::Unexpected(cause) => write!(f, "Unexpected error ({})", cause),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WireError::Dependency { source, .. } => Some(source.as_ref()),
            WireError::BadDefinition(cause) => Some(cause),
            _ => None,
        }
    }
}

/// Result type for wiring operations
///
/// A convenience alias for `Result<T, WireError>` used throughout wirebox.
pub type WireResult<T> = Result<T, WireError>;
