//! # wirebox
//!
//! Data-driven dependency wiring for Rust: definitions, symbolic references,
//! and a pluggable injection pipeline.
//!
//! ## Features
//!
//! - **Symbolic references**: `#service` strings in definition data resolve
//!   to built services, including nested field paths (`#config.dsn`) and
//!   concatenated merges (`#defaults#overrides`)
//! - **Dependency ordering**: a weight-based sorter instantiates services
//!   after everything they reference, with detailed cycle paths on failure
//! - **Pluggable definers**: per-property pipeline stages (`optional`,
//!   `property`, `proxy`, `value`, `interface`) configured by need contracts
//! - **Restricted facades**: interface checks narrow a dependency to its
//!   declared methods, getters, and setters
//! - **Immutable values**: every injection derives a fresh value; templates
//!   and built services are never mutated in place
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use wirebox::{attrs, Container, Contract, Definition, ServiceObject, Value};
//!
//! // A config service and a mailer that needs a piece of it.
//! let mailer = ServiceObject::new("Mailer")
//!     .with_method("send")
//!     .with_need(Contract::new().with("transport", attrs(json!({
//!         "value": { "type": "string" }
//!     }))));
//!
//! let mut container = Container::standard();
//! container.add_definitions(vec![
//!     Definition::new("config", json!({ "mail": { "transport": "smtp" } })),
//!     Definition::new("mailer", mailer)
//!         .with_dependency("transport", "#config.mail.transport"),
//! ]);
//! container.build().unwrap();
//!
//! let mailer = container.get("mailer").unwrap();
//! assert_eq!(mailer.attr("transport"), Some(&Value::from("smtp")));
//! ```
//!
//! ## References
//!
//! A reference is a `#`-prefixed path inside definition data. `##` escapes to
//! a literal sigil. Concatenated references merge left-to-right: data maps
//! shallow-merge (later wins), typed objects project flat onto a fresh
//! object, strings concatenate.
//!
//! ```rust
//! use wirebox::{reference, Value};
//!
//! assert_eq!(reference::find(&Value::from("#foo#bar")), vec!["foo", "bar"]);
//! assert!(reference::find(&Value::from("plain text")).is_empty());
//! ```
//!
//! ## Need Contracts
//!
//! A service object declares what it needs as a contract mapping property
//! names to definer configurations. The injector validates each entry
//! against the merged definer schema, then runs the configured definers as a
//! pipeline over the injected value.
//!
//! ```rust
//! use serde_json::json;
//! use wirebox::{attrs, Contract};
//!
//! let contract = Contract::new()
//!     .with("logger", attrs(json!({ "interface": { "methods": ["log"] } })))
//!     .with("retries", attrs(json!({ "optional": true })));
//! assert_eq!(contract.names(), vec!["logger", "retries"]);
//! ```

// Module declarations
pub mod container;
pub mod contract;
pub mod definers;
pub mod definition;
pub mod error;
pub mod injector;
pub mod proxies;
pub mod reference;
pub mod registry;
pub mod schema;
pub mod sorter;
pub mod value;

// Re-export core types
pub use container::Container;
pub use contract::{Contract, NeedSource};
pub use definers::{
    Candidate, InjectionDefiner, InterfaceDefiner, OptionalDefiner, PropertyDefiner, ProxyDefiner,
    Slot, ValueDefiner,
};
pub use definition::{Base, Definition};
pub use error::{WireError, WireResult};
pub use injector::Injector;
pub use proxies::{DirectProxy, ListProxy, ProxyInjector, RegistryProxy};
pub use reference::ReferenceMap;
pub use registry::Registry;
pub use schema::{CompileOptions, CompiledSchema, Schema, SchemaError, SchemaKind};
pub use value::{attrs, Attrs, Exposure, ServiceObject, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn end_to_end_build_with_nested_reference() {
        let mut container = Container::standard();
        container.add_definitions(vec![
            Definition::new("config", json!({ "db": { "dsn": "postgres://db" } })),
            Definition::new("database", json!({ "pool": 4 }))
                .with_dependency("dsn", "#config.db.dsn"),
        ]);
        container.build().unwrap();

        let database = container.get("database").unwrap();
        assert_eq!(database.attr("dsn"), Some(&Value::from("postgres://db")));
        assert_eq!(database.attr("pool"), Some(&Value::from(4i64)));
    }

    #[test]
    fn unbuilt_service_reports_not_instantiated() {
        let container = Container::standard();
        let error = container.get("ghost").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Service 'ghost' has not been instantiated"
        );
    }

    #[test]
    fn contract_violation_surfaces_property() {
        let service = ServiceObject::new("Api").with_need(
            Contract::new().with("token", attrs(json!({ "value": { "type": "string" } }))),
        );
        let mut container = Container::standard();
        container.add_definitions(vec![
            Definition::new("api", service).with_dependency("token", 42i64),
        ]);

        let error = container.build().unwrap_err();
        assert!(matches!(
            error,
            WireError::Dependency { ref property, .. } if property == "token"
        ));
    }
}
