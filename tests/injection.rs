use serde_json::json;
use wirebox::{
    attrs, Contract, Injector, Registry, Schema, ServiceObject, Value, WireError,
};

fn needy(contract: Contract) -> Value {
    Value::from(ServiceObject::new("Service").with_need(contract))
}

#[test]
fn test_inject_onto_bare_data() {
    let injector = Injector::standard();
    let injected = injector
        .inject(&Value::from(json!({ "pool": 4 })), "dsn", Value::from("postgres://db"))
        .unwrap();
    assert_eq!(injected.attr("dsn"), Some(&Value::from("postgres://db")));
    assert_eq!(injected.attr("pool"), Some(&Value::from(4i64)));
}

#[test]
fn test_inject_derives_a_fresh_object() {
    let injector = Injector::standard();
    let original = Value::from(ServiceObject::new("Config").with_member("host", "localhost"));
    let injected = injector
        .inject(&original, "host", Value::from("remote"))
        .unwrap();
    assert_eq!(original.attr("host"), Some(&Value::from("localhost")));
    assert_eq!(injected.attr("host"), Some(&Value::from("remote")));
}

#[test]
fn test_undeclared_property_lists_valid_names() {
    let injector = Injector::standard();
    let service = needy(
        Contract::new()
            .with("logger", attrs(json!({ "optional": true })))
            .with("mailer", attrs(json!({ "optional": true }))),
    );
    let err = injector
        .inject(&service, "printer", Value::from("x"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "[printer]: Dependency is not defined in the list of needed dependencies \
         ['logger', 'mailer']"
    );
}

#[test]
fn test_missing_required_dependency() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with("logger", attrs(json!({}))));
    let err = injector.validate(&service).unwrap_err();
    assert_eq!(err.to_string(), "[logger]: Dependency has not been injected");
}

#[test]
fn test_optional_dependency_may_stay_missing() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with("logger", attrs(json!({ "optional": true }))));
    assert!(injector.validate(&service).is_ok());
}

#[test]
fn test_property_definer_renames_storage_member() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "logger",
        attrs(json!({ "optional": true, "property": "_logger" })),
    ));
    let injected = injector
        .inject(&service, "logger", Value::from("console"))
        .unwrap();
    assert_eq!(injected.attr("_logger"), Some(&Value::from("console")));
    assert_eq!(injected.attr("logger"), None);
}

#[test]
fn test_value_definer_accepts_conforming_value() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "port",
        attrs(json!({ "value": { "type": "number" } })),
    ));
    let injected = injector
        .inject_set(
            &service,
            &attrs(json!({ "port": 5432 })),
            true,
        )
        .unwrap();
    assert_eq!(injected.attr("port"), Some(&Value::from(5432i64)));
}

#[test]
fn test_value_definer_rejects_mismatched_value() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "port",
        attrs(json!({ "value": { "type": "number" } })),
    ));
    let err = injector
        .inject_set(&service, &attrs(json!({ "port": "not-a-number" })), true)
        .unwrap_err();
    match &err {
        WireError::Dependency { property, source } => {
            assert_eq!(property, "port");
            assert!(matches!(**source, WireError::BadDependency(_)));
        }
        other => panic!("expected a dependency error, got {}", other),
    }
    assert!(err.to_string().starts_with("[port]: Bad dependency:"));
}

#[test]
fn test_interface_definer_restricts_conforming_object() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "printer",
        attrs(json!({ "interface": { "methods": ["print"] } })),
    ));
    let printer = ServiceObject::new("Printer")
        .with_member("print", "fn")
        .with_member("spool", "local")
        .with_method("print");

    let injected = injector
        .inject_set(
            &service,
            &[("printer".to_string(), Value::from(printer))]
                .into_iter()
                .collect(),
            true,
        )
        .unwrap();

    let facade = injected.attr("printer").unwrap().as_object().unwrap();
    assert!(facade.member("print").is_ok());
    assert!(matches!(
        facade.member("spool"),
        Err(WireError::InaccessibleMember { .. })
    ));
}

#[test]
fn test_interface_definer_names_missing_members() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "printer",
        attrs(json!({ "interface": { "methods": ["print", "flush"] } })),
    ));
    let printer = ServiceObject::new("Printer").with_method("print");

    let err = injector
        .inject_set(
            &service,
            &[("printer".to_string(), Value::from(printer))]
                .into_iter()
                .collect(),
            true,
        )
        .unwrap_err();
    assert!(err.to_string().contains("missing: flush"));
}

#[test]
fn test_interface_definer_rejects_non_objects() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "printer",
        attrs(json!({ "interface": { "methods": ["print"] } })),
    ));
    let err = injector
        .inject_set(&service, &attrs(json!({ "printer": "not-an-object" })), true)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "[printer]: Bad dependency: expected an object, got a string"
    );
}

#[test]
fn test_list_proxy_validates_each_element() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "ports",
        attrs(json!({ "proxy": "list", "value": { "type": "number" } })),
    ));

    let ok = injector
        .inject_set(&service, &attrs(json!({ "ports": [80, 443] })), true)
        .unwrap();
    assert_eq!(
        ok.attr("ports"),
        Some(&Value::from(vec![Value::from(80i64), Value::from(443i64)]))
    );

    let err = injector
        .inject_set(&service, &attrs(json!({ "ports": [80, "https"] })), true)
        .unwrap_err();
    assert!(matches!(err, WireError::Dependency { ref property, .. } if property == "ports"));
}

#[test]
fn test_list_proxy_rejects_non_lists() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "ports",
        attrs(json!({ "proxy": "list" })),
    ));
    let err = injector
        .inject_set(&service, &attrs(json!({ "ports": 80 })), true)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "[ports]: Bad dependency: expected a list, got a number"
    );
}

#[test]
fn test_registry_proxy_rebuilds_same_item_type() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "handlers",
        attrs(json!({ "proxy": "registry", "value": { "type": "string" } })),
    ));
    let mut handlers = Registry::new("handler");
    handlers.set("json", Value::from("json-handler"));
    handlers.set("xml", Value::from("xml-handler"));

    let injected = injector
        .inject_set(
            &service,
            &[("handlers".to_string(), Value::from(handlers))]
                .into_iter()
                .collect(),
            true,
        )
        .unwrap();
    let rebuilt = injected.attr("handlers").unwrap().as_registry().unwrap();
    assert_eq!(rebuilt.item_type(), "handler");
    assert_eq!(rebuilt.len(), 2);
    assert_eq!(rebuilt.get("xml").unwrap(), &Value::from("xml-handler"));
}

#[test]
fn test_unknown_proxy_key_is_a_bad_definition() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "items",
        attrs(json!({ "proxy": "carousel" })),
    ));
    let err = injector.validate(&service).unwrap_err();
    match &err {
        WireError::Dependency { property, source } => {
            assert_eq!(property, "items");
            assert!(matches!(**source, WireError::BadDefinition(_)));
        }
        other => panic!("expected a bad definition, got {}", other),
    }
}

#[test]
fn test_unknown_definer_key_is_a_bad_definition() {
    let injector = Injector::standard();
    let service = needy(Contract::new().with(
        "logger",
        attrs(json!({ "lazyness": true })),
    ));
    let err = injector.validate(&service).unwrap_err();
    assert!(err.to_string().contains("Bad need definition"));
    assert!(err.to_string().contains("lazyness"));
}

#[test]
fn test_custom_definer_joins_the_pipeline() {
    struct UppercaseDefiner;

    impl wirebox::InjectionDefiner for UppercaseDefiner {
        fn schema(&self) -> Schema {
            Schema::bool().with_default(false)
        }

        fn validate(&self, value: Value, config: &Value) -> wirebox::WireResult<Value> {
            if config.as_bool() != Some(true) {
                return Ok(value);
            }
            match value {
                Value::String(s) => Ok(Value::String(s.to_uppercase())),
                other => Ok(other),
            }
        }
    }

    let mut injector = Injector::standard();
    injector.set_injection_definer("uppercase", std::sync::Arc::new(UppercaseDefiner));

    let service = needy(Contract::new().with(
        "greeting",
        attrs(json!({ "uppercase": true })),
    ));
    let injected = injector
        .inject_set(&service, &attrs(json!({ "greeting": "hello" })), true)
        .unwrap();
    assert_eq!(injected.attr("greeting"), Some(&Value::from("HELLO")));
}

#[test]
fn test_deferred_contract_is_materialized() {
    let injector = Injector::standard();
    let service = Value::from(ServiceObject::new("Lazy").with_deferred_need(|| {
        Contract::new().with("logger", attrs(json!({ "optional": true })))
    }));
    let injected = injector
        .inject(&service, "logger", Value::from("console"))
        .unwrap();
    assert_eq!(injected.attr("logger"), Some(&Value::from("console")));
}
