use serde_json::json;
use wirebox::{sorter, Definition, WireError};

fn def(key: &str, deps: &[&str]) -> Definition {
    let mut definition = Definition::new(key, json!({}));
    for (i, dep) in deps.iter().enumerate() {
        definition = definition.with_dependency(format!("dep{}", i), format!("#{}", dep));
    }
    definition
}

fn keys(definitions: &[Definition]) -> Vec<&str> {
    definitions.iter().map(Definition::key).collect()
}

#[test]
fn test_chain_sorts_dependencies_first() {
    let sorted = sorter::sort(&[
        def("app", &["db"]),
        def("db", &["config"]),
        def("config", &[]),
    ])
    .unwrap();
    assert_eq!(keys(&sorted), vec!["config", "db", "app"]);
}

#[test]
fn test_diamond_keeps_relative_order_within_weight() {
    let sorted = sorter::sort(&[
        def("top", &["left", "right"]),
        def("left", &["base"]),
        def("right", &["base"]),
        def("base", &[]),
    ])
    .unwrap();
    assert_eq!(keys(&sorted), vec!["base", "left", "right", "top"]);
}

#[test]
fn test_unknown_dependency_keys_do_not_affect_order() {
    // References to things no definition provides are a resolve-time concern.
    let sorted = sorter::sort(&[def("a", &["elsewhere"]), def("b", &[])]).unwrap();
    assert_eq!(keys(&sorted), vec!["a", "b"]);
}

#[test]
fn test_nested_field_reference_orders_after_owner() {
    let sorted = sorter::sort(&[
        def("db", &["config.db.dsn"]),
        def("config", &[]),
    ])
    .unwrap();
    assert_eq!(keys(&sorted), vec!["config", "db"]);
}

#[test]
fn test_two_cycle_reports_path() {
    let err = sorter::sort(&[def("foo", &["bar"]), def("bar", &["foo"])]).unwrap_err();
    assert_eq!(
        err,
        WireError::CyclicDependency(vec![
            "foo".to_string(),
            "bar".to_string(),
            "foo".to_string(),
        ])
    );
    assert_eq!(err.to_string(), "Cyclic dependency ['foo' < 'bar' < 'foo']");
}

#[test]
fn test_self_cycle_reports_pair() {
    let err = sorter::sort(&[def("foo", &["foo"])]).unwrap_err();
    assert_eq!(
        err,
        WireError::CyclicDependency(vec!["foo".to_string(), "foo".to_string()])
    );
}

#[test]
fn test_three_cycle_detected_behind_healthy_prefix() {
    let err = sorter::sort(&[
        def("ok", &[]),
        def("a", &["b"]),
        def("b", &["c"]),
        def("c", &["a"]),
    ])
    .unwrap_err();
    match err {
        WireError::CyclicDependency(path) => {
            assert_eq!(path.len(), 4);
            assert_eq!(path.first(), path.last());
        }
        other => panic!("expected a cycle, got {}", other),
    }
}

#[test]
fn test_empty_input_sorts_empty() {
    assert!(sorter::sort(&[]).unwrap().is_empty());
}

#[test]
fn test_long_chain_reaches_max_weight_without_cycle() {
    // A chain of n definitions needs exactly the maximum legal weight n-1.
    let defs: Vec<Definition> = (0..12)
        .map(|i| {
            if i == 0 {
                def("svc0", &[])
            } else {
                let dep = format!("svc{}", i - 1);
                def(&format!("svc{}", i), &[dep.as_str()])
            }
        })
        .collect();
    let sorted = sorter::sort(&defs).unwrap();
    let expected: Vec<String> = (0..12).map(|i| format!("svc{}", i)).collect();
    assert_eq!(keys(&sorted), expected);
}
