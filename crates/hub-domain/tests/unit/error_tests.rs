//! Tests for error rendering and classification

use hub_domain::error::{
    BindError, CloseFailure, Error, ResolutionError, ResolutionErrorKind, ValueOrigin,
};

#[test]
fn test_bind_error_names_field_value_and_origin() {
    let err = Error::Bind {
        component: "etcd".to_string(),
        source: BindError::new("timeout", "5x", ValueOrigin::File, "unknown time unit"),
    };
    let rendered = err.to_string();

    assert!(rendered.contains("`etcd`"));
    assert!(rendered.contains("`timeout`"));
    assert!(rendered.contains("\"5x\""));
    assert!(rendered.contains("file"));
}

#[test]
fn test_cycle_renders_closed_path() {
    let err: Error = ResolutionError::Cycle {
        path: vec!["a".into(), "b".into(), "a".into()],
    }
    .into();

    assert_eq!(err.to_string(), "dependency cycle: a -> b -> a");
    assert_eq!(err.resolution_kind(), Some(ResolutionErrorKind::Cycle));
    assert_eq!(Error::configuration("x").resolution_kind(), None);
}

#[test]
fn test_init_error_keeps_primary_cause_first() {
    let err = Error::Init {
        component: "b".to_string(),
        source: "port in use".into(),
        close_failures: vec![CloseFailure::new("a", "flush failed".into())],
    };
    let rendered = err.to_string();

    assert!(rendered.starts_with("component `b` failed to initialize: port in use"));
    assert!(rendered.contains("rollback: component `a`: flush failed"));
}

#[test]
fn test_init_error_without_rollback_failures() {
    let err = Error::Init {
        component: "b".to_string(),
        source: "port in use".into(),
        close_failures: Vec::new(),
    };
    assert_eq!(
        err.to_string(),
        "component `b` failed to initialize: port in use"
    );
}

#[test]
fn test_close_error_aggregates_every_failure() {
    let err = Error::Close {
        failures: vec![
            CloseFailure::new("c", "timed out".into()),
            CloseFailure::new("a", "broken pipe".into()),
        ],
    };
    assert_eq!(
        err.to_string(),
        "2 component(s) failed to close: component `c`: timed out; component `a`: broken pipe"
    );
}
