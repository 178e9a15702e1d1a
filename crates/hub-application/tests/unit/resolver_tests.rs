//! Tests for dependency planning, injection and construction

use crate::fixtures::{Stub, descriptor, stub_factory};
use hub_application::domain_services::{EmptyEnvironment, RawConfig, Resolver};
use hub_application::registry::Registry;
use hub_domain::error::{ComponentResult, Error, ResolutionError, ResolutionErrorKind};
use hub_domain::ports::{Component, Construction, Instance, ProvideRequest};
use hub_domain::value_objects::{
    Capability, CapabilityDescriptor, ConfigSchema, Dependency, Field, Handle,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const CLOCK: Capability = Capability::service("clock");
const NEEDS_CLOCK: &[Dependency] = &[Dependency::service("clock")];

fn registry(descriptors: impl IntoIterator<Item = CapabilityDescriptor>) -> Registry {
    let mut registry = Registry::new();
    for descriptor in descriptors {
        registry.register(descriptor).unwrap();
    }
    registry
}

fn resolve(registry: &Registry, requested: &[&str]) -> hub_domain::error::Result<hub_application::Assembly> {
    let raw = RawConfig::empty();
    Resolver::new(registry, &raw, &EmptyEnvironment).resolve(requested)
}

/// Holds the clock it was given
struct ClockUser {
    clock: Arc<Stub>,
}

impl Component for ClockUser {}

fn clock_user_factory(ctx: &Construction<'_>) -> ComponentResult<Instance> {
    let clock = ctx.require::<Stub>(&CLOCK)?;
    Ok(Instance::new(Arc::new(ClockUser { clock })))
}

fn clock_user(name: &'static str) -> CapabilityDescriptor {
    CapabilityDescriptor {
        factory: clock_user_factory,
        ..descriptor(name, &[], NEEDS_CLOCK)
    }
}

#[test]
fn test_unknown_requested_component() {
    let registry = registry([descriptor("a", &[], &[])]);
    let err = resolve(&registry, &["ghost"]).unwrap_err();
    assert_eq!(
        err.resolution_kind(),
        Some(ResolutionErrorKind::UnknownComponent)
    );
}

#[test]
fn test_clock_scenario_unsatisfied_without_provider() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);
    fn counted(ctx: &Construction<'_>) -> ComponentResult<Instance> {
        BUILT.fetch_add(1, Ordering::SeqCst);
        clock_user_factory(ctx)
    }

    let registry = registry([CapabilityDescriptor {
        factory: counted,
        ..clock_user("b")
    }]);
    let err = resolve(&registry, &["b"]).unwrap_err();

    match err {
        Error::Resolution(ResolutionError::Unsatisfied {
            component,
            dependency,
        }) => {
            assert_eq!(component, "b");
            assert!(dependency.contains("clock"));
        }
        other => panic!("expected Unsatisfied, got {other:?}"),
    }
    assert_eq!(BUILT.load(Ordering::SeqCst), 0);
}

#[test]
fn test_clock_scenario_injects_the_provider_instance() {
    let registry = registry([descriptor("a", &["clock"], &[]), clock_user("b")]);
    let assembly = resolve(&registry, &["b"]).unwrap();

    assert_eq!(assembly.names(), vec!["a", "b"]);

    let clock = assembly.instance("a").unwrap().downcast::<Stub>().unwrap();
    let user = assembly.instance("b").unwrap().downcast::<ClockUser>().unwrap();
    assert!(Arc::ptr_eq(&clock, &user.clock));
    assert_eq!(user.clock.name, "a");
    assert_eq!(assembly.get("b").unwrap().providers(), vec!["a"]);
}

#[test]
fn test_cycle_is_detected_before_construction() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);
    fn counted(ctx: &Construction<'_>) -> ComponentResult<Instance> {
        BUILT.fetch_add(1, Ordering::SeqCst);
        stub_factory(ctx)
    }
    const NEEDS_B: &[Dependency] = &[Dependency::service("b")];
    const NEEDS_A: &[Dependency] = &[Dependency::service("a")];

    let registry = registry([
        CapabilityDescriptor {
            factory: counted,
            ..descriptor("a", &["a"], NEEDS_B)
        },
        CapabilityDescriptor {
            factory: counted,
            ..descriptor("b", &["b"], NEEDS_A)
        },
    ]);
    let err = resolve(&registry, &["a"]).unwrap_err();

    match err {
        Error::Resolution(ResolutionError::Cycle { path }) => {
            assert_eq!(path, vec!["a", "b", "a"]);
        }
        other => panic!("expected Cycle, got {other:?}"),
    }
    assert_eq!(BUILT.load(Ordering::SeqCst), 0);
}

#[test]
fn test_self_dependency_is_a_cycle() {
    const NEEDS_SELF: &[Dependency] = &[Dependency::service("loop")];
    let registry = registry([descriptor("loop", &["loop"], NEEDS_SELF)]);

    let err = resolve(&registry, &["loop"]).unwrap_err();
    assert_eq!(err.resolution_kind(), Some(ResolutionErrorKind::Cycle));
}

#[test]
fn test_ambiguous_dependency_lists_candidates() {
    const NEEDS_STORE: &[Dependency] = &[Dependency::service("store")];
    let registry = registry([
        descriptor("redis", &["store"], &[]),
        descriptor("etcd", &["store"], &[]),
        descriptor("app", &[], NEEDS_STORE),
    ]);

    match resolve(&registry, &["app"]).unwrap_err() {
        Error::Resolution(ResolutionError::Ambiguous { candidates, .. }) => {
            assert_eq!(candidates, vec!["redis", "etcd"]);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[test]
fn test_pinned_provider_resolves_ambiguity() {
    const PINNED: &[Dependency] = &[Dependency::service("store").from_provider("etcd")];
    let registry = registry([
        descriptor("redis", &["store"], &[]),
        descriptor("etcd", &["store"], &[]),
        descriptor("app", &[], PINNED),
    ]);

    let assembly = resolve(&registry, &["app"]).unwrap();
    assert_eq!(assembly.names(), vec!["etcd", "app"]);
    assert!(assembly.get("redis").is_none());
}

#[test]
fn test_pinned_provider_must_offer_the_capability() {
    const PINNED: &[Dependency] = &[Dependency::service("store").from_provider("clock")];
    let registry = registry([
        descriptor("clock", &["clock"], &[]),
        descriptor("app", &[], PINNED),
    ]);

    let err = resolve(&registry, &["app"]).unwrap_err();
    assert_eq!(err.resolution_kind(), Some(ResolutionErrorKind::Unsatisfied));
}

#[test]
fn test_optional_dependency_without_provider_is_skipped() {
    const OPTIONAL: &[Dependency] = &[Dependency::service("metrics").optional()];
    fn factory(ctx: &Construction<'_>) -> ComponentResult<Instance> {
        assert!(ctx.dependencies().is_empty());
        assert!(ctx.get::<Stub>(&Capability::service("metrics")).is_none());
        stub_factory(ctx)
    }

    let registry = registry([CapabilityDescriptor {
        factory,
        ..descriptor("app", &[], OPTIONAL)
    }]);
    let assembly = resolve(&registry, &["app"]).unwrap();
    assert_eq!(assembly.names(), vec!["app"]);
}

#[test]
fn test_optional_dependency_with_provider_is_injected() {
    const OPTIONAL: &[Dependency] = &[Dependency::service("clock").optional()];
    let registry = registry([
        CapabilityDescriptor {
            factory: clock_user_factory,
            ..descriptor("app", &[], OPTIONAL)
        },
        descriptor("clock", &["clock"], &[]),
    ]);

    let assembly = resolve(&registry, &["app"]).unwrap();
    assert_eq!(assembly.names(), vec!["clock", "app"]);
}

#[test]
fn test_optional_dependency_can_still_be_ambiguous() {
    const OPTIONAL: &[Dependency] = &[Dependency::service("store").optional()];
    let registry = registry([
        descriptor("redis", &["store"], &[]),
        descriptor("etcd", &["store"], &[]),
        descriptor("app", &[], OPTIONAL),
    ]);

    let err = resolve(&registry, &["app"]).unwrap_err();
    assert_eq!(err.resolution_kind(), Some(ResolutionErrorKind::Ambiguous));
}

#[test]
fn test_order_ties_follow_registration_not_request() {
    let registry = registry([
        descriptor("c", &[], &[]),
        descriptor("a", &[], &[]),
        descriptor("b", &[], &[]),
    ]);
    let raw = RawConfig::empty();
    let plan = Resolver::new(&registry, &raw, &EmptyEnvironment)
        .plan(&["a", "b", "c"])
        .unwrap();

    assert_eq!(plan.order(), vec!["c", "a", "b"]);
}

#[test]
fn test_capability_type_dependency() {
    const NEEDS_TYPE: &[Dependency] = &[Dependency::of_type("Clock")];
    let registry = registry([
        CapabilityDescriptor {
            types: &["Clock"],
            ..descriptor("system-clock", &[], &[])
        },
        descriptor("app", &[], NEEDS_TYPE),
    ]);

    let raw = RawConfig::empty();
    let plan = Resolver::new(&registry, &raw, &EmptyEnvironment)
        .plan(&["app"])
        .unwrap();
    let app = &plan.components()[1];
    assert_eq!(app.bindings.len(), 1);
    assert_eq!(app.bindings[0].provider, "system-clock");
}

/// Offers itself as a service and a narrower view under a type tag
struct Store;

/// The narrower view
struct StoreClient;

impl Component for Store {
    fn provide(self: Arc<Self>, request: &ProvideRequest<'_>) -> Option<Handle> {
        request
            .is_type("store.Client")
            .then(|| Handle::new(Arc::new(StoreClient)))
    }
}

#[test]
fn test_provide_answers_each_identity_independently() {
    const BY_SERVICE: &[Dependency] = &[Dependency::service("store")];
    const BY_TYPE: &[Dependency] = &[Dependency::of_type("store.Client")];

    fn store_factory(_ctx: &Construction<'_>) -> ComponentResult<Instance> {
        Ok(Instance::new(Arc::new(Store)))
    }
    fn by_service(ctx: &Construction<'_>) -> ComponentResult<Instance> {
        ctx.require::<Store>(&Capability::service("store"))?;
        stub_factory(ctx)
    }
    fn by_type(ctx: &Construction<'_>) -> ComponentResult<Instance> {
        ctx.require::<StoreClient>(&Capability::of_type("store.Client"))?;
        assert!(ctx.get::<Store>(&Capability::of_type("store.Client")).is_none());
        stub_factory(ctx)
    }

    let registry = registry([
        CapabilityDescriptor {
            types: &["store.Client"],
            factory: store_factory,
            ..descriptor("store", &["store"], &[])
        },
        CapabilityDescriptor {
            factory: by_service,
            ..descriptor("service-user", &[], BY_SERVICE)
        },
        CapabilityDescriptor {
            factory: by_type,
            ..descriptor("type-user", &[], BY_TYPE)
        },
    ]);

    let assembly = resolve(&registry, &["service-user", "type-user"]).unwrap();
    let by_type = &assembly.get("type-user").unwrap().dependencies[0];
    assert!(by_type.handle.is::<StoreClient>());
    let by_service = &assembly.get("service-user").unwrap().dependencies[0];
    assert!(by_service.handle.is::<Store>());
}

#[test]
fn test_construction_failure_aborts_resolution() {
    fn failing(_ctx: &Construction<'_>) -> ComponentResult<Instance> {
        Err("disk on fire".into())
    }

    let registry = registry([
        descriptor("a", &["clock"], &[]),
        CapabilityDescriptor {
            factory: failing,
            ..descriptor("b", &[], NEEDS_CLOCK)
        },
    ]);

    match resolve(&registry, &["b"]).unwrap_err() {
        Error::Resolution(ResolutionError::ConstructionFailed { name, cause }) => {
            assert_eq!(name, "b");
            assert_eq!(cause.to_string(), "disk on fire");
        }
        other => panic!("expected ConstructionFailed, got {other:?}"),
    }
}

#[derive(Debug, Deserialize)]
struct TickerConfig {
    interval: Duration,
    label: String,
}

struct Ticker {
    config: TickerConfig,
}

impl Component for Ticker {}

fn ticker_schema() -> ConfigSchema {
    ConfigSchema::new()
        .field(Field::duration("interval").default("1s"))
        .field(Field::string("label").env("HUB_TICKER_LABEL"))
}

fn ticker_factory(ctx: &Construction<'_>) -> ComponentResult<Instance> {
    let config: TickerConfig = ctx.config()?;
    Ok(Instance::new(Arc::new(Ticker { config })))
}

fn ticker() -> CapabilityDescriptor {
    CapabilityDescriptor {
        config: Some(ticker_schema),
        factory: ticker_factory,
        ..descriptor("ticker", &[], &[])
    }
}

#[test]
fn test_component_section_is_bound_into_its_config() {
    let registry = registry([ticker()]);
    let raw = RawConfig::new(json!({
        "ticker": {"interval": "250ms"},
        "other": {"interval": "9s"},
    }));
    let env: std::collections::HashMap<String, String> =
        [("HUB_TICKER_LABEL".to_string(), "tick".to_string())].into();

    let assembly = Resolver::new(&registry, &raw, &env)
        .resolve(&["ticker"])
        .unwrap();
    let ticker = assembly.instance("ticker").unwrap().downcast::<Ticker>().unwrap();

    assert_eq!(ticker.config.interval, Duration::from_millis(250));
    assert_eq!(ticker.config.label, "tick");
    assert_eq!(
        assembly.get("ticker").unwrap().config.get("label"),
        Some(&json!("tick"))
    );
}

#[test]
fn test_bind_failure_names_the_component() {
    let registry = registry([ticker()]);
    let raw = RawConfig::new(json!({"ticker": {"interval": "5x"}}));

    match Resolver::new(&registry, &raw, &EmptyEnvironment)
        .resolve(&["ticker"])
        .unwrap_err()
    {
        Error::Bind { component, source } => {
            assert_eq!(component, "ticker");
            assert_eq!(source.field, "interval");
        }
        other => panic!("expected Bind, got {other:?}"),
    }
}
