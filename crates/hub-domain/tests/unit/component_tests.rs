//! Tests for the component ports

use async_trait::async_trait;
use hub_domain::error::ComponentResult;
use hub_domain::ports::{Component, Construction, InitContext, Injected, Instance, ProvideRequest, Runner};
use hub_domain::value_objects::{BoundConfig, Capability, Dependency, Handle};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug)]
struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

impl Component for FixedClock {
    fn provide(self: Arc<Self>, request: &ProvideRequest<'_>) -> Option<Handle> {
        request
            .is_type("Clock")
            .then(|| Handle::new(self as Arc<dyn Clock>))
    }
}

#[derive(Debug)]
struct Loop;

impl Component for Loop {}

#[async_trait]
impl Runner for Loop {
    async fn run(self: Arc<Self>, cancel: CancellationToken) -> ComponentResult<()> {
        cancel.cancelled().await;
        Ok(())
    }
}

#[tokio::test]
async fn test_default_phases_are_no_ops() {
    let instance = Instance::new(Arc::new(FixedClock(1)));
    assert!(instance.runner().is_none());
    assert!(instance.component().init(&InitContext::new("clock")).await.is_ok());
    assert!(instance.component().close().await.is_ok());
}

#[tokio::test]
async fn test_runnable_instance_exposes_its_run_phase() {
    let instance = Instance::runnable(Arc::new(Loop));
    let runner = Arc::clone(instance.runner().unwrap());
    let cancel = CancellationToken::new();

    let task = tokio::spawn(runner.run(cancel.clone()));
    cancel.cancel();
    assert!(task.await.unwrap().is_ok());
}

#[test]
fn test_provide_falls_back_to_own_handle() {
    let clock = Arc::new(FixedClock(7));
    let instance = Instance::new(Arc::clone(&clock));

    let service = Capability::service("clock");
    let own = instance.provide(&ProvideRequest {
        consumer: "app",
        capability: &service,
    });
    assert!(Arc::ptr_eq(&own.get::<FixedClock>().unwrap(), &clock));

    let tag = Capability::of_type("Clock");
    let view = instance.provide(&ProvideRequest {
        consumer: "app",
        capability: &tag,
    });
    assert_eq!(view.get::<dyn Clock>().unwrap().now(), 7);
    assert!(view.get::<FixedClock>().is_none());
}

#[test]
fn test_construction_require_reports_missing_and_mistyped() {
    let config = BoundConfig::default();
    let dependencies = vec![Injected {
        dependency: Dependency::service("clock"),
        provider: "fixed".to_string(),
        handle: Handle::new(Arc::new(FixedClock(3))),
    }];
    let ctx = Construction::new("app", &config, &dependencies);

    let clock = ctx.require::<FixedClock>(&Capability::service("clock")).unwrap();
    assert_eq!(clock.now(), 3);

    let missing = ctx
        .require::<FixedClock>(&Capability::service("storage"))
        .unwrap_err();
    assert!(missing.to_string().contains("was not injected into `app`"));

    let mistyped = ctx
        .require::<Loop>(&Capability::service("clock"))
        .unwrap_err();
    assert!(mistyped.to_string().contains("from `fixed`"));
    assert!(ctx.get::<Loop>(&Capability::service("clock")).is_none());
}
