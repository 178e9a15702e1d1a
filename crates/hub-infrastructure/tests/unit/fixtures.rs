//! Configurable test components
//!
//! Behavior is driven through each component's configuration section so
//! tests exercise the same binding path as real providers.

use async_trait::async_trait;
use hub_application::{Assembly, EmptyEnvironment, RawConfig, Registry, Resolver};
use hub_domain::error::ComponentResult;
use hub_domain::ports::{Component, Construction, InitContext, Instance, Runner};
use hub_domain::value_objects::{CapabilityDescriptor, ConfigSchema, Dependency, Field};
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Global close sequence; only relative order matters
static CLOSE_SEQUENCE: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default, Deserialize)]
pub struct RecorderConfig {
    pub fail_init: bool,
    pub fail_close: bool,
    pub close_delay: Duration,
    pub fail_after: Duration,
    pub ignore_cancel: bool,
    pub panic_in_run: bool,
}

fn recorder_schema() -> ConfigSchema {
    ConfigSchema::new()
        .field(Field::bool("fail_init"))
        .field(Field::bool("fail_close"))
        .field(Field::duration("close_delay"))
        .field(Field::duration("fail_after"))
        .field(Field::bool("ignore_cancel"))
        .field(Field::bool("panic_in_run"))
}

/// Records every lifecycle call it receives
#[derive(Debug, Default)]
pub struct Recorder {
    pub config: RecorderConfig,
    pub inits: AtomicUsize,
    pub closes: AtomicUsize,
    /// Position in the global close sequence, 0 if never closed
    pub closed_at: AtomicUsize,
}

#[async_trait]
impl Component for Recorder {
    async fn init(&self, ctx: &InitContext<'_>) -> ComponentResult<()> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        if self.config.fail_init {
            return Err(format!("{} refused to start", ctx.name()).into());
        }
        Ok(())
    }

    async fn close(&self) -> ComponentResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if !self.config.close_delay.is_zero() {
            tokio::time::sleep(self.config.close_delay).await;
        }
        self.closed_at
            .store(CLOSE_SEQUENCE.fetch_add(1, Ordering::SeqCst) + 1, Ordering::SeqCst);
        if self.config.fail_close {
            return Err("flush failed".into());
        }
        Ok(())
    }
}

#[async_trait]
impl Runner for Recorder {
    async fn run(self: Arc<Self>, cancel: CancellationToken) -> ComponentResult<()> {
        if self.config.panic_in_run {
            panic!("pulse exploded");
        }
        if self.config.ignore_cancel {
            std::future::pending::<()>().await;
        }
        if self.config.fail_after.is_zero() {
            cancel.cancelled().await;
            return Ok(());
        }
        tokio::select! {
            () = cancel.cancelled() => Ok(()),
            () = tokio::time::sleep(self.config.fail_after) => Err("pulse lost".into()),
        }
    }
}

fn recorder_factory(ctx: &Construction<'_>) -> ComponentResult<Instance> {
    let config: RecorderConfig = ctx.config()?;
    Ok(Instance::new(Arc::new(Recorder {
        config,
        ..Recorder::default()
    })))
}

fn runnable_factory(ctx: &Construction<'_>) -> ComponentResult<Instance> {
    let config: RecorderConfig = ctx.config()?;
    Ok(Instance::runnable(Arc::new(Recorder {
        config,
        ..Recorder::default()
    })))
}

/// Recorder offering a service named after itself
pub fn recorder(
    name: &'static str,
    services: &'static [&'static str],
    dependencies: &'static [Dependency],
) -> CapabilityDescriptor {
    CapabilityDescriptor {
        name,
        description: "recording test component",
        services,
        types: &[],
        dependencies,
        config: Some(recorder_schema),
        factory: recorder_factory,
    }
}

/// Recorder with a Run phase
pub fn runnable(name: &'static str, dependencies: &'static [Dependency]) -> CapabilityDescriptor {
    CapabilityDescriptor {
        factory: runnable_factory,
        ..recorder(name, &[], dependencies)
    }
}

pub fn registry(descriptors: impl IntoIterator<Item = CapabilityDescriptor>) -> Registry {
    let mut registry = Registry::new();
    for descriptor in descriptors {
        registry.register(descriptor).unwrap();
    }
    registry
}

pub fn assemble(registry: &Registry, raw: serde_json::Value, requested: &[&str]) -> Assembly {
    let raw = RawConfig::new(raw);
    Resolver::new(registry, &raw, &EmptyEnvironment)
        .resolve(requested)
        .unwrap()
}

pub fn recorder_of(assembly: &Assembly, name: &str) -> Arc<Recorder> {
    assembly.instance(name).unwrap().downcast::<Recorder>().unwrap()
}
