//! Heartbeat provider
//!
//! Logs a liveness line on a fixed interval for as long as the hub runs.
//! It takes its time from whichever component offers the `Clock` type.
//!
//! ```toml
//! [heartbeat]
//! interval = "30s"      # env HEARTBEAT_INTERVAL, default 10s
//! message = "ingest up" # env HEARTBEAT_MESSAGE, default "alive"
//! ```

use crate::clock::Clock;
use crate::constants::{
    CLOCK_TYPE, HEARTBEAT_DEFAULT_INTERVAL, HEARTBEAT_DEFAULT_MESSAGE, HEARTBEAT_NAME,
    HEARTBEAT_SERVICE,
};
use async_trait::async_trait;
use hub_application::COMPONENTS;
use hub_domain::error::ComponentResult;
use hub_domain::ports::{Component, Construction, InitContext, Instance, Runner};
use hub_domain::value_objects::{Capability, CapabilityDescriptor, ConfigSchema, Dependency, Field};
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Heartbeat settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeartbeatConfig {
    /// Time between beats
    pub interval: Duration,
    /// Text logged with every beat
    pub message: String,
}

fn heartbeat_schema() -> ConfigSchema {
    ConfigSchema::new()
        .field(
            Field::duration("interval")
                .env("HEARTBEAT_INTERVAL")
                .default(HEARTBEAT_DEFAULT_INTERVAL),
        )
        .field(
            Field::string("message")
                .env("HEARTBEAT_MESSAGE")
                .default(HEARTBEAT_DEFAULT_MESSAGE),
        )
}

/// Periodic liveness logger
pub struct Heartbeat {
    config: HeartbeatConfig,
    clock: Arc<dyn Clock>,
    beats: AtomicU64,
}

impl Heartbeat {
    /// Heartbeat reading time from `clock`
    pub fn new(config: HeartbeatConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            beats: AtomicU64::new(0),
        }
    }

    /// Bound settings
    pub fn config(&self) -> &HeartbeatConfig {
        &self.config
    }

    /// Beats emitted so far
    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::Relaxed)
    }

    fn beat(&self) {
        let beat = self.beats.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            message = %self.config.message,
            beat,
            unix_seconds = self.clock.unix_seconds(),
            "Heartbeat"
        );
    }
}

#[async_trait]
impl Component for Heartbeat {
    async fn init(&self, ctx: &InitContext<'_>) -> ComponentResult<()> {
        if self.config.interval.is_zero() {
            return Err(format!("{}.interval must be greater than zero", ctx.name()).into());
        }
        debug!(
            interval = %humantime::format_duration(self.config.interval),
            "Heartbeat ready"
        );
        Ok(())
    }

    async fn close(&self) -> ComponentResult<()> {
        info!(beats = self.beats(), "Heartbeat stopped");
        Ok(())
    }
}

#[async_trait]
impl Runner for Heartbeat {
    async fn run(self: Arc<Self>, cancel: CancellationToken) -> ComponentResult<()> {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => return Ok(()),
                _ = ticker.tick() => self.beat(),
            }
        }
    }
}

fn heartbeat_factory(ctx: &Construction<'_>) -> ComponentResult<Instance> {
    let config: HeartbeatConfig = ctx.config()?;
    let clock = ctx.require::<dyn Clock>(&Capability::of_type(CLOCK_TYPE))?;
    Ok(Instance::runnable(Arc::new(Heartbeat::new(config, clock))))
}

#[linkme::distributed_slice(COMPONENTS)]
static HEARTBEAT_PROVIDER: CapabilityDescriptor = CapabilityDescriptor {
    name: HEARTBEAT_NAME,
    description: "Periodic liveness log line",
    services: &[HEARTBEAT_SERVICE],
    types: &[],
    dependencies: &[Dependency::of_type(CLOCK_TYPE)],
    config: Some(heartbeat_schema),
    factory: heartbeat_factory,
};
