//! Hub bootstrap
//!
//! The composition routine: register the catalogue, decide which components
//! are active, resolve them, run the lifecycle until a shutdown request and
//! tear everything down.

use crate::config::{HubConfig, LoadedConfig};
use crate::constants::HUB_SECTION;
use crate::infrastructure::lifecycle::{Lifecycle, LifecycleOptions, RunExit};
use crate::infrastructure::signals::wait_for_shutdown_signal;
use hub_application::{Environment, ProcessEnvironment, RawConfig, Registry, Resolver};
use hub_domain::error::{Error, Result};
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// A configured hub, ready to start
pub struct Hub {
    config: HubConfig,
    raw: RawConfig,
    registry: Registry,
    env: Box<dyn Environment>,
}

impl Hub {
    /// Hub over every catalogue component, reading the process environment
    pub fn new(loaded: LoadedConfig) -> Result<Self> {
        let mut registry = Registry::new();
        registry.register_all_catalogue()?;
        info!(components = ?registry.names(), "Catalogue registered");
        Ok(Self::with_registry(loaded.hub, loaded.raw, registry))
    }

    /// Hub over an explicit registry
    pub fn with_registry(config: HubConfig, raw: RawConfig, registry: Registry) -> Self {
        Self {
            config,
            raw,
            registry,
            env: Box::new(ProcessEnvironment),
        }
    }

    /// Replace the environment the binder reads
    #[must_use]
    pub fn with_environment(mut self, env: impl Environment + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Hub settings
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Registered components
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Components to activate
    ///
    /// Explicit names win, then `hub.components`, then every top-level
    /// section of the document that names a registered component.
    pub fn activation(&self, overrides: &[String]) -> Vec<String> {
        if !overrides.is_empty() {
            return overrides.to_vec();
        }
        if !self.config.components.is_empty() {
            return self.config.components.clone();
        }
        self.raw
            .keys()
            .filter(|key| *key != HUB_SECTION && self.registry.lookup_by_name(key).is_some())
            .map(str::to_string)
            .collect()
    }

    /// Resolve and start the requested components
    pub async fn start(&self, requested: &[String]) -> Result<Lifecycle> {
        if requested.is_empty() {
            return Err(Error::configuration(
                "no components to activate; list them in hub.components or add their sections",
            ));
        }
        info!(requested = ?requested, "Resolving components");

        let assembly = Resolver::new(&self.registry, &self.raw, self.env.as_ref()).resolve(requested)?;
        let mut lifecycle = Lifecycle::new(assembly, LifecycleOptions::from(&self.config));
        lifecycle.start_all().await?;
        Ok(lifecycle)
    }

    /// Run until SIGINT / SIGTERM
    pub async fn run(&self, overrides: &[String]) -> Result<()> {
        self.run_until(overrides, async {
            wait_for_shutdown_signal().await.map(|_| ())
        })
        .await
    }

    /// Run until `shutdown` resolves, then stop everything
    ///
    /// With `hub.exit_on_run_failure`, a failing Run phase also stops the
    /// hub. An error from `shutdown` still stops the hub and is returned
    /// unless teardown fails too.
    pub async fn run_until<F>(&self, overrides: &[String], shutdown: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        let requested = self.activation(overrides);
        let mut lifecycle = self.start(&requested).await?;
        let exits = lifecycle.take_run_exits();

        let trigger = self.wait(exits, shutdown).await;
        let stopped = lifecycle.stop_all().await;
        stopped.and(trigger)
    }

    async fn wait<F>(&self, exits: Option<mpsc::UnboundedReceiver<RunExit>>, shutdown: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        tokio::pin!(shutdown);
        let Some(mut exits) = exits else {
            return shutdown.await;
        };

        loop {
            tokio::select! {
                result = &mut shutdown => return result,
                Some(exit) = exits.recv() => {
                    if let Err(cause) = &exit.result {
                        if self.config.exit_on_run_failure {
                            warn!(component = %exit.component, error = %cause, "Run phase failed; stopping hub");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
