//! Lifecycle Orchestrator
//!
//! Drives an [`Assembly`] through its phases:
//!
//! ```text
//! start_all:  Init a -> Init b -> Init c -> spawn Run phases -> Running
//!                        (fails)
//!                          └─> Close a (reverse order) -> Error::Init
//!
//! stop_all:   cancel -> wait <= grace period -> Close c -> Close b -> Close a
//! ```
//!
//! Init runs sequentially in dependency order. Run phases execute on tracked
//! tasks, each with a child cancellation token. Their exits, panics
//! included, are reported on a channel and never change the lifecycle
//! state. Close runs in strict reverse order, each call bounded by a
//! timeout, and every failure is collected instead of aborting the sweep.

use super::shutdown::ShutdownCoordinator;
use crate::config::HubConfig;
use crate::constants::{DEFAULT_CLOSE_TIMEOUT, DEFAULT_SHUTDOWN_GRACE_PERIOD};
use futures::FutureExt;
use hub_application::Assembly;
use hub_domain::error::{CloseFailure, ComponentResult, Error, Result};
use hub_domain::ports::{InitContext, Instance};
use hub_domain::value_objects::LifecycleState;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Snapshot of one managed component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentInfo {
    /// Component name
    pub name: String,
    /// Current state
    pub state: LifecycleState,
}

/// A Run phase that returned
#[derive(Debug)]
pub struct RunExit {
    /// Component whose Run phase ended
    pub component: String,
    /// What the Run phase returned
    pub result: ComponentResult<()>,
}

/// Timing of the shutdown sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleOptions {
    /// Time Run phases get to return after cancellation
    pub shutdown_grace_period: Duration,
    /// Upper bound for each Close phase
    pub close_timeout: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            shutdown_grace_period: DEFAULT_SHUTDOWN_GRACE_PERIOD,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
        }
    }
}

impl From<&HubConfig> for LifecycleOptions {
    fn from(config: &HubConfig) -> Self {
        Self {
            shutdown_grace_period: config.shutdown_grace_period,
            close_timeout: config.close_timeout,
        }
    }
}

struct Managed {
    name: &'static str,
    instance: Instance,
    state: LifecycleState,
}

impl Managed {
    fn transition(&mut self, next: LifecycleState) {
        if self.state.can_transition_to(next) {
            debug!(component = self.name, from = %self.state, to = %next, "Lifecycle transition");
            self.state = next;
        } else {
            warn!(
                component = self.name,
                from = %self.state,
                to = %next,
                "Ignoring illegal lifecycle transition"
            );
        }
    }
}

/// Owns the constructed components and their lifecycle states
pub struct Lifecycle {
    components: Vec<Managed>,
    shutdown: ShutdownCoordinator,
    options: LifecycleOptions,
    exits_tx: mpsc::UnboundedSender<RunExit>,
    exits_rx: Option<mpsc::UnboundedReceiver<RunExit>>,
    started: bool,
    stopped: bool,
}

impl Lifecycle {
    /// Take ownership of an assembly; every component starts at `Injected`
    pub fn new(assembly: Assembly, options: LifecycleOptions) -> Self {
        let (exits_tx, exits_rx) = mpsc::unbounded_channel();
        let components = assembly
            .into_iter()
            .map(|component| Managed {
                name: component.name,
                instance: component.instance,
                state: LifecycleState::Injected,
            })
            .collect();
        Self {
            components,
            shutdown: ShutdownCoordinator::new(),
            options,
            exits_tx,
            exits_rx: Some(exits_rx),
            started: false,
            stopped: false,
        }
    }

    /// Receiver of Run-phase exits; `None` once taken
    pub fn take_run_exits(&mut self) -> Option<mpsc::UnboundedReceiver<RunExit>> {
        self.exits_rx.take()
    }

    /// Snapshot of every managed component, in start order
    pub fn list(&self) -> Vec<ComponentInfo> {
        self.components
            .iter()
            .map(|managed| ComponentInfo {
                name: managed.name.to_string(),
                state: managed.state,
            })
            .collect()
    }

    /// Current state of one component
    pub fn state(&self, name: &str) -> Option<LifecycleState> {
        self.components
            .iter()
            .find(|managed| managed.name == name)
            .map(|managed| managed.state)
    }

    /// Whether `stop_all` already ran (or startup already tore down)
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Init every component in order, then start the Run phases
    ///
    /// On the first Init failure the failing component becomes `Failed`,
    /// every initialized component is closed in reverse order and the
    /// original cause is returned with the close failures attached.
    ///
    /// A second call while running is a no-op. Instances are never reused,
    /// so once startup failed or `stop_all` ran every further call fails.
    pub async fn start_all(&mut self) -> Result<()> {
        if self.stopped {
            return Err(Error::configuration(
                "lifecycle already stopped; build a new one from a fresh assembly",
            ));
        }
        if self.started {
            debug!("Lifecycle already started");
            return Ok(());
        }
        self.started = true;

        for index in 0..self.components.len() {
            let name = self.components[index].name;
            let component = Arc::clone(self.components[index].instance.component());

            info!(component = name, "Initializing component");
            if let Err(source) = component.init(&InitContext::new(name)).await {
                error!(component = name, error = %source, "Component failed to initialize");
                self.components[index].transition(LifecycleState::Failed);
                self.stopped = true;
                let close_failures = self.close_reverse().await;
                return Err(Error::Init {
                    component: name.to_string(),
                    source,
                    close_failures,
                });
            }
            self.components[index].transition(LifecycleState::Initialized);
        }

        for managed in &mut self.components {
            if let Some(runner) = managed.instance.runner() {
                let runner = Arc::clone(runner);
                let exits = self.exits_tx.clone();
                let name = managed.name;
                info!(component = name, "Starting run phase");
                self.shutdown.spawn_cancellable(name, move |cancel| async move {
                    let result = match AssertUnwindSafe(runner.run(cancel)).catch_unwind().await {
                        Ok(result) => result,
                        Err(payload) => {
                            Err(format!("run phase panicked: {}", panic_message(&*payload)).into())
                        }
                    };
                    match &result {
                        Ok(()) => info!(component = name, "Run phase finished"),
                        Err(e) => error!(component = name, error = %e, "Run phase failed"),
                    }
                    let exit = RunExit {
                        component: name.to_string(),
                        result,
                    };
                    if exits.send(exit).is_err() {
                        debug!(component = name, "Run exit dropped; nobody is listening");
                    }
                });
            }
            managed.transition(LifecycleState::Running);
        }

        info!(components = self.components.len(), "All components started");
        Ok(())
    }

    /// Cancel Run phases, then close everything in reverse start order
    ///
    /// Waits at most the grace period for Run phases to return. Close
    /// failures and timeouts are collected into [`Error::Close`]. A second
    /// call is a no-op returning `Ok`.
    pub async fn stop_all(&mut self) -> Result<()> {
        if self.stopped {
            debug!("Lifecycle already stopped");
            return Ok(());
        }
        self.stopped = true;

        if !self.shutdown.shutdown(self.options.shutdown_grace_period).await {
            warn!(
                grace_period = ?self.options.shutdown_grace_period,
                "Closing components while run phases are still active"
            );
        }

        let failures = self.close_reverse().await;
        if failures.is_empty() {
            info!("All components closed");
            Ok(())
        } else {
            Err(Error::Close { failures })
        }
    }

    async fn close_reverse(&mut self) -> Vec<CloseFailure> {
        let timeout = self.options.close_timeout;
        let mut failures = Vec::new();

        for managed in self.components.iter_mut().rev() {
            if !managed.state.needs_close() {
                continue;
            }
            let component = Arc::clone(managed.instance.component());

            info!(component = managed.name, "Closing component");
            let cause = match tokio::time::timeout(timeout, component.close()).await {
                Ok(Ok(())) => {
                    managed.transition(LifecycleState::Closed);
                    continue;
                }
                Ok(Err(cause)) => cause,
                Err(_) => format!("close did not finish within {timeout:?}").into(),
            };

            warn!(component = managed.name, error = %cause, "Component failed to close");
            managed.transition(LifecycleState::Failed);
            failures.push(CloseFailure::new(managed.name, cause));
        }
        failures
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        if self.started && !self.stopped {
            warn!("Lifecycle dropped without stop_all; cancelling run phases");
            self.shutdown.token().cancel();
        }
    }
}
