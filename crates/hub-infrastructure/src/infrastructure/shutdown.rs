//! Shutdown Coordinator
//!
//! Tracks the Run-phase tasks of the hub with tokio-util primitives:
//! - `CancellationToken` for hierarchical shutdown signaling
//! - `TaskTracker` for awaiting every spawned task
//!
//! ## Usage
//!
//! ```rust,ignore
//! let coordinator = ShutdownCoordinator::new();
//!
//! coordinator.spawn_cancellable("heartbeat", |token| async move {
//!     token.cancelled().await;
//! });
//!
//! // Cancel, then wait at most 30s for tasks to return
//! let completed = coordinator.shutdown(Duration::from_secs(30)).await;
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Cancellation root plus tracker for every spawned task
#[derive(Clone, Debug, Default)]
pub struct ShutdownCoordinator {
    cancel_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> Self {
        Self::default()
    }

    /// Child token, cancelled together with the root
    pub fn child_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// The root cancellation token
    pub fn token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Whether shutdown has been initiated
    pub fn is_shutting_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Number of tracked tasks still running
    pub fn active_tasks(&self) -> usize {
        self.task_tracker.len()
    }

    /// Spawn and track a task
    pub fn spawn<F>(&self, name: &'static str, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        debug!(task = name, "Spawning tracked task");
        self.task_tracker.spawn(future)
    }

    /// Spawn a tracked task that receives its own child token
    pub fn spawn_cancellable<F, Fut>(&self, name: &'static str, task_fn: F) -> JoinHandle<Fut::Output>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let token = self.child_token();
        self.spawn(name, task_fn(token))
    }

    /// Cancel every token, then wait for tracked tasks
    ///
    /// Returns `true` if all tasks finished within `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        info!(
            timeout = ?timeout,
            active = self.task_tracker.len(),
            "Initiating graceful shutdown"
        );

        self.cancel_token.cancel();
        self.task_tracker.close();

        if tokio::time::timeout(timeout, self.task_tracker.wait())
            .await
            .is_ok()
        {
            info!("All tasks completed cleanly");
            true
        } else {
            warn!(
                active = self.task_tracker.len(),
                "Grace period elapsed with tasks still running"
            );
            false
        }
    }
}
