//! Infrastructure Services
//!
//! Runtime machinery around the constructed components.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`lifecycle`] | Init / Run / Close orchestration with rollback |
//! | [`shutdown`] | Cancellation tokens and task tracking for Run phases |
//! | [`signals`] | SIGINT / SIGTERM handling |

pub mod lifecycle;
pub mod shutdown;
pub mod signals;

pub use lifecycle::{ComponentInfo, Lifecycle, LifecycleOptions, RunExit};
pub use shutdown::ShutdownCoordinator;
pub use signals::{ShutdownSignal, wait_for_shutdown_signal};
