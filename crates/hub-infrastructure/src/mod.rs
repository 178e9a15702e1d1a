// Clippy allows for nested conditionals in orchestration code
#![allow(clippy::collapsible_if)]

//! # Infrastructure Layer
//!
//! Everything around the composition algorithms that touches the outside
//! world: files, environment, signals, the async runtime and logging.
//!
//! ## Module Categories
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Document loading and `[hub]` settings via Figment |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Runtime
//! | Module | Description |
//! |--------|-------------|
//! | [`infrastructure`] | Lifecycle orchestrator, shutdown coordinator, signals |
//! | [`bootstrap`] | The [`Hub`] composition routine |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod infrastructure;
pub mod logging;

pub use bootstrap::Hub;
pub use config::{ConfigLoader, HubConfig, LoadedConfig, LoggingConfig};
pub use error_ext::ErrorContext;
pub use infrastructure::{ComponentInfo, Lifecycle, LifecycleOptions, RunExit};
