//! # Provider Hub
//!
//! Composition runtime for long-running services: components declare what
//! they offer and what they need, the hub binds their configuration, wires
//! them in dependency order and drives them through Init, Run and Close.
//!
//! ## Example
//!
//! ```ignore
//! use hub::infrastructure::{ConfigLoader, Hub};
//!
//! let loaded = ConfigLoader::new().with_config_path("hub.toml").load()?;
//! Hub::new(loaded)?.run(&[]).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - descriptors, configuration schema, component ports, errors
//! - `application` - registry, configuration binder, dependency resolver
//! - `infrastructure` - configuration loading, logging, lifecycle, bootstrap
//! - `providers` - bundled components (`clock`, `heartbeat`, `etcd`)

/// Domain layer - descriptors, ports and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use hub_domain::*;
}

/// Application layer - registry, binder and resolver
pub mod application {
    pub use hub_application::*;
}

/// Infrastructure layer - configuration, logging and lifecycle
pub mod infrastructure {
    pub use hub_infrastructure::*;
}

/// Bundled components
pub mod providers {
    pub use hub_providers::*;
}

pub use hub_domain::error::{Error, Result};
pub use hub_infrastructure::{ConfigLoader, Hub};
