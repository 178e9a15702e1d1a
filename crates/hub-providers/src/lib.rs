//! # Provider Hub - Bundled Components
//!
//! Components shipped with the hub. Each one submits a const
//! [`CapabilityDescriptor`](hub_domain::value_objects::CapabilityDescriptor)
//! to the [`COMPONENTS`](hub_application::COMPONENTS) catalogue; linking this
//! crate makes them registrable, activating them is up to configuration.
//!
//! | Component | Offers | Needs | Run phase |
//! |-----------|--------|-------|-----------|
//! | `clock` | service `clock`, type `Clock` | - | no |
//! | `heartbeat` | service `heartbeat` | type `Clock` | yes |
//! | `etcd` | services `etcd`, `etcd-client`; types `etcd.Interface`, `etcd.Client` | - | no |
//!
//! ## Usage
//!
//! A binary that only needs the catalogue side effect links the crate with
//! `extern crate hub_providers;`.

pub use hub_domain::error::{ComponentResult, Error, Result};

/// Provider-specific constants
pub mod constants;

/// Wall-clock time source
pub mod clock;

/// Periodic liveness log line
pub mod heartbeat;

/// etcd client settings
pub mod etcd;

pub use clock::{Clock, SystemClock};
pub use etcd::{ClientSettings, EtcdClient, EtcdConfig, EtcdProvider, TlsFiles, TlsMaterial};
pub use heartbeat::{Heartbeat, HeartbeatConfig};
