//! Application Layer - Provider Hub
//!
//! This crate holds the composition algorithms of the provider hub: the
//! registry of component descriptors, the configuration binder and the
//! dependency resolver/injector.
//!
//! ## Architecture
//!
//! The application layer:
//! - Declares the compile-time component catalogue providers submit to
//! - Binds raw configuration into per-component typed values
//! - Plans and constructs the dependency graph of the requested components
//! - Has no dependencies on infrastructure, async runtimes or file formats
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `hub-domain`: descriptors, configuration schema, ports and errors
//! - Pure Rust libraries for serialization, durations and registration

pub mod domain_services;
pub mod registry;

pub use domain_services::*;
pub use registry::*;
