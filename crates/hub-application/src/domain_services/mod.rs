//! Domain Services
//!
//! The composition algorithms that run between registration and lifecycle.
//!
//! ## Domain Services
//!
//! | Service | Description |
//! |---------|-------------|
//! | [`bind`] | Configuration binder with file > env > default > zero precedence |
//! | [`Resolver`] | Dependency planning, injection and construction |
//! | [`Assembly`] | Constructed components in initialization order |

/// Constructed component set
pub mod assembly;
/// Configuration binder
pub mod binder;
mod graph;
/// Dependency resolver / injector
pub mod resolver;
/// Configuration inputs
pub mod source;

pub use assembly::{AssembledComponent, Assembly};
pub use binder::{bind, parse_duration, zero_value};
pub use resolver::{Binding, Plan, PlannedComponent, Resolver};
pub use source::{EmptyEnvironment, Environment, ProcessEnvironment, RawConfig};
