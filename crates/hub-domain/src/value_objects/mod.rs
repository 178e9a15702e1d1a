//! Domain Value Objects
//!
//! Immutable values describing components and their configuration.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Capability`] | Service identifier or capability type tag |
//! | [`Dependency`] | A declared need, optionally pinned to one provider |
//! | [`CapabilityDescriptor`] | Static metadata of a component |
//! | [`ConfigSchema`] | Explicit description of a component's configuration |
//! | [`BoundConfig`] | Configuration after precedence has been applied |
//! | [`Handle`] | Type-erased reference offered to dependents |
//! | [`LifecycleState`] | State of a component instance |

/// Capability tags and dependency declarations
pub mod capability;
/// Configuration schema and bound values
pub mod config;
/// Capability descriptors
pub mod descriptor;
/// Type-erased handles
pub mod handle;
/// Lifecycle states
pub mod lifecycle;

pub use capability::{Capability, Dependency};
pub use config::{BoundConfig, ConfigSchema, Field, FieldKind, ScalarKind};
pub use descriptor::{CapabilityDescriptor, ComponentFactory, ConfigSchemaFactory};
pub use handle::Handle;
pub use lifecycle::LifecycleState;
