//! Capability descriptors
//!
//! A [`CapabilityDescriptor`] is the static metadata a component author
//! supplies. It is const-constructible so providers can place it in the
//! compile-time catalogue:
//!
//! ```
//! use hub_domain::ports::{Component, Construction, Instance};
//! use hub_domain::value_objects::{CapabilityDescriptor, Dependency};
//! use std::sync::Arc;
//!
//! struct Reporter;
//! impl Component for Reporter {}
//!
//! static REPORTER: CapabilityDescriptor = CapabilityDescriptor {
//!     name: "reporter",
//!     description: "Periodic reporter",
//!     services: &["reporter"],
//!     types: &[],
//!     dependencies: &[Dependency::service("clock")],
//!     config: None,
//!     factory: |_ctx: &Construction<'_>| Ok(Instance::new(Arc::new(Reporter))),
//! };
//! assert!(REPORTER.offers_anything());
//! ```

use super::capability::Capability;
use super::capability::Dependency;
use super::config::ConfigSchema;
use crate::error::ComponentResult;
use crate::ports::{Construction, Instance};
use std::fmt;

/// Builds a component instance from its bound configuration and injected dependencies
pub type ComponentFactory = fn(&Construction<'_>) -> ComponentResult<Instance>;

/// Produces the configuration schema of a component
pub type ConfigSchemaFactory = fn() -> ConfigSchema;

/// Static description of a component
#[derive(Clone, Copy)]
pub struct CapabilityDescriptor {
    /// Unique component name, also the top-level configuration section
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Service identifiers this component offers
    pub services: &'static [&'static str],
    /// Capability type tags this component offers
    pub types: &'static [&'static str],
    /// Declared needs, in order
    pub dependencies: &'static [Dependency],
    /// Configuration schema, if the component is configurable
    pub config: Option<ConfigSchemaFactory>,
    /// Instance factory
    pub factory: ComponentFactory,
}

impl CapabilityDescriptor {
    /// Whether this descriptor offers the capability
    pub fn offers(&self, capability: &Capability) -> bool {
        match capability {
            Capability::Service(name) => self.services.contains(name),
            Capability::Type(tag) => self.types.contains(tag),
        }
    }

    /// Whether other components can depend on this one
    pub fn offers_anything(&self) -> bool {
        !self.services.is_empty() || !self.types.is_empty()
    }

    /// Configuration schema, empty for unconfigurable components
    pub fn schema(&self) -> ConfigSchema {
        self.config.map(|factory| factory()).unwrap_or_default()
    }
}

impl fmt::Debug for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityDescriptor")
            .field("name", &self.name)
            .field("services", &self.services)
            .field("types", &self.types)
            .field("dependencies", &self.dependencies)
            .field("configurable", &self.config.is_some())
            .finish()
    }
}
