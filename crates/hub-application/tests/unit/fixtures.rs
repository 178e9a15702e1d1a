//! Shared test components and descriptor builders

use hub_domain::error::ComponentResult;
use hub_domain::ports::{Component, Construction, Instance};
use hub_domain::value_objects::{CapabilityDescriptor, Dependency};
use std::sync::Arc;

/// Component with no behavior, remembering its own name
#[derive(Debug)]
pub struct Stub {
    pub name: String,
}

impl Component for Stub {}

pub fn stub_factory(ctx: &Construction<'_>) -> ComponentResult<Instance> {
    Ok(Instance::new(Arc::new(Stub {
        name: ctx.name().to_string(),
    })))
}

/// Descriptor offering `services`, needing `dependencies`, built by [`stub_factory`]
pub fn descriptor(
    name: &'static str,
    services: &'static [&'static str],
    dependencies: &'static [Dependency],
) -> CapabilityDescriptor {
    CapabilityDescriptor {
        name,
        description: "test component",
        services,
        types: &[],
        dependencies,
        config: None,
        factory: stub_factory,
    }
}
