//! Component Registry
//!
//! Holds the descriptors that take part in resolution, in registration
//! order. Registration order is observable: it breaks ties between
//! components whose relative order the dependency graph leaves open.

pub mod catalogue;

pub use catalogue::{COMPONENTS, find_in_catalogue, list_catalogue};

use hub_domain::error::{Error, Result};
use hub_domain::value_objects::{Capability, CapabilityDescriptor};
use std::collections::HashMap;

/// Registered component descriptors
#[derive(Debug, Default, Clone)]
pub struct Registry {
    descriptors: Vec<CapabilityDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor
    ///
    /// # Errors
    /// [`Error::DuplicateName`] when the name is taken; the registry is left
    /// unchanged. An empty name is a configuration error.
    pub fn register(&mut self, descriptor: CapabilityDescriptor) -> Result<()> {
        if descriptor.name.is_empty() {
            return Err(Error::configuration("component name must not be empty"));
        }
        if self.by_name.contains_key(descriptor.name) {
            return Err(Error::DuplicateName {
                name: descriptor.name.to_string(),
            });
        }
        self.by_name.insert(descriptor.name, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Register catalogue entries by name, in the given order
    ///
    /// # Errors
    /// [`Error::Configuration`] for a name missing from the catalogue,
    /// [`Error::DuplicateName`] for a name registered twice.
    pub fn register_catalogue<'n>(
        &mut self,
        names: impl IntoIterator<Item = &'n str>,
    ) -> Result<()> {
        for name in names {
            let descriptor = find_in_catalogue(name).ok_or_else(|| {
                let available: Vec<_> = list_catalogue().into_iter().map(|(n, _)| n).collect();
                Error::configuration(format!(
                    "unknown component `{name}`; available components: {available:?}"
                ))
            })?;
            self.register(*descriptor)?;
        }
        Ok(())
    }

    /// Register the whole catalogue, sorted by name
    ///
    /// Link order of distributed slices is unspecified, so sorting keeps
    /// the registration order stable across builds.
    pub fn register_all_catalogue(&mut self) -> Result<()> {
        let mut descriptors: Vec<_> = COMPONENTS.iter().copied().collect();
        descriptors.sort_by_key(|descriptor| descriptor.name);
        descriptors
            .into_iter()
            .try_for_each(|descriptor| self.register(descriptor))
    }

    /// Descriptor registered under `name`
    pub fn lookup_by_name(&self, name: &str) -> Option<&CapabilityDescriptor> {
        self.by_name.get(name).map(|&index| &self.descriptors[index])
    }

    /// Every descriptor offering the service, in registration order
    pub fn lookup_by_service(&self, service: &str) -> Vec<&CapabilityDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.services.contains(&service))
            .collect()
    }

    /// Every descriptor offering the capability type, in registration order
    pub fn lookup_by_type(&self, tag: &str) -> Vec<&CapabilityDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.types.contains(&tag))
            .collect()
    }

    /// Every descriptor offering the capability, in registration order
    pub fn lookup(&self, capability: &Capability) -> Vec<&CapabilityDescriptor> {
        match capability {
            Capability::Service(name) => self.lookup_by_service(name),
            Capability::Type(tag) => self.lookup_by_type(tag),
        }
    }

    /// Registration index of `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CapabilityDescriptor> {
        self.descriptors.iter()
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|descriptor| descriptor.name).collect()
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
