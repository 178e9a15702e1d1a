//! Constructed components, ready for the lifecycle orchestrator

use hub_domain::ports::{Injected, Instance};
use hub_domain::value_objects::BoundConfig;

/// One constructed component
#[derive(Debug, Clone)]
pub struct AssembledComponent {
    /// Descriptor name
    pub name: &'static str,
    /// The constructed instance
    pub instance: Instance,
    /// Configuration the instance was built from
    pub config: BoundConfig,
    /// Handles injected into the instance, in declaration order
    pub dependencies: Vec<Injected>,
}

impl AssembledComponent {
    /// Names of the components this one depends on
    pub fn providers(&self) -> Vec<&str> {
        self.dependencies
            .iter()
            .map(|injected| injected.provider.as_str())
            .collect()
    }
}

/// Constructed components in initialization order
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    components: Vec<AssembledComponent>,
}

impl Assembly {
    pub(crate) fn push(&mut self, component: AssembledComponent) {
        self.components.push(component);
    }

    /// Component by name
    pub fn get(&self, name: &str) -> Option<&AssembledComponent> {
        self.components.iter().find(|component| component.name == name)
    }

    /// Instance by name
    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.get(name).map(|component| &component.instance)
    }

    /// Names in initialization order
    pub fn names(&self) -> Vec<&'static str> {
        self.components.iter().map(|component| component.name).collect()
    }

    /// Components in initialization order
    pub fn iter(&self) -> impl Iterator<Item = &AssembledComponent> {
        self.components.iter()
    }

    /// Number of constructed components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether nothing was constructed
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl IntoIterator for Assembly {
    type Item = AssembledComponent;
    type IntoIter = std::vec::IntoIter<AssembledComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.into_iter()
    }
}
