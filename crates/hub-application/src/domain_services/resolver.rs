//! Dependency Resolver / Injector
//!
//! Resolution runs in two phases. [`Resolver::plan`] is pure: it expands the
//! requested components transitively, matches every dependency to exactly
//! one provider, rejects cycles and computes the initialization order.
//! [`Resolver::construct`] then binds configuration and calls factories in
//! that order. Planning failures therefore never construct anything.

use super::assembly::{AssembledComponent, Assembly};
use super::binder::bind;
use super::graph::DependencyGraph;
use super::source::{Environment, RawConfig};
use crate::registry::Registry;
use hub_domain::error::{Error, ResolutionError, Result};
use hub_domain::ports::{Construction, Injected, ProvideRequest};
use hub_domain::value_objects::{CapabilityDescriptor, Dependency, LifecycleState};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info};

/// A dependency matched to its provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// The declared dependency
    pub dependency: Dependency,
    /// Name of the descriptor that satisfies it
    pub provider: &'static str,
}

/// A component scheduled for construction
#[derive(Debug, Clone)]
pub struct PlannedComponent {
    /// Its descriptor
    pub descriptor: CapabilityDescriptor,
    /// Matched dependencies, in declaration order; unmatched optional ones are absent
    pub bindings: Vec<Binding>,
}

/// Output of the planning phase
#[derive(Debug, Clone, Default)]
pub struct Plan {
    components: Vec<PlannedComponent>,
}

impl Plan {
    /// Components in initialization order
    pub fn components(&self) -> &[PlannedComponent] {
        &self.components
    }

    /// Names in initialization order
    pub fn order(&self) -> Vec<&'static str> {
        self.components
            .iter()
            .map(|planned| planned.descriptor.name)
            .collect()
    }
}

/// Resolves requested components against a frozen registry
pub struct Resolver<'a> {
    registry: &'a Registry,
    raw: &'a RawConfig,
    env: &'a dyn Environment,
}

impl<'a> Resolver<'a> {
    /// Resolver over a registry, a configuration document and an environment
    pub fn new(registry: &'a Registry, raw: &'a RawConfig, env: &'a dyn Environment) -> Self {
        Self { registry, raw, env }
    }

    /// Plan then construct
    ///
    /// # Errors
    /// Any planning error, [`Error::Bind`] for a field that failed to bind,
    /// or [`ResolutionError::ConstructionFailed`] for a failing factory.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Result<Assembly> {
        let plan = self.plan(requested)?;
        self.construct(&plan)
    }

    /// Expand, match, check for cycles and order, without constructing anything
    pub fn plan<S: AsRef<str>>(&self, requested: &[S]) -> std::result::Result<Plan, ResolutionError> {
        let mut queue = VecDeque::new();
        let mut seen = HashSet::new();
        for name in requested {
            let name = name.as_ref();
            let descriptor = self.registry.lookup_by_name(name).ok_or_else(|| {
                ResolutionError::UnknownComponent {
                    name: name.to_string(),
                }
            })?;
            if seen.insert(descriptor.name) {
                queue.push_back(descriptor);
            }
        }

        let mut graph = DependencyGraph::default();
        let mut bindings: HashMap<&'static str, Vec<Binding>> = HashMap::new();
        while let Some(descriptor) = queue.pop_front() {
            let position = self.registry.position(descriptor.name).unwrap_or(usize::MAX);
            graph.add_node(position, descriptor.name);

            let mut matched = Vec::with_capacity(descriptor.dependencies.len());
            for dependency in descriptor.dependencies {
                let Some(provider) = self.match_dependency(descriptor, dependency)? else {
                    debug!(
                        component = descriptor.name,
                        dependency = %dependency,
                        "Optional dependency has no provider"
                    );
                    continue;
                };
                graph.add_edge(descriptor.name, provider.name);
                matched.push(Binding {
                    dependency: *dependency,
                    provider: provider.name,
                });
                if seen.insert(provider.name) {
                    queue.push_back(provider);
                }
            }
            bindings.insert(descriptor.name, matched);
        }

        if let Some(path) = graph.find_cycle() {
            return Err(ResolutionError::Cycle { path });
        }

        let components = graph
            .topological_order()
            .into_iter()
            .filter_map(|name| {
                let descriptor = *self.registry.lookup_by_name(name)?;
                Some(PlannedComponent {
                    descriptor,
                    bindings: bindings.remove(name).unwrap_or_default(),
                })
            })
            .collect();
        let plan = Plan { components };
        debug!(order = ?plan.order(), "Resolution planned");
        Ok(plan)
    }

    fn match_dependency(
        &self,
        dependent: &CapabilityDescriptor,
        dependency: &Dependency,
    ) -> std::result::Result<Option<&'a CapabilityDescriptor>, ResolutionError> {
        let candidates: Vec<&'a CapabilityDescriptor> = match dependency.provider {
            Some(pinned) => self
                .registry
                .lookup_by_name(pinned)
                .filter(|candidate| candidate.offers(&dependency.capability))
                .into_iter()
                .collect(),
            None => self.registry.lookup(&dependency.capability),
        };

        match candidates.as_slice() {
            [] if dependency.required => Err(ResolutionError::Unsatisfied {
                component: dependent.name.to_string(),
                dependency: dependency.to_string(),
            }),
            [] => Ok(None),
            [single] => Ok(Some(*single)),
            many => Err(ResolutionError::Ambiguous {
                component: dependent.name.to_string(),
                dependency: dependency.to_string(),
                candidates: many.iter().map(|d| d.name.to_string()).collect(),
            }),
        }
    }

    /// Bind, inject and build every planned component in order
    ///
    /// Stops at the first failure; instances built so far are dropped
    /// without ever being initialized.
    pub fn construct(&self, plan: &Plan) -> Result<Assembly> {
        let mut assembly = Assembly::default();
        for planned in plan.components() {
            let name = planned.descriptor.name;

            let config = bind(&planned.descriptor.schema(), &self.raw.section(name), self.env)
                .map_err(|source| Error::Bind {
                    component: name.to_string(),
                    source,
                })?;
            debug!(component = name, state = %LifecycleState::Configured, "Configuration bound");

            let dependencies = planned
                .bindings
                .iter()
                .map(|binding| inject(&assembly, name, binding))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            debug!(component = name, state = %LifecycleState::Injected, "Dependencies injected");

            let instance = (planned.descriptor.factory)(&Construction::new(
                name,
                &config,
                &dependencies,
            ))
            .map_err(|cause| ResolutionError::ConstructionFailed {
                name: name.to_string(),
                cause,
            })?;
            info!(component = name, "Component constructed");

            assembly.push(AssembledComponent {
                name,
                instance,
                config,
                dependencies,
            });
        }
        Ok(assembly)
    }
}

fn inject(
    assembly: &Assembly,
    consumer: &str,
    binding: &Binding,
) -> std::result::Result<Injected, ResolutionError> {
    let provider = assembly
        .instance(binding.provider)
        .ok_or_else(|| ResolutionError::ConstructionFailed {
            name: consumer.to_string(),
            cause: format!("provider `{}` was not constructed first", binding.provider).into(),
        })?;
    let handle = provider.provide(&ProvideRequest {
        consumer,
        capability: &binding.dependency.capability,
    });
    Ok(Injected {
        dependency: binding.dependency,
        provider: binding.provider.to_string(),
        handle,
    })
}
