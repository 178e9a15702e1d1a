//! Component capability contract
//!
//! Every adapter participates in the runtime through these ports:
//!
//! | Port | Phase | Required |
//! |------|-------|----------|
//! | [`CapabilityDescriptor::factory`](crate::value_objects::CapabilityDescriptor) | construction | yes |
//! | [`Component::init`] | Init | no (no-op default) |
//! | [`Runner::run`] | Run | no (declared via [`Instance::runnable`]) |
//! | [`Component::close`] | Close | no (no-op default) |
//! | [`Component::provide`] | injection | no (the instance itself) |

use crate::error::{BindError, ComponentResult};
use crate::value_objects::{BoundConfig, Capability, Dependency, Handle};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Context handed to [`Component::init`]
#[derive(Debug, Clone, Copy)]
pub struct InitContext<'a> {
    name: &'a str,
}

impl<'a> InitContext<'a> {
    /// Context for the named component
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    /// Name of the component being initialized
    pub fn name(&self) -> &'a str {
        self.name
    }
}

/// Identity under which a dependent asks for a provider
#[derive(Debug, Clone, Copy)]
pub struct ProvideRequest<'a> {
    /// Name of the dependent component
    pub consumer: &'a str,
    /// Requested identity
    pub capability: &'a Capability,
}

impl ProvideRequest<'_> {
    /// Whether the dependent asked for this service
    pub fn is_service(&self, name: &str) -> bool {
        matches!(self.capability, Capability::Service(s) if *s == name)
    }

    /// Whether the dependent asked for this capability type
    pub fn is_type(&self, tag: &str) -> bool {
        matches!(self.capability, Capability::Type(t) if *t == tag)
    }
}

/// A unit of functionality driven by the lifecycle orchestrator
///
/// Init runs sequentially in dependency order, so an implementation may
/// assume every component it depends on is already initialized. Close is
/// called in reverse order and must not block indefinitely.
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Init phase
    async fn init(&self, _ctx: &InitContext<'_>) -> ComponentResult<()> {
        Ok(())
    }

    /// Close phase; release every resource acquired since construction
    async fn close(&self) -> ComponentResult<()> {
        Ok(())
    }

    /// Alternate handle for a requested identity
    ///
    /// `None` injects the instance itself. Each identity is answered
    /// independently; two identities may yield unrelated handles.
    fn provide(self: Arc<Self>, _request: &ProvideRequest<'_>) -> Option<Handle> {
        None
    }
}

/// Long-lived Run phase
///
/// Started on its own task after every Init succeeded. The implementation
/// must observe `cancel` and return in bounded time once it fires.
#[async_trait]
pub trait Runner: Send + Sync + 'static {
    /// Run until completion or cancellation
    async fn run(self: Arc<Self>, cancel: CancellationToken) -> ComponentResult<()>;
}

/// A constructed component as handed to the runtime
#[derive(Clone)]
pub struct Instance {
    component: Arc<dyn Component>,
    runner: Option<Arc<dyn Runner>>,
    handle: Handle,
}

impl Instance {
    /// Component without a Run phase
    pub fn new<T: Component>(component: Arc<T>) -> Self {
        Self {
            handle: Handle::new(Arc::clone(&component)),
            component,
            runner: None,
        }
    }

    /// Component with a Run phase
    pub fn runnable<T: Component + Runner>(component: Arc<T>) -> Self {
        Self {
            handle: Handle::new(Arc::clone(&component)),
            runner: Some(Arc::clone(&component) as Arc<dyn Runner>),
            component,
        }
    }

    /// Lifecycle port
    pub fn component(&self) -> &Arc<dyn Component> {
        &self.component
    }

    /// Run phase, if declared
    pub fn runner(&self) -> Option<&Arc<dyn Runner>> {
        self.runner.as_ref()
    }

    /// Handle to the instance itself
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// The concrete instance
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.handle.get::<T>()
    }

    /// Handle injected into a dependent asking under `request`
    pub fn provide(&self, request: &ProvideRequest<'_>) -> Handle {
        Arc::clone(&self.component)
            .provide(request)
            .unwrap_or_else(|| self.handle.clone())
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.handle.type_name())
            .field("runnable", &self.runner.is_some())
            .finish()
    }
}

/// A dependency matched to the provider that satisfies it
#[derive(Debug, Clone)]
pub struct Injected {
    /// The declared dependency
    pub dependency: Dependency,
    /// Name of the providing component
    pub provider: String,
    /// Handle answered by the provider for this dependency
    pub handle: Handle,
}

/// Inputs available to a component factory
#[derive(Debug, Clone, Copy)]
pub struct Construction<'a> {
    name: &'a str,
    config: &'a BoundConfig,
    dependencies: &'a [Injected],
}

impl<'a> Construction<'a> {
    /// Construction context
    pub fn new(name: &'a str, config: &'a BoundConfig, dependencies: &'a [Injected]) -> Self {
        Self {
            name,
            config,
            dependencies,
        }
    }

    /// Name of the component being constructed
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Bound configuration
    pub fn bound_config(&self) -> &'a BoundConfig {
        self.config
    }

    /// Bound configuration deserialized into the component's struct
    pub fn config<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        self.config.deserialize()
    }

    /// Every resolved dependency, in declaration order
    pub fn dependencies(&self) -> &'a [Injected] {
        self.dependencies
    }

    /// Resolved dependency for `capability`, if present and of type `T`
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, capability: &Capability) -> Option<Arc<T>> {
        self.dependencies
            .iter()
            .find(|injected| injected.dependency.capability == *capability)
            .and_then(|injected| injected.handle.get::<T>())
    }

    /// Resolved dependency for `capability`, failing when absent or of another type
    pub fn require<T: ?Sized + Send + Sync + 'static>(
        &self,
        capability: &Capability,
    ) -> ComponentResult<Arc<T>> {
        let injected = self
            .dependencies
            .iter()
            .find(|injected| injected.dependency.capability == *capability)
            .ok_or_else(|| format!("{capability} was not injected into `{}`", self.name))?;

        injected.handle.get::<T>().ok_or_else(|| {
            format!(
                "{capability} from `{}` is a {}, not a {}",
                injected.provider,
                injected.handle.type_name(),
                std::any::type_name::<T>()
            )
            .into()
        })
    }
}
