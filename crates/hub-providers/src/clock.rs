//! Wall-clock time source
//!
//! Offers itself under the `clock` service and an `Arc<dyn Clock>` under the
//! `Clock` capability type, so dependents can choose between the concrete
//! provider and the narrower trait view.

use crate::constants::{CLOCK_NAME, CLOCK_SERVICE, CLOCK_TYPE};
use hub_application::COMPONENTS;
use hub_domain::ports::{Component, Construction, Instance, ProvideRequest};
use hub_domain::value_objects::{CapabilityDescriptor, Handle};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> SystemTime;

    /// Seconds since the Unix epoch, 0 for times before it
    fn unix_seconds(&self) -> u64 {
        self.now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

/// Clock backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl Component for SystemClock {
    fn provide(self: Arc<Self>, request: &ProvideRequest<'_>) -> Option<Handle> {
        request
            .is_type(CLOCK_TYPE)
            .then(|| Handle::new(self as Arc<dyn Clock>))
    }
}

#[linkme::distributed_slice(COMPONENTS)]
static CLOCK_PROVIDER: CapabilityDescriptor = CapabilityDescriptor {
    name: CLOCK_NAME,
    description: "System wall clock",
    services: &[CLOCK_SERVICE],
    types: &[CLOCK_TYPE],
    dependencies: &[],
    config: None,
    factory: |_ctx: &Construction<'_>| Ok(Instance::new(Arc::new(SystemClock))),
};
