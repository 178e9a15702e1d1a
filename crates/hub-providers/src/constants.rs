//! Provider Constants
//!
//! Names, identities and defaults of the bundled components. Identities are
//! what other components declare in their dependencies, so they are part of
//! each provider's public surface.

// ============================================================================
// CLOCK
// ============================================================================

/// Clock component name
pub const CLOCK_NAME: &str = "clock";

/// Service offered by the clock
pub const CLOCK_SERVICE: &str = "clock";

/// Capability type answered with an `Arc<dyn Clock>`
pub const CLOCK_TYPE: &str = "Clock";

// ============================================================================
// HEARTBEAT
// ============================================================================

/// Heartbeat component name
pub const HEARTBEAT_NAME: &str = "heartbeat";

/// Service offered by the heartbeat
pub const HEARTBEAT_SERVICE: &str = "heartbeat";

/// Default beat interval
pub const HEARTBEAT_DEFAULT_INTERVAL: &str = "10s";

/// Default beat message
pub const HEARTBEAT_DEFAULT_MESSAGE: &str = "alive";

// ============================================================================
// ETCD
// ============================================================================

/// etcd component name
pub const ETCD_NAME: &str = "etcd";

/// Service answered with the provider itself
pub const ETCD_SERVICE: &str = "etcd";

/// Service answered with the client handle
pub const ETCD_CLIENT_SERVICE: &str = "etcd-client";

/// Capability type answered with the provider itself
pub const ETCD_INTERFACE_TYPE: &str = "etcd.Interface";

/// Capability type answered with the client handle
pub const ETCD_CLIENT_TYPE: &str = "etcd.Client";

/// Default dial timeout
pub const ETCD_DEFAULT_TIMEOUT: &str = "5s";
