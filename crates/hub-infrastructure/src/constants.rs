//! Infrastructure layer constants

use std::time::Duration;

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "hub.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "hub";

/// Environment variable prefix for hub settings
pub const CONFIG_ENV_PREFIX: &str = "HUB";

/// Separator between the prefix and nested keys of hub settings (`HUB__LOGGING__LEVEL`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Reserved top-level section holding the hub's own settings
pub const HUB_SECTION: &str = "hub";

// ============================================================================
// LIFECYCLE CONSTANTS
// ============================================================================

/// Time Run phases get to return after cancellation
pub const DEFAULT_SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(30);

/// Upper bound for a single Close phase
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "HUB_LOG";

/// File stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "hub";
