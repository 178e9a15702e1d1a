//! Configuration management
//!
//! | Item | Description |
//! |------|-------------|
//! | [`ConfigLoader`] | Reads the document and the hub settings |
//! | [`HubConfig`] | `[hub]` section: activation, shutdown timing, logging |
//! | [`LoggingConfig`] | Log level, format and file output |

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, LoadedConfig, read_document};
pub use types::{HubConfig, LoggingConfig};
