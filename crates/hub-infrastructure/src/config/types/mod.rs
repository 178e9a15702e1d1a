//! Configuration types

mod hub;
mod logging;

pub use hub::HubConfig;
pub use logging::LoggingConfig;
