//! Hub settings, read from the reserved `[hub]` section

use super::LoggingConfig;
use crate::constants::{DEFAULT_CLOSE_TIMEOUT, DEFAULT_SHUTDOWN_GRACE_PERIOD};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime settings of the hub itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Components to activate; empty activates every configured component
    #[serde(with = "string_list")]
    pub components: Vec<String>,

    /// Time Run phases get to return after cancellation
    #[serde(with = "duration_text")]
    pub shutdown_grace_period: Duration,

    /// Upper bound for each Close phase
    #[serde(with = "duration_text")]
    pub close_timeout: Duration,

    /// Stop the hub as soon as any Run phase fails
    pub exit_on_run_failure: bool,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            shutdown_grace_period: DEFAULT_SHUTDOWN_GRACE_PERIOD,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
            exit_on_run_failure: false,
            logging: LoggingConfig::default(),
        }
    }
}

/// Durations as humantime text (`"30s"`); bare integers are nanoseconds
mod duration_text {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Nanos(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Nanos(nanos) => Ok(Duration::from_nanos(nanos)),
            Raw::Text(text) => hub_application::parse_duration(text.trim()).map_err(D::Error::custom),
        }
    }
}

/// Lists given either as a sequence or as comma-separated text
mod string_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
    }

    pub fn serialize<S: Serializer>(items: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        items.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::List(items) => items,
            Raw::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}
