//! Configuration loader
//!
//! Reads one configuration document (TOML, YAML or JSON, chosen by file
//! extension) and splits it in two:
//!
//! - the raw hierarchical document the binder consumes, keyed by component
//!   name;
//! - the hub's own settings from the reserved `[hub]` section, layered with
//!   Figment as defaults < file < `HUB__*` environment variables.

use crate::config::HubConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
    HUB_SECTION,
};
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use hub_application::RawConfig;
use hub_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Everything read from the configuration sources
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Hub settings
    pub hub: HubConfig,
    /// Whole document, component sections included
    pub raw: RawConfig,
    /// File the document was read from, if any
    pub source: Option<PathBuf>,
}

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Get the configured file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load configuration from all sources
    ///
    /// An explicitly configured file must exist. Without one, the default
    /// locations are searched and a missing file yields an empty document.
    pub fn load(&self) -> Result<LoadedConfig> {
        let source = match &self.config_path {
            Some(path) if path.exists() => Some(path.clone()),
            Some(path) => {
                log_config_loaded(path, false);
                return Err(Error::configuration(format!(
                    "configuration file {} does not exist",
                    path.display()
                )));
            }
            None => Self::find_default_config_path(),
        };

        let raw = match &source {
            Some(path) => {
                let raw = read_document(path)?;
                log_config_loaded(path, true);
                raw
            }
            None => RawConfig::empty(),
        };

        let hub = self.extract_hub_config(&raw)?;
        validate_hub_config(&hub)?;

        Ok(LoadedConfig { hub, raw, source })
    }

    /// Hub settings: defaults, then the `[hub]` section, then the environment
    fn extract_hub_config(&self, raw: &RawConfig) -> Result<HubConfig> {
        let env_prefix = format!("{}{CONFIG_ENV_SEPARATOR}", self.env_prefix);
        Figment::new()
            .merge(Serialized::defaults(HubConfig::default()))
            .merge(Serialized::defaults(raw.section(HUB_SECTION).as_map().clone()))
            .merge(Env::prefixed(&env_prefix).split(CONFIG_ENV_SEPARATOR))
            .extract()
            .context("invalid [hub] settings")
    }

    /// Find default configuration file paths to try
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

/// Parse a configuration document, picking the format from the extension
pub fn read_document(path: &Path) -> Result<RawConfig> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let figment = match extension.as_deref() {
        Some("toml") | None => Figment::from(Toml::file(path)),
        Some("yaml" | "yml") => Figment::from(Yaml::file(path)),
        Some("json") => Figment::from(Json::file(path)),
        Some(other) => {
            return Err(Error::configuration(format!(
                "unsupported configuration format `.{other}` for {}",
                path.display()
            )));
        }
    };

    let document: serde_json::Value = figment
        .extract()
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(RawConfig::new(document))
}

/// Validate hub settings
fn validate_hub_config(config: &HubConfig) -> Result<()> {
    if config.close_timeout.is_zero() {
        return Err(Error::configuration("hub.close_timeout cannot be 0"));
    }
    crate::logging::parse_log_level(&config.logging.level)?;
    Ok(())
}
