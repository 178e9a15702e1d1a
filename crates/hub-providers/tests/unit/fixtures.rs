//! Shared helpers: resolve bundled components straight from the catalogue

use hub_application::{Assembly, RawConfig, Registry, Resolver};
use hub_domain::error::Result;
use std::collections::HashMap;

pub fn catalogue() -> Registry {
    let mut registry = Registry::new();
    registry.register_all_catalogue().unwrap();
    registry
}

pub fn resolve_with_env(
    raw: serde_json::Value,
    env: &[(&str, &str)],
    requested: &[&str],
) -> Result<Assembly> {
    let env: HashMap<String, String> = env
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();
    let registry = catalogue();
    Resolver::new(&registry, &RawConfig::new(raw), &env).resolve(requested)
}

pub fn resolve(raw: serde_json::Value, requested: &[&str]) -> Assembly {
    resolve_with_env(raw, &[], requested).unwrap()
}
