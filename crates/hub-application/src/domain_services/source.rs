//! Configuration inputs
//!
//! The binder reads from two sources: a hierarchical [`RawConfig`] document
//! and an [`Environment`]. Both are plain values so binding stays pure and
//! tests never touch the process environment.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Source of environment variables
pub trait Environment: Send + Sync {
    /// Value of the variable, if set
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Environment with no variables set
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEnvironment;

impl Environment for EmptyEnvironment {
    fn var(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Hierarchical configuration document
///
/// Top-level keys are component names; nested tables address nested
/// fields. A `null` value counts as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    root: Map<String, Value>,
}

impl RawConfig {
    /// Empty document
    pub fn empty() -> Self {
        Self::default()
    }

    /// Document from a JSON-like tree; anything but an object is empty
    pub fn new(value: Value) -> Self {
        match value {
            Value::Object(root) => Self { root },
            _ => Self::default(),
        }
    }

    /// Top-level table
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Value at a dotted path (`"etcd.tls.cert_file"`)
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.root, path)
    }

    /// Whether the document has a top-level section with this name
    pub fn has_section(&self, name: &str) -> bool {
        self.root.contains_key(name)
    }

    /// Sub-document under a top-level key; empty when missing or not a table
    pub fn section(&self, name: &str) -> RawConfig {
        match self.root.get(name) {
            Some(Value::Object(map)) => Self { root: map.clone() },
            _ => Self::default(),
        }
    }

    /// Top-level keys, in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// Whether the document is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl From<Value> for RawConfig {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Look up a dotted path in a table, treating `null` as absent
pub(crate) fn lookup<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = map.get(segments.next()?)?;
    segments
        .try_fold(first, |value, segment| value.as_object()?.get(segment))
        .filter(|value| !value.is_null())
}
