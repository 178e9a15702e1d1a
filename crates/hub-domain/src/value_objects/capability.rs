//! Capability tags and dependency declarations
//!
//! Components advertise what they offer and what they need with plain tags
//! compared by equality. A [`Capability::Service`] names a service
//! identifier, a [`Capability::Type`] names an abstract interface tag such
//! as `"etcd.Client"`. Both are `&'static str` so descriptors stay
//! const-constructible.

use std::fmt;

/// Something a component offers or requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// A named service identifier
    Service(&'static str),
    /// An abstract capability type tag
    Type(&'static str),
}

impl Capability {
    /// Service capability
    pub const fn service(name: &'static str) -> Self {
        Self::Service(name)
    }

    /// Capability type tag
    pub const fn of_type(tag: &'static str) -> Self {
        Self::Type(tag)
    }

    /// The bare identifier, without its kind
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::Service(name) | Self::Type(name) => name,
        }
    }

    /// Whether this is a service identifier
    pub const fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(name) => write!(f, "service `{name}`"),
            Self::Type(tag) => write!(f, "type `{tag}`"),
        }
    }
}

/// A declared need of a component
///
/// ```
/// use hub_domain::value_objects::{Capability, Dependency};
///
/// const NEEDS: &[Dependency] = &[
///     Dependency::service("clock"),
///     Dependency::of_type("etcd.Client").optional(),
///     Dependency::service("storage").from_provider("sqlite3"),
/// ];
/// assert!(NEEDS[0].required);
/// assert!(!NEEDS[1].required);
/// assert_eq!(NEEDS[2].provider, Some("sqlite3"));
/// assert_eq!(NEEDS[0].capability, Capability::service("clock"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// What is needed
    pub capability: Capability,
    /// Whether resolution fails when nothing provides it
    pub required: bool,
    /// Pins the dependency to one descriptor name, resolving ambiguity
    pub provider: Option<&'static str>,
}

impl Dependency {
    /// Required dependency on a service
    pub const fn service(name: &'static str) -> Self {
        Self {
            capability: Capability::Service(name),
            required: true,
            provider: None,
        }
    }

    /// Required dependency on a capability type
    pub const fn of_type(tag: &'static str) -> Self {
        Self {
            capability: Capability::Type(tag),
            required: true,
            provider: None,
        }
    }

    /// Mark the dependency optional
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Pin the dependency to the descriptor with this name
    pub const fn from_provider(mut self, provider: &'static str) -> Self {
        self.provider = Some(provider);
        self
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.capability)?;
        if let Some(provider) = self.provider {
            write!(f, " from `{provider}`")?;
        }
        if !self.required {
            f.write_str(" (optional)")?;
        }
        Ok(())
    }
}
