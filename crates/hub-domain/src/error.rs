//! Error handling types
//!
//! Every failure the runtime can report is a variant of [`Error`]. Component
//! code returns [`ComponentResult`] with a boxed error so that adapters can
//! surface whatever their wrapped library produces; the runtime wraps those
//! boxes with the name of the component that failed.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for runtime operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by component code
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by component factories and lifecycle phases
pub type ComponentResult<T> = std::result::Result<T, BoxError>;

/// Main error type for the composition runtime
#[derive(Error, Debug)]
pub enum Error {
    /// A descriptor with the same name was already registered
    #[error("component `{name}` is already registered")]
    DuplicateName {
        /// Name that collided
        name: String,
    },

    /// A configuration field of a component could not be bound
    #[error("configuration error in component `{component}`: {source}")]
    Bind {
        /// Component whose configuration failed to bind
        component: String,
        /// Field-level failure
        #[source]
        source: BindError,
    },

    /// Dependency wiring failed
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A component failed during its Init phase
    #[error(
        "component `{component}` failed to initialize: {source}{}",
        summarize_close_failures(.close_failures)
    )]
    Init {
        /// Component whose Init failed
        component: String,
        /// Error returned by the component
        #[source]
        source: BoxError,
        /// Close failures collected while rolling back already initialized components
        close_failures: Vec<CloseFailure>,
    },

    /// One or more components failed to close during teardown
    #[error("{} component(s) failed to close: {}", .failures.len(), join_failures(.failures))]
    Close {
        /// Every close failure, in teardown order
        failures: Vec<CloseFailure>,
    },

    /// Configuration-related error outside of field binding
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Kind of resolution failure, if this is a resolution error
    pub fn resolution_kind(&self) -> Option<ResolutionErrorKind> {
        match self {
            Self::Resolution(err) => Some(err.kind()),
            _ => None,
        }
    }
}

fn summarize_close_failures(failures: &[CloseFailure]) -> String {
    if failures.is_empty() {
        String::new()
    } else {
        format!(" (rollback: {})", join_failures(failures))
    }
}

fn join_failures(failures: &[CloseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where a bound value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    /// Configuration document
    File,
    /// Environment variable declared by the field
    Environment,
    /// Default literal declared by the field
    Default,
    /// The fully bound value did not fit the target configuration type
    Bound,
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::File => "file",
            Self::Environment => "environment",
            Self::Default => "default",
            Self::Bound => "bound",
        };
        f.write_str(label)
    }
}

/// A configuration field whose value could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {origin} value {raw_value:?} for field `{field}`: {cause}")]
pub struct BindError {
    /// Full dotted path of the field
    pub field: String,
    /// Raw text that failed to parse
    pub raw_value: String,
    /// Which layer supplied the raw value
    pub origin: ValueOrigin,
    /// Parser message
    pub cause: String,
}

impl BindError {
    /// Create a bind error
    pub fn new(
        field: impl Into<String>,
        raw_value: impl Into<String>,
        origin: ValueOrigin,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            raw_value: raw_value.into(),
            origin,
            cause: cause.into(),
        }
    }
}

/// Discriminant of [`ResolutionError`], handy for assertions and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionErrorKind {
    /// A requested name is not registered
    UnknownComponent,
    /// A required dependency matched no descriptor
    Unsatisfied,
    /// A dependency matched several descriptors without a pinned provider
    Ambiguous,
    /// The dependency graph contains a cycle
    Cycle,
    /// A component factory returned an error
    ConstructionFailed,
}

/// Dependency wiring failure
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// A requested component is not registered
    #[error("unknown component `{name}`")]
    UnknownComponent {
        /// Requested name
        name: String,
    },

    /// A required dependency matched no registered component
    #[error("component `{component}` requires {dependency} but nothing provides it")]
    Unsatisfied {
        /// Dependent component
        component: String,
        /// Rendered dependency
        dependency: String,
    },

    /// A dependency matched more than one component
    #[error(
        "component `{component}` dependency {dependency} is ambiguous between {candidates:?}; pin a provider"
    )]
    Ambiguous {
        /// Dependent component
        component: String,
        /// Rendered dependency
        dependency: String,
        /// Every matching component, in registration order
        candidates: Vec<String>,
    },

    /// The dependency graph contains a cycle
    #[error("dependency cycle: {}", .path.join(" -> "))]
    Cycle {
        /// Cycle path, closed on the repeated component
        path: Vec<String>,
    },

    /// A component factory failed
    #[error("failed to construct component `{name}`: {cause}")]
    ConstructionFailed {
        /// Component being constructed
        name: String,
        /// Error returned by the factory
        #[source]
        cause: BoxError,
    },
}

impl ResolutionError {
    /// Discriminant of this error
    pub fn kind(&self) -> ResolutionErrorKind {
        match self {
            Self::UnknownComponent { .. } => ResolutionErrorKind::UnknownComponent,
            Self::Unsatisfied { .. } => ResolutionErrorKind::Unsatisfied,
            Self::Ambiguous { .. } => ResolutionErrorKind::Ambiguous,
            Self::Cycle { .. } => ResolutionErrorKind::Cycle,
            Self::ConstructionFailed { .. } => ResolutionErrorKind::ConstructionFailed,
        }
    }
}

/// A Close phase that returned an error or did not finish in time
#[derive(Error, Debug)]
#[error("component `{component}`: {cause}")]
pub struct CloseFailure {
    /// Component that failed to close
    pub component: String,
    /// Error returned by the component, or the timeout
    #[source]
    pub cause: BoxError,
}

impl CloseFailure {
    /// Create a close failure
    pub fn new(component: impl Into<String>, cause: BoxError) -> Self {
        Self {
            component: component.into(),
            cause,
        }
    }
}
