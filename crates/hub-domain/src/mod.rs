//! # Provider Hub - Domain Layer
//!
//! Core types of the composition runtime, free of any runtime machinery:
//!
//! - [`value_objects`] - capability descriptors, configuration schema,
//!   handles and lifecycle states
//! - [`ports`] - the contract components implement
//! - [`error`] - the error taxonomy shared by every layer

pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{BoxError, ComponentResult, Error, Result};
