//! Domain Port Interfaces
//!
//! The contract every component implements to participate in the runtime.

/// Component lifecycle and injection ports
pub mod component;

pub use component::{
    Component, Construction, InitContext, Injected, Instance, ProvideRequest, Runner,
};
