//! Configuration module for the page text service
//!
//! `ServiceConfig` starts from built-in defaults, takes environment
//! overrides and is validated once at startup.

pub mod env;
pub mod getters;
pub mod types;

pub use types::ServiceConfig;
