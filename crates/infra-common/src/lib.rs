//! Common infrastructure for the Bluffline crates
//!
//! Everything in here is protocol-agnostic plumbing that the session and
//! client layers share:
//!
//! - [`logging`] - `tracing` subscriber setup and log level parsing
//! - [`config`] - loading serde-described configuration from TOML
//! - [`errors`] - the infrastructure error type and error context helpers

pub mod config;
pub mod errors;
pub mod logging;

pub use errors::types::{Error, Result};
pub use logging::setup::{setup_logging, LoggingConfig};

/// Crate version, used in the startup banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
