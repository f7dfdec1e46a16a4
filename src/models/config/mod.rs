//! Configuration loading and validation.

#![allow(clippy::result_large_err)]

mod error;
mod observer_config;

pub use error::ConfigError;
pub use observer_config::{FilterConfig, ObserverConfig};
