//! Core services implementing the business logic.
//!
//! - `observer`: the resolution engine and the observer driving it
//! - `collectors`: collectors for the built-in classifier kinds
//! - `providers`: providers for the built-in derived classifiers
//! - `filters`: built-in filters
//! - `chain`: access to the chain node
//! - `blockwatcher`: block notifications and the cycle loop

pub mod blockwatcher;
pub mod chain;
pub mod collectors;
pub mod filters;
pub mod observer;
pub mod providers;
