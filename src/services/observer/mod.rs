//! Demand-driven resolution engine.
//!
//! Filters declare the classifiers they read; collectors fetch them from the
//! chain and providers derive views from other classifiers. Each block runs
//! one cycle in a fresh [`EvaluationContext`] that resolves every classifier
//! at most once.
//!
//! - `collector`: [`Collector`] interface and [`SubscriptionTable`]
//! - `provider`: [`Provider`] interface
//! - `filter`: [`Filter`] interface and [`StagedState`]
//! - `registry`: kind to handler mapping and graph validation
//! - `context`: per-cycle cache, resolver and timings
//! - `orchestrator`: the [`Observer`] driving the cycles
//! - `error`: error types

mod collector;
mod context;
mod error;
mod filter;
mod orchestrator;
mod provider;
mod registry;

pub use collector::{Collector, SubscriptionTable};
pub use context::{EvaluationContext, Resolver, TimingGuard, TimingReport};
pub use error::ObserverError;
pub use filter::{Filter, StagedState};
pub use orchestrator::{CycleOutcome, CycleReport, FilterId, Observer};
pub use provider::Provider;
pub use registry::{Handler, HandlerRegistry};
