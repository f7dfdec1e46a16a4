//! Block watching.
//!
//! - `source`: where block notifications come from
//! - `service`: the [`BlockWatcher`] running one cycle per block
//! - `error`: error types

mod error;
mod service;
mod source;

pub use error::BlockWatcherError;
pub use service::BlockWatcher;
pub use source::{BlockSource, PollingBlockSource};
