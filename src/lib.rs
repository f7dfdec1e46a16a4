//! Block-driven chain observer.
//!
//! Evaluates a set of filters against every new block. Filters declare the
//! chain data they need as classifiers; the data is fetched on demand and at
//! most once per block, however many filters read it.
//!
//! # Module Structure
//!
//! - `bootstrap`: Builds the observer from its configuration
//! - `models`: Classifier identities, chain data and configuration
//! - `services`: Resolution engine, collectors, filters, chain access and block watching
//! - `utils`: Logging, metrics, parsing and test helpers

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
