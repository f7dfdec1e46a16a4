//! Providers for the built-in derived classifiers.

mod block;

pub use block::BlockProvider;
