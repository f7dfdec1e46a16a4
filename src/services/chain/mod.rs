//! Access to the chain node.
//!
//! - `client`: the [`ChainClient`] interface collectors read through
//! - `http`: JSON-RPC implementation over HTTP
//! - `error`: error types

mod client;
mod error;
mod http;

pub use client::ChainClient;
pub use error::ChainError;
pub use http::HttpChainClient;
