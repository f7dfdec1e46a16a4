//! Chain data models.
//!
//! - `api`: raw JSON-RPC payloads
//! - `account`: account snapshots and balance accounting
//! - `block`: block headers, transactions and the combined block view
//! - `properties`: dynamic global properties

pub mod account;
pub mod api;
pub mod block;
pub mod properties;
