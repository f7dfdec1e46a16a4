//! Collectors for the built-in classifier kinds.
//!
//! - `block_header`: the cycle's block header
//! - `block`: the cycle's block transactions
//! - `account`: tracked accounts, batched
//! - `dynamic_global_properties`: chain-wide properties

mod account;
mod block;
mod block_header;
mod dynamic_global_properties;

pub use account::{AccountCollector, FIND_ACCOUNTS_LIMIT};
pub use block::BlockCollector;
pub use block_header::BlockHeaderCollector;
pub use dynamic_global_properties::DynamicGlobalPropertiesCollector;
