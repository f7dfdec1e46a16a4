//! Built-in filters.
//!
//! - `block_changed`: edge detector on the block number
//! - `block_number`: a specific block
//! - `balance_change`: balance changes of watched accounts
//! - `transaction_id`: inclusion of given transactions
//! - `composite`: logical AND / OR of other filters

mod balance_change;
mod block_changed;
mod block_number;
mod composite;
mod transaction_id;

pub use balance_change::BalanceChangeFilter;
pub use block_changed::BlockChangedFilter;
pub use block_number::BlockNumberFilter;
pub use composite::{LogicalAndFilter, LogicalOrFilter};
pub use transaction_id::TransactionIdFilter;
