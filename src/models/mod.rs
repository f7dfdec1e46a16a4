//! Domain models and data structures.
//!
//! - `blockchain`: chain payloads and the domain values derived from them
//! - `config`: configuration loading and validation
//! - `core`: classifier identities and resolved values

mod blockchain;
mod config;
mod core;

pub use blockchain::account::{
	Account, AccountBalance, AccountData, Asset, DetailedBalance, LiquidBalance, Manabar,
	MaxManabar, VestingBalance,
};
pub use blockchain::api::{
	ApiAccount, ApiAsset, ApiBlock, ApiDynamicGlobalProperties, ApiFindAccountsResponse,
	ApiGetBlockResponse, ApiManabar,
};
pub use blockchain::block::{BlockData, BlockHeaderData, BlockView, TransactionData};
pub use blockchain::properties::DynamicGlobalProperties;

pub use config::{ConfigError, FilterConfig, ObserverConfig};

pub use core::{format_chain, ClassifierIdentity, ClassifierKind, FromResolved, ResolvedValue};
