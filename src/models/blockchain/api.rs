//! Raw payloads returned by the node's JSON-RPC API.
//!
//! These mirror the wire format closely; collectors turn them into the domain
//! models of this module's siblings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Asset in NAI form, amount encoded as a decimal string of base units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiAsset {
	pub amount: String,
	pub precision: u8,
	pub nai: String,
}

/// Manabar as returned by `find_accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiManabar {
	#[serde(deserialize_with = "deserialize_chain_integer")]
	pub current_mana: u64,
	pub last_update_time: i64,
}

/// Account object from `database_api.find_accounts`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiAccount {
	pub name: String,
	pub voting_manabar: ApiManabar,
	pub downvote_manabar: ApiManabar,
	pub post_voting_power: ApiAsset,
	#[serde(default)]
	pub posting_json_metadata: String,
	#[serde(default)]
	pub json_metadata: String,
	pub balance: ApiAsset,
	pub savings_balance: ApiAsset,
	pub reward_hive_balance: ApiAsset,
	pub hbd_balance: ApiAsset,
	pub savings_hbd_balance: ApiAsset,
	pub reward_hbd_balance: ApiAsset,
	pub vesting_shares: ApiAsset,
	pub delegated_vesting_shares: ApiAsset,
	pub received_vesting_shares: ApiAsset,
	pub reward_vesting_balance: ApiAsset,
	pub vesting_withdraw_rate: ApiAsset,
	pub recovery_account: String,
	#[serde(default)]
	pub governance_vote_expiration_ts: Option<String>,
}

/// Response of `database_api.find_accounts`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiFindAccountsResponse {
	pub accounts: Vec<ApiAccount>,
}

/// Signed block from `block_api.get_block`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiBlock {
	pub block_id: String,
	pub previous: String,
	pub timestamp: String,
	pub witness: String,
	#[serde(default)]
	pub transactions: Vec<Value>,
	#[serde(default)]
	pub transaction_ids: Vec<String>,
}

/// Response of `block_api.get_block`; `block` is absent for unknown numbers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiGetBlockResponse {
	#[serde(default)]
	pub block: Option<ApiBlock>,
}

/// Response of `database_api.get_dynamic_global_properties`, reduced to the
/// fields this crate reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiDynamicGlobalProperties {
	pub head_block_number: u64,
	pub head_block_id: String,
	pub time: String,
	pub current_witness: String,
	pub last_irreversible_block_num: u64,
}

/// Large chain integers are sent either as JSON numbers or as strings.
fn deserialize_chain_integer<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum ChainInteger {
		Number(u64),
		Text(String),
	}

	match ChainInteger::deserialize(deserializer)? {
		ChainInteger::Number(n) => Ok(n),
		ChainInteger::Text(s) => s.parse::<u64>().map_err(serde::de::Error::custom),
	}
}
