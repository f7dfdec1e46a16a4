//! Test helper utilities for blocks
//!
//! - `BlockHeaderBuilder`: Builder for cycle headers
//! - `ApiBlockBuilder`: Builder for `get_block` payloads
//! - `head_properties`: Dynamic global properties pointing at a head block

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::models::{ApiBlock, ApiDynamicGlobalProperties, BlockHeaderData};

fn block_id(number: u64) -> String {
	format!("{:08x}{}", number, "0".repeat(32))
}

/// Builder for creating test `BlockHeaderData` instances
pub struct BlockHeaderBuilder {
	header: BlockHeaderData,
}

impl BlockHeaderBuilder {
	pub fn new(number: u64) -> Self {
		Self {
			header: BlockHeaderData {
				number,
				id: block_id(number),
				timestamp: DateTime::<Utc>::from_timestamp(1_714_564_800 + number as i64 * 3, 0)
					.unwrap_or_default(),
				witness: "gtg".to_string(),
			},
		}
	}

	pub fn witness(mut self, witness: &str) -> Self {
		self.header.witness = witness.to_string();
		self
	}

	pub fn build(self) -> BlockHeaderData {
		self.header
	}
}

/// Builder for creating test `ApiBlock` instances
pub struct ApiBlockBuilder {
	block: ApiBlock,
}

impl ApiBlockBuilder {
	pub fn new(number: u64) -> Self {
		Self {
			block: ApiBlock {
				block_id: block_id(number),
				previous: block_id(number.saturating_sub(1)),
				timestamp: "2024-05-01T12:00:03".to_string(),
				witness: "gtg".to_string(),
				transactions: Vec::new(),
				transaction_ids: Vec::new(),
			},
		}
	}

	pub fn transaction(mut self, id: &str, transaction: Value) -> Self {
		self.block.transaction_ids.push(id.to_string());
		self.block.transactions.push(transaction);
		self
	}

	pub fn transfer(self, id: &str, from: &str, to: &str, amount: &str) -> Self {
		self.transaction(
			id,
			json!({
				"operations": [{
					"type": "transfer_operation",
					"value": { "from": from, "to": to, "amount": amount, "memo": "" }
				}]
			}),
		)
	}

	pub fn build(self) -> ApiBlock {
		self.block
	}
}

/// Properties whose head is block `number`.
pub fn head_properties(number: u64) -> ApiDynamicGlobalProperties {
	ApiDynamicGlobalProperties {
		head_block_number: number,
		head_block_id: block_id(number),
		time: "2024-05-01T12:00:03".to_string(),
		current_witness: "gtg".to_string(),
		last_irreversible_block_num: number.saturating_sub(20),
	}
}
