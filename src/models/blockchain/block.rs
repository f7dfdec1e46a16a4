use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

use crate::models::blockchain::api::{ApiBlock, ApiDynamicGlobalProperties};

/// Header of a produced block.
///
/// This is also the notification a block source delivers to start a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderData {
	pub number: u64,
	pub id: String,
	pub timestamp: DateTime<Utc>,
	pub witness: String,
}

impl BlockHeaderData {
	/// Builds the head block header from the dynamic global properties.
	pub fn from_head(properties: &ApiDynamicGlobalProperties) -> Option<Self> {
		Some(Self {
			number: properties.head_block_number,
			id: properties.head_block_id.clone(),
			timestamp: crate::utils::parse_chain_time(&properties.time)?,
			witness: properties.current_witness.clone(),
		})
	}
}

/// A transaction together with its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionData {
	pub id: String,
	pub transaction: Value,
}

/// Transactions of a block, indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
	pub transactions: Vec<TransactionData>,
	/// Transaction id to position in `transactions`
	pub transactions_per_id: HashMap<String, usize>,
}

impl BlockData {
	/// Pairs transactions with their ids.
	///
	/// Returns `None` when the node sent a different number of ids and
	/// transactions.
	pub fn from_api(block: &ApiBlock) -> Option<Self> {
		if block.transactions.len() != block.transaction_ids.len() {
			return None;
		}

		let transactions: Vec<TransactionData> = block
			.transaction_ids
			.iter()
			.zip(&block.transactions)
			.map(|(id, transaction)| TransactionData {
				id: id.clone(),
				transaction: transaction.clone(),
			})
			.collect();
		let transactions_per_id = transactions
			.iter()
			.enumerate()
			.map(|(index, tx)| (tx.id.clone(), index))
			.collect();

		Some(Self {
			transactions,
			transactions_per_id,
		})
	}

	pub fn transaction(&self, id: &str) -> Option<&TransactionData> {
		self.transactions_per_id
			.get(id)
			.and_then(|index| self.transactions.get(*index))
	}
}

/// Header and content of the cycle's block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockView {
	pub header: Arc<BlockHeaderData>,
	pub content: Arc<BlockData>,
}

impl BlockView {
	pub fn number(&self) -> u64 {
		self.header.number
	}

	pub fn contains_transaction(&self, id: &str) -> bool {
		self.content.transactions_per_id.contains_key(id)
	}
}
