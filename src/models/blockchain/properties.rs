use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{models::blockchain::api::ApiDynamicGlobalProperties, utils::parse_chain_time};

/// Chain-wide state at the time of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
	pub head_block_number: u64,
	pub head_block_id: String,
	pub time: DateTime<Utc>,
	pub current_witness: String,
	pub last_irreversible_block_number: u64,
}

impl DynamicGlobalProperties {
	pub fn from_api(properties: &ApiDynamicGlobalProperties) -> Option<Self> {
		Some(Self {
			head_block_number: properties.head_block_number,
			head_block_id: properties.head_block_id.clone(),
			time: parse_chain_time(&properties.time)?,
			current_witness: properties.current_witness.clone(),
			last_irreversible_block_number: properties.last_irreversible_block_num,
		})
	}

	/// Blocks produced but not yet irreversible.
	pub fn reversible_blocks(&self) -> u64 {
		self.head_block_number
			.saturating_sub(self.last_irreversible_block_number)
	}
}
