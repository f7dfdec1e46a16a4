use async_trait::async_trait;

use crate::{
	models::{BlockHeaderData, ClassifierIdentity},
	services::observer::{Filter, ObserverError, Resolver},
};

/// Matches the block with a given number.
#[derive(Debug)]
pub struct BlockNumberFilter {
	number: u64,
}

impl BlockNumberFilter {
	pub fn new(number: u64) -> Self {
		Self { number }
	}
}

#[async_trait]
impl Filter for BlockNumberFilter {
	fn name(&self) -> &str {
		"block_number_filter"
	}

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		vec![ClassifierIdentity::block_header()]
	}

	async fn matches(&self, resolver: &Resolver<'_>) -> Result<bool, ObserverError> {
		let header = resolver
			.get_as::<BlockHeaderData>(&ClassifierIdentity::block_header())
			.await?;
		Ok(header.number == self.number)
	}
}
