use async_trait::async_trait;

use crate::{
	models::{BlockHeaderData, ClassifierIdentity},
	services::observer::{Filter, ObserverError, Resolver, StagedState},
};

/// Matches whenever the block number differs from the one seen last.
///
/// The first evaluation always matches; a repeated notification for the same
/// block does not.
#[derive(Debug, Default)]
pub struct BlockChangedFilter {
	last_seen: StagedState<Option<u64>>,
}

impl BlockChangedFilter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Block number of the last completed cycle
	pub fn last_seen(&self) -> Option<u64> {
		self.last_seen.committed()
	}
}

#[async_trait]
impl Filter for BlockChangedFilter {
	fn name(&self) -> &str {
		"block_changed_filter"
	}

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		vec![ClassifierIdentity::block_header()]
	}

	async fn matches(&self, resolver: &Resolver<'_>) -> Result<bool, ObserverError> {
		let header = resolver
			.get_as::<BlockHeaderData>(&ClassifierIdentity::block_header())
			.await?;

		let changed = self.last_seen.committed() != Some(header.number);
		self.last_seen.stage(Some(header.number));
		Ok(changed)
	}

	fn commit(&self) {
		self.last_seen.commit();
	}

	fn discard(&self) {
		self.last_seen.discard();
	}
}
