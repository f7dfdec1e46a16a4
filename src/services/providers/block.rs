use async_trait::async_trait;

use crate::{
	models::{
		BlockData, BlockHeaderData, BlockView, ClassifierIdentity, ClassifierKind, ResolvedValue,
	},
	services::observer::{ObserverError, Provider, Resolver},
};

/// Combines the cycle's header and transactions into a [`BlockView`].
#[derive(Debug, Default)]
pub struct BlockProvider;

impl BlockProvider {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl Provider for BlockProvider {
	fn name(&self) -> &str {
		"block_provider"
	}

	fn kind(&self) -> ClassifierKind {
		ClassifierKind::BlockView
	}

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		vec![ClassifierIdentity::block_header(), ClassifierIdentity::block()]
	}

	async fn derive(&self, resolver: &Resolver<'_>) -> Result<ResolvedValue, ObserverError> {
		let header_identity = ClassifierIdentity::block_header();
		let block_identity = ClassifierIdentity::block();
		let (header, content) = futures::try_join!(
			resolver.get_as::<BlockHeaderData>(&header_identity),
			resolver.get_as::<BlockData>(&block_identity),
		)?;

		Ok(BlockView { header, content }.into())
	}
}
