use async_trait::async_trait;

use crate::{
	models::{ClassifierKind, ResolvedValue},
	services::observer::{Collector, ObserverError, Resolver},
};

/// Exposes the header of the block that started the cycle. Performs no I/O.
#[derive(Debug, Default)]
pub struct BlockHeaderCollector;

impl BlockHeaderCollector {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl Collector for BlockHeaderCollector {
	fn name(&self) -> &str {
		"block_header_collector"
	}

	fn kind(&self) -> ClassifierKind {
		ClassifierKind::BlockHeader
	}

	async fn fetch(&self, resolver: &Resolver<'_>) -> Result<ResolvedValue, ObserverError> {
		Ok(ResolvedValue::BlockHeader(resolver.header().clone()))
	}
}
