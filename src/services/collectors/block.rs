use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::instrument;

use crate::{
	models::{BlockData, BlockHeaderData, ClassifierIdentity, ClassifierKind, ResolvedValue},
	services::{
		chain::ChainClient,
		observer::{Collector, ObserverError, Resolver},
	},
};

const GET_BLOCK_TIMING: &str = "block_api.get_block";

/// Fetches the transactions of the cycle's block.
pub struct BlockCollector<C: ChainClient> {
	client: Arc<C>,
}

impl<C: ChainClient> BlockCollector<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}
}

#[async_trait]
impl<C: ChainClient + 'static> Collector for BlockCollector<C> {
	fn name(&self) -> &str {
		"block_collector"
	}

	fn kind(&self) -> ClassifierKind {
		ClassifierKind::Block
	}

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		vec![ClassifierIdentity::block_header()]
	}

	#[instrument(skip_all)]
	async fn fetch(&self, resolver: &Resolver<'_>) -> Result<ResolvedValue, ObserverError> {
		let header = resolver
			.get_as::<BlockHeaderData>(&ClassifierIdentity::block_header())
			.await?;
		let metadata = || {
			Some(HashMap::from([(
				"block_number".to_string(),
				header.number.to_string(),
			)]))
		};

		let started = Instant::now();
		let block = self.client.get_block(header.number).await;
		resolver.add_timing(GET_BLOCK_TIMING, started.elapsed());

		let block = block
			.map_err(|e| {
				ObserverError::fetch_error("failed to fetch block", Some(Box::new(e)), metadata())
			})?
			.ok_or_else(|| {
				ObserverError::fetch_error("block is not available yet", None, metadata())
			})?;

		let data = BlockData::from_api(&block).ok_or_else(|| {
			ObserverError::fetch_error(
				"block transactions do not match their ids",
				None,
				metadata(),
			)
		})?;

		Ok(data.into())
	}
}
