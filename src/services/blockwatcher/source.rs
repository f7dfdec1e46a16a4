//! Block notifications.

use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::{debug, warn};

use crate::{
	models::BlockHeaderData,
	services::{blockwatcher::BlockWatcherError, chain::ChainClient},
};

/// Delivers headers of new blocks in non-decreasing number order.
#[async_trait]
pub trait BlockSource: Send {
	/// Waits for the next block.
	async fn next_block(&mut self) -> Result<BlockHeaderData, BlockWatcherError>;
}

/// Polls the head block and reports every increase.
///
/// Blocks produced between two polls are not reported individually; a
/// warning names how many were skipped.
pub struct PollingBlockSource<C: ChainClient> {
	client: Arc<C>,
	interval: Duration,
	last_seen: Option<u64>,
	polled: bool,
}

impl<C: ChainClient> PollingBlockSource<C> {
	pub fn new(client: Arc<C>, interval: Duration) -> Self {
		Self {
			client,
			interval,
			last_seen: None,
			polled: false,
		}
	}

	/// Starts after `number`, which is not reported again.
	pub fn starting_after(mut self, number: u64) -> Self {
		self.last_seen = Some(number);
		self
	}

	pub fn last_seen(&self) -> Option<u64> {
		self.last_seen
	}

	async fn poll(&self) -> Result<BlockHeaderData, BlockWatcherError> {
		let properties = self
			.client
			.get_dynamic_global_properties()
			.await
			.map_err(|e| {
				BlockWatcherError::source_error("failed to read head block", Some(Box::new(e)), None)
			})?;

		BlockHeaderData::from_head(&properties).ok_or_else(|| {
			BlockWatcherError::source_error(
				"head block has an invalid time",
				None,
				Some(HashMap::from([("time".to_string(), properties.time.clone())])),
			)
		})
	}
}

#[async_trait]
impl<C: ChainClient + 'static> BlockSource for PollingBlockSource<C> {
	async fn next_block(&mut self) -> Result<BlockHeaderData, BlockWatcherError> {
		loop {
			if self.polled {
				tokio::time::sleep(self.interval).await;
			}
			self.polled = true;

			let header = self.poll().await?;
			match self.last_seen {
				Some(last) if header.number <= last => {
					debug!(head = header.number, "no new block");
					continue;
				}
				Some(last) if header.number > last + 1 => {
					warn!(
						from = last + 1,
						to = header.number - 1,
						skipped = header.number - last - 1,
						"blocks produced between two polls were skipped"
					);
				}
				_ => {}
			}

			self.last_seen = Some(header.number);
			return Ok(header);
		}
	}
}
