//! Block watcher driving one observer cycle per block.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{info, instrument};

use crate::services::{
	blockwatcher::{BlockSource, BlockWatcherError},
	observer::{CycleReport, Observer},
};

/// Feeds blocks from a [`BlockSource`] into an [`Observer`] and forwards
/// the reports.
pub struct BlockWatcher<S: BlockSource> {
	observer: Arc<Observer>,
	source: S,
	reports: mpsc::Sender<CycleReport>,
}

impl<S: BlockSource> BlockWatcher<S> {
	pub fn new(observer: Arc<Observer>, source: S, reports: mpsc::Sender<CycleReport>) -> Self {
		Self {
			observer,
			source,
			reports,
		}
	}

	/// Runs until `shutdown` changes, its sender is dropped or the report
	/// receiver is closed.
	///
	/// A cycle still running at shutdown is cancelled. Source errors skip the
	/// poll; fatal cycle errors end the watcher.
	#[instrument(skip_all)]
	pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), BlockWatcherError> {
		loop {
			let next = tokio::select! {
				_ = shutdown.changed() => break,
				next = self.source.next_block() => next,
			};
			// Already logged when the error was created
			let Ok(header) = next else {
				continue;
			};

			let result = tokio::select! {
				_ = shutdown.changed() => {
					info!(block = header.number, "shutdown requested, cancelling cycle");
					break;
				}
				result = self.observer.run_cycle(&header) => result,
			};

			let report = result.map_err(|e| {
				BlockWatcherError::cycle_error(
					format!("cycle for block {} failed", header.number),
					Some(Box::new(e)),
					None,
				)
			})?;

			if self.reports.send(report).await.is_err() {
				info!("report receiver closed, stopping block watcher");
				break;
			}
		}

		info!("block watcher stopped");
		Ok(())
	}
}
