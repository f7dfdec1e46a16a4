//! Bootstrap module for building the observer from its configuration.
//!
//! - `build_observer`: registers the built-in collectors and providers, then
//!   the configured filters, and validates the dependency graph
//! - `build_filter`: turns one filter configuration into a filter

use std::{error::Error, sync::Arc};
use tracing::info;

use crate::{
	models::{FilterConfig, ObserverConfig},
	services::{
		chain::ChainClient,
		collectors::{
			AccountCollector, BlockCollector, BlockHeaderCollector,
			DynamicGlobalPropertiesCollector,
		},
		filters::{
			BalanceChangeFilter, BlockChangedFilter, BlockNumberFilter, LogicalAndFilter,
			LogicalOrFilter, TransactionIdFilter,
		},
		observer::{Filter, FilterId, Observer, ObserverError},
		providers::BlockProvider,
	},
};

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Creates the filter described by `config`.
pub fn build_filter(config: &FilterConfig) -> Arc<dyn Filter> {
	match config {
		FilterConfig::NewBlock => Arc::new(BlockChangedFilter::new()),
		FilterConfig::BlockNumber { number } => Arc::new(BlockNumberFilter::new(*number)),
		FilterConfig::BalanceChange {
			accounts,
			include_internal_transfers,
		} => Arc::new(BalanceChangeFilter::new(
			accounts,
			*include_internal_transfers,
		)),
		FilterConfig::TransactionIds { ids } => Arc::new(TransactionIdFilter::new(ids)),
		FilterConfig::All { filters } => Arc::new(LogicalAndFilter::new(
			filters.iter().map(build_filter).collect(),
		)),
		FilterConfig::Any { filters } => Arc::new(LogicalOrFilter::new(
			filters.iter().map(build_filter).collect(),
		)),
	}
}

/// Registers the built-in handlers reading through `client`.
pub fn register_builtin_handlers<C: ChainClient + 'static>(
	observer: &mut Observer,
	client: Arc<C>,
) -> std::result::Result<(), ObserverError> {
	observer.register_collector(Arc::new(BlockHeaderCollector::new()))?;
	observer.register_collector(Arc::new(BlockCollector::new(client.clone())))?;
	observer.register_collector(Arc::new(AccountCollector::new(client.clone())))?;
	observer.register_collector(Arc::new(DynamicGlobalPropertiesCollector::new(client)))?;
	observer.register_provider(Arc::new(BlockProvider::new()))?;
	Ok(())
}

/// Builds a validated observer with every configured filter registered.
///
/// Returns the filter ids in configuration order.
pub fn build_observer<C: ChainClient + 'static>(
	config: &ObserverConfig,
	client: Arc<C>,
) -> std::result::Result<(Observer, Vec<FilterId>), ObserverError> {
	let mut observer = Observer::new();
	register_builtin_handlers(&mut observer, client)?;
	observer.validate()?;

	let ids = config
		.filters
		.iter()
		.map(|filter| observer.register_filter(build_filter(filter)))
		.collect::<std::result::Result<Vec<_>, _>>()?;

	info!(filters = ids.len(), "observer ready");
	Ok((observer, ids))
}
