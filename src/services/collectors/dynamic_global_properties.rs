use async_trait::async_trait;
use std::{sync::Arc, time::Instant};

use crate::{
	models::{ClassifierKind, DynamicGlobalProperties, ResolvedValue},
	services::{
		chain::ChainClient,
		observer::{Collector, ObserverError, Resolver},
	},
};

const GET_PROPERTIES_TIMING: &str = "database_api.get_dynamic_global_properties";

/// Fetches the chain's dynamic global properties.
pub struct DynamicGlobalPropertiesCollector<C: ChainClient> {
	client: Arc<C>,
}

impl<C: ChainClient> DynamicGlobalPropertiesCollector<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}
}

#[async_trait]
impl<C: ChainClient + 'static> Collector for DynamicGlobalPropertiesCollector<C> {
	fn name(&self) -> &str {
		"dynamic_global_properties_collector"
	}

	fn kind(&self) -> ClassifierKind {
		ClassifierKind::DynamicGlobalProperties
	}

	async fn fetch(&self, resolver: &Resolver<'_>) -> Result<ResolvedValue, ObserverError> {
		let started = Instant::now();
		let properties = self.client.get_dynamic_global_properties().await;
		resolver.add_timing(GET_PROPERTIES_TIMING, started.elapsed());

		let properties = properties.map_err(|e| {
			ObserverError::fetch_error(
				"failed to fetch dynamic global properties",
				Some(Box::new(e)),
				None,
			)
		})?;

		DynamicGlobalProperties::from_api(&properties)
			.map(ResolvedValue::from)
			.ok_or_else(|| {
				ObserverError::fetch_error(
					format!("invalid head block time '{}'", properties.time),
					None,
					None,
				)
			})
	}
}
