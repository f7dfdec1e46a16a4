use async_trait::async_trait;
use std::{
	collections::{BTreeMap, HashMap},
	sync::Arc,
	time::Instant,
};
use tracing::{debug, instrument};

use crate::{
	models::{Account, AccountData, ClassifierKind, ResolvedValue},
	services::{
		chain::ChainClient,
		observer::{Collector, ObserverError, Resolver, SubscriptionTable},
	},
};

/// Most names `find_accounts` accepts in one call
pub const FIND_ACCOUNTS_LIMIT: usize = 1000;

const FIND_ACCOUNTS_TIMING: &str = "database_api.find_accounts";
const ACCOUNT_ANALYSIS_TIMING: &str = "account_analysis";

/// Fetches every subscribed account once per cycle.
///
/// Subscriptions are account names, read as they were when the cycle
/// started. Names are split into batches of at most
/// [`FIND_ACCOUNTS_LIMIT`] and the batches are merged by name.
pub struct AccountCollector<C: ChainClient> {
	client: Arc<C>,
	subscriptions: SubscriptionTable,
	batch_size: usize,
}

impl<C: ChainClient> AccountCollector<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self::with_batch_size(client, FIND_ACCOUNTS_LIMIT)
	}

	/// Uses smaller batches; values above the node limit are capped.
	pub fn with_batch_size(client: Arc<C>, batch_size: usize) -> Self {
		Self {
			client,
			subscriptions: SubscriptionTable::new(),
			batch_size: batch_size.clamp(1, FIND_ACCOUNTS_LIMIT),
		}
	}
}

#[async_trait]
impl<C: ChainClient + 'static> Collector for AccountCollector<C> {
	fn name(&self) -> &str {
		"account_collector"
	}

	fn kind(&self) -> ClassifierKind {
		ClassifierKind::Account
	}

	fn subscriptions(&self) -> Option<&SubscriptionTable> {
		Some(&self.subscriptions)
	}

	#[instrument(skip_all, fields(accounts = tracing::field::Empty))]
	async fn fetch(&self, resolver: &Resolver<'_>) -> Result<ResolvedValue, ObserverError> {
		let names = resolver.subscribed(ClassifierKind::Account);
		tracing::Span::current().record("accounts", names.len());

		let mut accounts = BTreeMap::new();
		for batch in names.chunks(self.batch_size) {
			let started = Instant::now();
			let response = self.client.find_accounts(batch).await;
			resolver.add_timing(FIND_ACCOUNTS_TIMING, started.elapsed());

			let response = response.map_err(|e| {
				ObserverError::fetch_error(
					"failed to fetch accounts",
					Some(Box::new(e)),
					Some(HashMap::from([(
						"batch_size".to_string(),
						batch.len().to_string(),
					)])),
				)
			})?;

			let started = Instant::now();
			let decoded = response
				.iter()
				.map(|raw| {
					Account::from_api(raw).map_err(|e| {
						ObserverError::fetch_error(
							format!("invalid account data for {}", raw.name),
							Some(e.into()),
							None,
						)
					})
				})
				.collect::<Result<Vec<_>, _>>();
			resolver.add_timing(ACCOUNT_ANALYSIS_TIMING, started.elapsed());

			for account in decoded? {
				accounts.insert(account.name.clone(), account);
			}
		}

		debug!(requested = names.len(), received = accounts.len(), "fetched accounts");
		Ok(AccountData { accounts }.into())
	}
}
