use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::{
	models::{BlockView, ClassifierIdentity},
	services::observer::{Filter, ObserverError, Resolver},
};

/// Matches when the block includes any of the given transactions.
#[derive(Debug)]
pub struct TransactionIdFilter {
	ids: BTreeSet<String>,
}

impl TransactionIdFilter {
	/// Ids are compared case-insensitively.
	pub fn new<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self {
			ids: ids
				.into_iter()
				.map(|id| id.as_ref().trim().to_lowercase())
				.collect(),
		}
	}
}

#[async_trait]
impl Filter for TransactionIdFilter {
	fn name(&self) -> &str {
		"transaction_id_filter"
	}

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		vec![ClassifierIdentity::block_view()]
	}

	async fn matches(&self, resolver: &Resolver<'_>) -> Result<bool, ObserverError> {
		let view = resolver
			.get_as::<BlockView>(&ClassifierIdentity::block_view())
			.await?;
		Ok(self.ids.iter().any(|id| view.contains_transaction(id)))
	}
}
