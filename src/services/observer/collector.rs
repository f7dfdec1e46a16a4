//! Collector interface and its subscription table.

use async_trait::async_trait;
use std::{
	collections::BTreeMap,
	sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
	models::{ClassifierIdentity, ClassifierKind, ResolvedValue},
	services::observer::{ObserverError, Resolver},
};

/// Stateful fetcher bound to one classifier kind.
///
/// Collectors are created once and reused for every cycle. They read the chain
/// through their client and may read other classifiers through the resolver,
/// limited to the identities returned by [`Collector::dependencies`].
#[async_trait]
pub trait Collector: Send + Sync {
	/// Name the collector's timings are recorded under
	fn name(&self) -> &str;

	/// Kind the collector resolves
	fn kind(&self) -> ClassifierKind;

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		Vec::new()
	}

	/// Subscription table of a parameterized collector
	fn subscriptions(&self) -> Option<&SubscriptionTable> {
		None
	}

	/// Fetches the value for the current cycle.
	///
	/// Any failed chain call fails the whole fetch.
	async fn fetch(&self, resolver: &Resolver<'_>) -> Result<ResolvedValue, ObserverError>;
}

/// Reference counted set of option values a collector fetches.
///
/// Counts never go below zero and an option is removed when its count reaches
/// zero. A fetch works on a [`SubscriptionTable::snapshot`] taken under the
/// lock, so changes made while a fetch is running apply to the next cycle.
#[derive(Debug, Default)]
pub struct SubscriptionTable {
	counts: Mutex<BTreeMap<String, usize>>,
}

impl SubscriptionTable {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> MutexGuard<'_, BTreeMap<String, usize>> {
		self.counts.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Increments the count of `option` and returns the new count.
	pub fn subscribe(&self, option: &str) -> usize {
		let mut counts = self.lock();
		let count = counts.entry(option.to_string()).or_insert(0);
		*count += 1;
		*count
	}

	/// Decrements the count of `option` and returns the new count.
	///
	/// Unknown options stay absent and return 0.
	pub fn unsubscribe(&self, option: &str) -> usize {
		let mut counts = self.lock();
		let Some(count) = counts.get_mut(option) else {
			return 0;
		};
		*count = count.saturating_sub(1);
		let remaining = *count;
		if remaining == 0 {
			counts.remove(option);
		}
		remaining
	}

	pub fn count(&self, option: &str) -> usize {
		self.lock().get(option).copied().unwrap_or(0)
	}

	/// Options with a positive count, sorted.
	pub fn snapshot(&self) -> Vec<String> {
		self.lock().keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}
}
