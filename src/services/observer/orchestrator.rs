//! Observer: owns the handlers and filters and drives one cycle per block.

use futures::future::try_join_all;
use std::{collections::BTreeMap, fmt, sync::Arc};
use tracing::{error, info, instrument, warn};

use crate::{
	models::{BlockHeaderData, ClassifierIdentity},
	services::observer::{
		Collector, EvaluationContext, Filter, Handler, HandlerRegistry, ObserverError, Provider,
		SubscriptionTable, TimingReport,
	},
	utils::metrics::{CYCLES_TOTAL, CYCLE_DURATION, FILTER_MATCHES_TOTAL},
};

/// Handle of a registered filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterId(usize);

impl FilterId {
	pub fn value(&self) -> usize {
		self.0
	}
}

impl fmt::Display for FilterId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "filter#{}", self.0)
	}
}

/// Result of one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
	/// Every filter was evaluated
	Completed { verdicts: BTreeMap<FilterId, bool> },
	/// A failure stopped the cycle; no verdict was produced
	Aborted { reason: String },
}

/// Verdicts and timings of one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
	pub block_number: u64,
	pub outcome: CycleOutcome,
	pub timings: TimingReport,
}

impl CycleReport {
	pub fn is_completed(&self) -> bool {
		matches!(self.outcome, CycleOutcome::Completed { .. })
	}

	pub fn verdicts(&self) -> Option<&BTreeMap<FilterId, bool>> {
		match &self.outcome {
			CycleOutcome::Completed { verdicts } => Some(verdicts),
			CycleOutcome::Aborted { .. } => None,
		}
	}

	pub fn verdict(&self, id: FilterId) -> Option<bool> {
		self.verdicts().and_then(|verdicts| verdicts.get(&id).copied())
	}

	/// Filters that matched, in registration order.
	pub fn matched(&self) -> Vec<FilterId> {
		self.verdicts()
			.map(|verdicts| {
				verdicts
					.iter()
					.filter(|(_, matched)| **matched)
					.map(|(id, _)| *id)
					.collect()
			})
			.unwrap_or_default()
	}
}

/// Registry of collectors and providers plus the filters evaluated on every block.
///
/// Handlers and filters are long-lived; everything resolved during a cycle is
/// dropped with the cycle's [`EvaluationContext`].
#[derive(Default)]
pub struct Observer {
	registry: HandlerRegistry,
	filters: BTreeMap<FilterId, Arc<dyn Filter>>,
	next_filter_id: usize,
	validated: bool,
}

impl Observer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn registry(&self) -> &HandlerRegistry {
		&self.registry
	}

	/// Registers a collector or provider for `identity`'s kind.
	///
	/// Handlers are bound to kinds, so `identity` must not carry options.
	pub fn register_handler(
		&mut self,
		identity: ClassifierIdentity,
		handler: Handler,
	) -> Result<(), ObserverError> {
		if !identity.is_base() || identity.kind() != handler.kind() {
			return Err(ObserverError::registration_error(
				format!(
					"{} cannot be registered for {}",
					handler.name(),
					identity
				),
				None,
				None,
			));
		}
		self.registry.register(handler)?;
		self.validated = false;
		Ok(())
	}

	pub fn register_collector(&mut self, collector: Arc<dyn Collector>) -> Result<(), ObserverError> {
		let identity = ClassifierIdentity::new(collector.kind());
		self.register_handler(identity, Handler::Collector(collector))
	}

	pub fn register_provider(&mut self, provider: Arc<dyn Provider>) -> Result<(), ObserverError> {
		let identity = ClassifierIdentity::new(provider.kind());
		self.register_handler(identity, Handler::Provider(provider))
	}

	/// Checks the dependency graph of every registered handler.
	pub fn validate(&mut self) -> Result<(), ObserverError> {
		self.registry.validate_all()?;
		self.validated = true;
		Ok(())
	}

	/// Validates the filter's dependencies and subscribes them.
	pub fn register_filter(&mut self, filter: Arc<dyn Filter>) -> Result<FilterId, ObserverError> {
		let dependencies = filter.dependencies();
		for identity in &dependencies {
			self.registry.validate(identity)?;
		}
		for identity in &dependencies {
			self.subscribe(identity)?;
		}

		let id = FilterId(self.next_filter_id);
		self.next_filter_id += 1;
		info!(filter = filter.name(), id = %id, "registered filter");
		self.filters.insert(id, filter);
		Ok(id)
	}

	/// Removes a filter and releases its subscriptions.
	pub fn unregister_filter(&mut self, id: FilterId) -> Result<Arc<dyn Filter>, ObserverError> {
		let filter = self.filters.remove(&id).ok_or_else(|| {
			ObserverError::registration_error(format!("{} is not registered", id), None, None)
		})?;
		for identity in filter.dependencies() {
			self.unsubscribe(&identity)?;
		}
		Ok(filter)
	}

	pub fn filter(&self, id: FilterId) -> Option<&Arc<dyn Filter>> {
		self.filters.get(&id)
	}

	pub fn filter_ids(&self) -> Vec<FilterId> {
		self.filters.keys().copied().collect()
	}

	/// Adds a reference to `identity` and to everything it depends on.
	///
	/// Returns the new count of `identity`, 0 for identities without options.
	/// Takes effect from the next fetch on.
	pub fn subscribe(&self, identity: &ClassifierIdentity) -> Result<usize, ObserverError> {
		self.update_subscriptions(identity, |table, option| table.subscribe(option))
	}

	/// Drops a reference to `identity` and to everything it depends on.
	pub fn unsubscribe(&self, identity: &ClassifierIdentity) -> Result<usize, ObserverError> {
		self.update_subscriptions(identity, |table, option| table.unsubscribe(option))
	}

	/// Current subscription count of `identity`.
	pub fn subscription_count(&self, identity: &ClassifierIdentity) -> usize {
		match (identity.options(), self.registry.get(identity.kind())) {
			(Some(option), Some(handler)) => handler
				.subscriptions()
				.map_or(0, |table| table.count(option)),
			_ => 0,
		}
	}

	fn update_subscriptions(
		&self,
		identity: &ClassifierIdentity,
		update: impl Fn(&SubscriptionTable, &str) -> usize,
	) -> Result<usize, ObserverError> {
		let mut requested = 0;
		for entry in self.registry.closure(identity)? {
			let Some(option) = entry.options() else {
				continue;
			};
			let table = self
				.registry
				.get(entry.kind())
				.and_then(Handler::subscriptions);
			if let Some(table) = table {
				let count = update(table, option);
				if &entry == identity {
					requested = count;
				}
			}
		}
		Ok(requested)
	}

	/// Evaluates every filter against `header`'s block.
	///
	/// A fetch failure or a cycle found at resolution time aborts the cycle:
	/// no verdict is reported and no filter state is committed. Assertion
	/// violations are returned as errors.
	#[instrument(skip_all, fields(block = header.number))]
	pub async fn run_cycle(&self, header: &BlockHeaderData) -> Result<CycleReport, ObserverError> {
		if !self.validated {
			self.registry.validate_all()?;
		}

		// Leftovers of a cancelled cycle
		for filter in self.filters.values() {
			filter.discard();
		}

		let context = EvaluationContext::new(&self.registry, header.clone());
		let evaluations = self.filters.iter().map(|(id, filter)| {
			let context = &context;
			async move {
				let resolver = context.resolver(filter.name(), filter.dependencies());
				let _timer = context.start_timer(filter.name());
				let matched = filter.matches(&resolver).await?;
				Ok::<_, ObserverError>((*id, matched))
			}
		});
		let result = try_join_all(evaluations).await;

		match result {
			Ok(verdicts) => {
				for filter in self.filters.values() {
					filter.commit();
				}
				let verdicts: BTreeMap<FilterId, bool> = verdicts.into_iter().collect();
				for (id, matched) in &verdicts {
					if let (true, Some(filter)) = (*matched, self.filters.get(id)) {
						FILTER_MATCHES_TOTAL
							.with_label_values(&[filter.name()])
							.inc();
					}
				}

				let timings = context.finish(true);
				CYCLES_TOTAL.with_label_values(&["completed"]).inc();
				CYCLE_DURATION.observe(timings.total().as_secs_f64());

				Ok(CycleReport {
					block_number: header.number,
					outcome: CycleOutcome::Completed { verdicts },
					timings,
				})
			}
			Err(propagated) => {
				for filter in self.filters.values() {
					filter.discard();
				}
				let cause = context.take_failure().unwrap_or(propagated);
				let timings = context.finish(false);
				CYCLES_TOTAL.with_label_values(&["aborted"]).inc();

				if cause.is_fatal() {
					error!(block = header.number, error = %cause, "cycle failed");
					return Err(cause);
				}

				warn!(block = header.number, error = %cause, "cycle aborted");
				Ok(CycleReport {
					block_number: header.number,
					outcome: CycleOutcome::Aborted {
						reason: cause.to_string(),
					},
					timings,
				})
			}
		}
	}
}

impl fmt::Debug for Observer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observer")
			.field("registry", &self.registry)
			.field("filters", &self.filters.len())
			.field("validated", &self.validated)
			.finish()
	}
}
