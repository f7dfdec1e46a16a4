//! Per-cycle memoizing resolver.
//!
//! An [`EvaluationContext`] lives for exactly one cycle. Every identity gets
//! one [`OnceCell`], so concurrent requesters of the same classifier share a
//! single fetch. A [`Resolver`] is the view handed to one consumer: it knows
//! the consumer's declared dependencies and the chain of identities being
//! resolved on its path, which is what cycle detection checks.

use std::{
	collections::{BTreeMap, HashMap},
	sync::{Arc, Mutex, MutexGuard, PoisonError},
	time::{Duration, Instant},
};
use tokio::sync::OnceCell;

use crate::{
	models::{BlockHeaderData, ClassifierIdentity, ClassifierKind, FromResolved, ResolvedValue},
	services::observer::{Handler, HandlerRegistry, ObserverError},
	utils::metrics::HANDLER_DURATION,
};

/// Elapsed time per component for one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingReport {
	/// Accumulated duration by component name, including [`TimingReport::TOTAL`]
	pub entries: BTreeMap<String, Duration>,
	/// False when the cycle was aborted
	pub complete: bool,
}

impl TimingReport {
	/// Entry holding the wall time of the whole cycle
	pub const TOTAL: &'static str = "total";

	pub fn total(&self) -> Duration {
		self.get(Self::TOTAL).unwrap_or_default()
	}

	pub fn get(&self, name: &str) -> Option<Duration> {
		self.entries.get(name).copied()
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Records the time until it is dropped, whichever way the timed scope exits.
pub struct TimingGuard<'a> {
	timings: &'a Mutex<BTreeMap<String, Duration>>,
	name: String,
	started: Instant,
}

impl Drop for TimingGuard<'_> {
	fn drop(&mut self) {
		let elapsed = self.started.elapsed();
		*lock(self.timings).entry(self.name.clone()).or_default() += elapsed;
		HANDLER_DURATION
			.with_label_values(&[self.name.as_str()])
			.observe(elapsed.as_secs_f64());
	}
}

type Cell = Arc<OnceCell<ResolvedValue>>;

/// Cache, timings and failure state of one cycle.
pub struct EvaluationContext<'r> {
	registry: &'r HandlerRegistry,
	header: Arc<BlockHeaderData>,
	subscriptions: HashMap<ClassifierKind, Vec<String>>,
	cache: Mutex<HashMap<ClassifierIdentity, Cell>>,
	timings: Mutex<BTreeMap<String, Duration>>,
	failure: Mutex<Option<ObserverError>>,
	started: Instant,
}

impl<'r> EvaluationContext<'r> {
	/// Starts a cycle. Subscription tables are read here, so later changes
	/// only reach the next cycle.
	pub fn new(registry: &'r HandlerRegistry, header: BlockHeaderData) -> Self {
		let subscriptions = registry
			.handlers()
			.filter_map(|handler| {
				handler
					.subscriptions()
					.map(|table| (handler.kind(), table.snapshot()))
			})
			.collect();

		Self {
			registry,
			header: Arc::new(header),
			subscriptions,
			cache: Mutex::new(HashMap::new()),
			timings: Mutex::new(BTreeMap::new()),
			failure: Mutex::new(None),
			started: Instant::now(),
		}
	}

	/// Header of the block that triggered the cycle
	pub fn header(&self) -> &Arc<BlockHeaderData> {
		&self.header
	}

	/// Options of `kind` subscribed when the cycle started, sorted.
	pub fn subscribed(&self, kind: ClassifierKind) -> &[String] {
		self.subscriptions
			.get(&kind)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Resolver for a top-level consumer such as a filter.
	pub fn resolver(
		&self,
		consumer: impl Into<String>,
		declared: Vec<ClassifierIdentity>,
	) -> Resolver<'_> {
		Resolver {
			context: self,
			consumer: consumer.into(),
			declared,
			chain: Vec::new(),
		}
	}

	pub fn start_timer(&self, name: impl Into<String>) -> TimingGuard<'_> {
		TimingGuard {
			timings: &self.timings,
			name: name.into(),
			started: Instant::now(),
		}
	}

	/// Adds `elapsed` to the entry `name`.
	pub fn add_timing(&self, name: &str, elapsed: Duration) {
		*lock(&self.timings).entry(name.to_string()).or_default() += elapsed;
	}

	pub fn is_cached(&self, identity: &ClassifierIdentity) -> bool {
		lock(&self.cache)
			.get(identity)
			.is_some_and(|cell| cell.initialized())
	}

	pub fn is_aborted(&self) -> bool {
		lock(&self.failure).is_some()
	}

	/// Takes the failure that aborted the cycle, if any.
	pub fn take_failure(&self) -> Option<ObserverError> {
		lock(&self.failure).take()
	}

	/// Closes the cycle and adds the `total` entry.
	pub fn finish(self, complete: bool) -> TimingReport {
		let total = self.started.elapsed();
		let mut entries = self
			.timings
			.into_inner()
			.unwrap_or_else(PoisonError::into_inner);
		entries.insert(TimingReport::TOTAL.to_string(), total);
		TimingReport { entries, complete }
	}

	fn cell(&self, identity: &ClassifierIdentity) -> Cell {
		lock(&self.cache)
			.entry(identity.clone())
			.or_insert_with(|| Arc::new(OnceCell::new()))
			.clone()
	}

	fn ensure_running(&self, identity: &ClassifierIdentity) -> Result<(), ObserverError> {
		if self.is_aborted() {
			return Err(ObserverError::cycle_aborted(
				format!("not resolving {} after an earlier failure", identity),
				None,
				None,
			));
		}
		Ok(())
	}

	/// Keeps the first failure of the cycle and returns what callers propagate.
	fn abort(&self, identity: &ClassifierIdentity, error: ObserverError) -> ObserverError {
		let mut failure = lock(&self.failure);
		if failure.is_some() {
			return error;
		}
		let message = format!("resolving {} failed: {}", identity, error);
		*failure = Some(error);
		ObserverError::cycle_aborted(message, None, None)
	}

	async fn resolve(
		&self,
		identity: &ClassifierIdentity,
		chain: &[ClassifierIdentity],
	) -> Result<ResolvedValue, ObserverError> {
		let cell = self.cell(identity);
		let value = cell
			.get_or_try_init(|| async {
				self.ensure_running(identity)?;
				if identity.is_base() {
					return self.invoke(identity, chain).await;
				}

				// One fetch per kind serves every option of that kind
				let base = identity.base();
				let base_cell = self.cell(&base);
				base_cell
					.get_or_try_init(|| async {
						self.ensure_running(&base)?;
						self.invoke(&base, chain).await
					})
					.await
					.cloned()
			})
			.await?;
		Ok(value.clone())
	}

	async fn invoke(
		&self,
		identity: &ClassifierIdentity,
		chain: &[ClassifierIdentity],
	) -> Result<ResolvedValue, ObserverError> {
		let Some(handler) = self.registry.get(identity.kind()) else {
			let error = ObserverError::assertion_violation(
				format!("no handler registered for {}", identity),
				None,
				None,
			);
			return Err(self.abort(identity, error));
		};

		let mut path = chain.to_vec();
		path.push(identity.clone());
		let resolver = Resolver {
			context: self,
			consumer: handler.name().to_string(),
			declared: handler.dependencies(),
			chain: path,
		};

		let result = {
			let _timer = self.start_timer(handler.name());
			match handler {
				Handler::Collector(collector) => collector.fetch(&resolver).await,
				Handler::Provider(provider) => provider.derive(&resolver).await,
			}
		};

		result.map_err(|error| self.abort(identity, error))
	}
}

/// Read access to the cycle's classifiers for one consumer.
pub struct Resolver<'a> {
	context: &'a EvaluationContext<'a>,
	consumer: String,
	declared: Vec<ClassifierIdentity>,
	chain: Vec<ClassifierIdentity>,
}

impl Resolver<'_> {
	/// Name of the collector, provider or filter this resolver serves
	pub fn consumer(&self) -> &str {
		&self.consumer
	}

	/// Identities currently being resolved on this path, outermost first
	pub fn chain(&self) -> &[ClassifierIdentity] {
		&self.chain
	}

	pub fn header(&self) -> &Arc<BlockHeaderData> {
		self.context.header()
	}

	pub fn subscribed(&self, kind: ClassifierKind) -> &[String] {
		self.context.subscribed(kind)
	}

	/// Records a sub-step, e.g. a single chain call, in the timing report.
	pub fn add_timing(&self, name: &str, elapsed: Duration) {
		self.context.add_timing(name, elapsed);
	}

	/// Resolves `identity`, at most once per cycle.
	///
	/// Only identities the consumer declared may be requested.
	pub async fn get(&self, identity: &ClassifierIdentity) -> Result<ResolvedValue, ObserverError> {
		if let Some(start) = self.chain.iter().position(|entry| entry == identity) {
			let mut chain = self.chain[start..].to_vec();
			chain.push(identity.clone());
			return Err(ObserverError::cyclic_dependency(chain, None));
		}

		if !self.declared.contains(identity) {
			return Err(ObserverError::assertion_violation(
				format!(
					"{} requested {} without declaring it",
					self.consumer, identity
				),
				None,
				None,
			));
		}

		self.context.resolve(identity, &self.chain).await
	}

	/// Resolves `identity` and extracts its typed payload.
	pub async fn get_as<T: FromResolved>(
		&self,
		identity: &ClassifierIdentity,
	) -> Result<Arc<T>, ObserverError> {
		let value = self.get(identity).await?;
		T::from_resolved(&value).ok_or_else(|| {
			ObserverError::assertion_violation(
				format!(
					"{} resolved to {} which {} cannot read",
					identity,
					value.variant_name(),
					self.consumer
				),
				None,
				None,
			)
		})
	}
}
