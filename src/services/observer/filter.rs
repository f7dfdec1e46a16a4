//! Filter interface and staged filter state.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
	models::ClassifierIdentity,
	services::observer::{ObserverError, Resolver},
};

/// Boolean predicate evaluated once per cycle.
///
/// State kept between cycles must be staged during [`Filter::matches`] and is
/// committed only when the whole cycle completed. The observer calls
/// [`Filter::discard`] for cycles that were aborted or cancelled.
#[async_trait]
pub trait Filter: Send + Sync {
	fn name(&self) -> &str;

	fn dependencies(&self) -> Vec<ClassifierIdentity>;

	async fn matches(&self, resolver: &Resolver<'_>) -> Result<bool, ObserverError>;

	/// Makes the state staged by the last `matches` call permanent
	fn commit(&self) {}

	/// Drops the state staged by the last `matches` call
	fn discard(&self) {}
}

#[derive(Debug)]
struct Slots<T> {
	committed: T,
	staged: Option<T>,
}

/// Committed value plus an optional pending replacement.
#[derive(Debug)]
pub struct StagedState<T> {
	slots: Mutex<Slots<T>>,
}

impl<T: Clone> StagedState<T> {
	pub fn new(initial: T) -> Self {
		Self {
			slots: Mutex::new(Slots {
				committed: initial,
				staged: None,
			}),
		}
	}

	fn lock(&self) -> MutexGuard<'_, Slots<T>> {
		self.slots.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Value as of the last completed cycle.
	pub fn committed(&self) -> T {
		self.lock().committed.clone()
	}

	pub fn stage(&self, value: T) {
		self.lock().staged = Some(value);
	}

	pub fn commit(&self) {
		let mut slots = self.lock();
		if let Some(staged) = slots.staged.take() {
			slots.committed = staged;
		}
	}

	pub fn discard(&self) {
		self.lock().staged = None;
	}
}

impl<T: Clone + Default> Default for StagedState<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}
