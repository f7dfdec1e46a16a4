//! Classifier kind to handler mapping and dependency graph validation.

use std::{
	collections::{HashMap, HashSet},
	fmt,
	sync::Arc,
};

use crate::{
	models::{ClassifierIdentity, ClassifierKind},
	services::observer::{Collector, ObserverError, Provider, SubscriptionTable},
};

/// Collector or provider bound to a classifier kind.
#[derive(Clone)]
pub enum Handler {
	Collector(Arc<dyn Collector>),
	Provider(Arc<dyn Provider>),
}

impl Handler {
	pub fn name(&self) -> &str {
		match self {
			Self::Collector(collector) => collector.name(),
			Self::Provider(provider) => provider.name(),
		}
	}

	pub fn kind(&self) -> ClassifierKind {
		match self {
			Self::Collector(collector) => collector.kind(),
			Self::Provider(provider) => provider.kind(),
		}
	}

	pub fn dependencies(&self) -> Vec<ClassifierIdentity> {
		match self {
			Self::Collector(collector) => collector.dependencies(),
			Self::Provider(provider) => provider.dependencies(),
		}
	}

	pub fn subscriptions(&self) -> Option<&SubscriptionTable> {
		match self {
			Self::Collector(collector) => collector.subscriptions(),
			Self::Provider(_) => None,
		}
	}
}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Collector(_) => write!(f, "Collector({})", self.name()),
			Self::Provider(_) => write!(f, "Provider({})", self.name()),
		}
	}
}

impl From<Arc<dyn Collector>> for Handler {
	fn from(collector: Arc<dyn Collector>) -> Self {
		Self::Collector(collector)
	}
}

impl From<Arc<dyn Provider>> for Handler {
	fn from(provider: Arc<dyn Provider>) -> Self {
		Self::Provider(provider)
	}
}

/// One handler per classifier kind.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
	handlers: HashMap<ClassifierKind, Handler>,
}

impl HandlerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` for its kind. A second handler for the same kind is rejected.
	pub fn register(&mut self, handler: Handler) -> Result<(), ObserverError> {
		let kind = handler.kind();
		if let Some(existing) = self.handlers.get(&kind) {
			return Err(ObserverError::registration_error(
				format!("a handler is already registered for {}", kind),
				None,
				Some(HashMap::from([
					("existing".to_string(), existing.name().to_string()),
					("rejected".to_string(), handler.name().to_string()),
				])),
			));
		}
		self.handlers.insert(kind, handler);
		Ok(())
	}

	pub fn get(&self, kind: ClassifierKind) -> Option<&Handler> {
		self.handlers.get(&kind)
	}

	pub fn contains(&self, kind: ClassifierKind) -> bool {
		self.handlers.contains_key(&kind)
	}

	pub fn handlers(&self) -> impl Iterator<Item = &Handler> {
		self.handlers.values()
	}

	/// Checks that `identity` and everything it depends on has a handler and
	/// that no dependency cycle exists.
	pub fn validate(&self, identity: &ClassifierIdentity) -> Result<(), ObserverError> {
		self.walk(identity, &mut Vec::new(), &mut HashSet::new(), &mut Vec::new())
	}

	/// Validates the dependencies of every registered handler.
	pub fn validate_all(&self) -> Result<(), ObserverError> {
		let mut done = HashSet::new();
		let mut order = Vec::new();
		let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
		kinds.sort();
		for kind in kinds {
			self.walk(
				&ClassifierIdentity::new(kind),
				&mut Vec::new(),
				&mut done,
				&mut order,
			)?;
		}
		Ok(())
	}

	/// `identity` followed by its transitive dependencies, each listed once.
	pub fn closure(
		&self,
		identity: &ClassifierIdentity,
	) -> Result<Vec<ClassifierIdentity>, ObserverError> {
		let mut order = Vec::new();
		self.walk(identity, &mut Vec::new(), &mut HashSet::new(), &mut order)?;
		// Post-order puts the requested identity last
		order.reverse();
		Ok(order)
	}

	fn walk(
		&self,
		identity: &ClassifierIdentity,
		path: &mut Vec<ClassifierIdentity>,
		done: &mut HashSet<ClassifierIdentity>,
		order: &mut Vec<ClassifierIdentity>,
	) -> Result<(), ObserverError> {
		if done.contains(identity) {
			return Ok(());
		}
		if let Some(start) = path.iter().position(|entry| entry == identity) {
			let mut chain = path[start..].to_vec();
			chain.push(identity.clone());
			return Err(ObserverError::cyclic_dependency(chain, None));
		}
		if !identity.is_base() && !identity.kind().is_parameterized() {
			return Err(ObserverError::registration_error(
				format!("{} does not accept options", identity.kind()),
				None,
				Some(HashMap::from([(
					"identity".to_string(),
					identity.to_string(),
				)])),
			));
		}

		let handler = self.get(identity.kind()).ok_or_else(|| {
			ObserverError::registration_error(
				format!("no handler registered for {}", identity),
				None,
				path.last().map(|parent| {
					HashMap::from([("required_by".to_string(), parent.to_string())])
				}),
			)
		})?;

		path.push(identity.clone());
		for dependency in handler.dependencies() {
			self.walk(&dependency, path, done, order)?;
		}
		path.pop();

		done.insert(identity.clone());
		order.push(identity.clone());
		Ok(())
	}
}
