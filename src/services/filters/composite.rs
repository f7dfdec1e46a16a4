//! Filters combining other filters.
//!
//! Every operand is evaluated every cycle so stateful operands never skip a
//! block. The dependencies of a composite are the union of its operands'.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;

use crate::{
	models::ClassifierIdentity,
	services::observer::{Filter, ObserverError, Resolver},
};

fn union_dependencies(operands: &[Arc<dyn Filter>]) -> Vec<ClassifierIdentity> {
	let mut dependencies: Vec<ClassifierIdentity> = Vec::new();
	for identity in operands.iter().flat_map(|operand| operand.dependencies()) {
		if !dependencies.contains(&identity) {
			dependencies.push(identity);
		}
	}
	dependencies
}

async fn evaluate_all(
	operands: &[Arc<dyn Filter>],
	resolver: &Resolver<'_>,
) -> Result<Vec<bool>, ObserverError> {
	try_join_all(operands.iter().map(|operand| operand.matches(resolver))).await
}

/// Matches when every operand matches.
pub struct LogicalAndFilter {
	operands: Vec<Arc<dyn Filter>>,
}

impl LogicalAndFilter {
	pub fn new(operands: Vec<Arc<dyn Filter>>) -> Self {
		Self { operands }
	}
}

#[async_trait]
impl Filter for LogicalAndFilter {
	fn name(&self) -> &str {
		"logical_and_filter"
	}

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		union_dependencies(&self.operands)
	}

	async fn matches(&self, resolver: &Resolver<'_>) -> Result<bool, ObserverError> {
		let verdicts = evaluate_all(&self.operands, resolver).await?;
		Ok(!verdicts.is_empty() && verdicts.into_iter().all(|matched| matched))
	}

	fn commit(&self) {
		self.operands.iter().for_each(|operand| operand.commit());
	}

	fn discard(&self) {
		self.operands.iter().for_each(|operand| operand.discard());
	}
}

/// Matches when at least one operand matches.
pub struct LogicalOrFilter {
	operands: Vec<Arc<dyn Filter>>,
}

impl LogicalOrFilter {
	pub fn new(operands: Vec<Arc<dyn Filter>>) -> Self {
		Self { operands }
	}
}

#[async_trait]
impl Filter for LogicalOrFilter {
	fn name(&self) -> &str {
		"logical_or_filter"
	}

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		union_dependencies(&self.operands)
	}

	async fn matches(&self, resolver: &Resolver<'_>) -> Result<bool, ObserverError> {
		let verdicts = evaluate_all(&self.operands, resolver).await?;
		Ok(verdicts.into_iter().any(|matched| matched))
	}

	fn commit(&self) {
		self.operands.iter().for_each(|operand| operand.commit());
	}

	fn discard(&self) {
		self.operands.iter().for_each(|operand| operand.discard());
	}
}
