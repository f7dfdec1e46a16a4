//! Observer error types.

use crate::{
	models::{format_chain, ClassifierIdentity},
	utils::logging::error::{BoxedSource, ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Errors raised while registering handlers or resolving a cycle
#[derive(ThisError, Debug)]
pub enum ObserverError {
	/// Duplicate handler, missing handler or invalid identity at registration time
	#[error("Registration error: {0}")]
	RegistrationError(ErrorContext),

	/// A classifier transitively depends on itself
	#[error("Cyclic dependency: {context}")]
	CyclicDependency {
		/// Identities from the first occurrence to the repeat
		chain: Vec<ClassifierIdentity>,
		context: ErrorContext,
	},

	/// The chain client call failed or returned unusable data
	#[error("Fetch error: {0}")]
	FetchError(ErrorContext),

	/// A handler or filter observed something validation should have prevented
	#[error("Assertion violation: {0}")]
	AssertionViolation(ErrorContext),

	/// The cycle was already aborted by an earlier failure
	#[error("Cycle aborted: {0}")]
	CycleAborted(ErrorContext),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ObserverError {
	pub fn registration_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RegistrationError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn cyclic_dependency(
		chain: Vec<ClassifierIdentity>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let message = format!("dependency cycle {}", format_chain(&chain));
		Self::CyclicDependency {
			chain,
			context: ErrorContext::new_with_log(message, None, metadata),
		}
	}

	pub fn fetch_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::FetchError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn assertion_violation(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::AssertionViolation(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Not logged: the failure that aborted the cycle already was.
	pub fn cycle_aborted(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::CycleAborted(ErrorContext::new(msg, source, metadata))
	}

	/// Whether the error indicates a defect rather than a failed block.
	///
	/// Fatal errors stop the watcher; the others only abort the current cycle.
	pub fn is_fatal(&self) -> bool {
		matches!(
			self,
			Self::RegistrationError(_) | Self::AssertionViolation(_) | Self::Other(_)
		)
	}
}

impl TraceableError for ObserverError {
	fn trace_id(&self) -> String {
		match self {
			Self::RegistrationError(ctx) => ctx.trace_id.clone(),
			Self::CyclicDependency { context, .. } => context.trace_id.clone(),
			Self::FetchError(ctx) => ctx.trace_id.clone(),
			Self::AssertionViolation(ctx) => ctx.trace_id.clone(),
			Self::CycleAborted(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
