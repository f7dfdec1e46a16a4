//! Block watcher error types.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Errors raised while waiting for blocks or driving cycles
#[derive(ThisError, Debug)]
pub enum BlockWatcherError {
	/// The head block could not be read
	#[error("Source error: {0}")]
	SourceError(ErrorContext),

	/// A cycle failed in a way that stops the watcher
	#[error("Cycle error: {0}")]
	CycleError(ErrorContext),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockWatcherError {
	pub fn source_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SourceError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn cycle_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::CycleError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for BlockWatcherError {
	fn trace_id(&self) -> String {
		match self {
			Self::SourceError(ctx) => ctx.trace_id.clone(),
			Self::CycleError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
