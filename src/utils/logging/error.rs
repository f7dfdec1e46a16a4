//! Error context shared by every service error type.
//!
//! [`ErrorContext`] wraps a message with an optional source error, key-value
//! metadata, a creation timestamp and a trace id. Service errors embed it in
//! their variants so that a failure can be followed across log lines.

use chrono::Utc;
use std::{collections::HashMap, fmt};
use uuid::Uuid;

/// Boxed error type accepted as the source of an [`ErrorContext`].
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message, source and metadata of a service error.
#[derive(Debug)]
pub struct ErrorContext {
	/// The error message
	pub message: String,
	/// The error that caused this one
	pub source: Option<BoxedSource>,
	/// Additional key-value context
	pub metadata: Option<HashMap<String, String>>,
	/// Creation time in RFC 3339 format
	pub timestamp: String,
	/// Trace id, inherited from the source when it carries one
	pub trace_id: String,
}

impl ErrorContext {
	/// Creates a new error context.
	///
	/// The trace id is taken from the source chain when one of the sources is
	/// itself traceable, otherwise a fresh UUID v4 is generated.
	pub fn new(
		message: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let trace_id = source
			.as_deref()
			.map(TraceableError::trace_id)
			.unwrap_or_else(|| Uuid::new_v4().to_string());

		Self {
			message: message.into(),
			source,
			metadata,
			timestamp: Utc::now().to_rfc3339(),
			trace_id,
		}
	}

	/// Creates a new error context and emits it as an error event.
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = Self::new(message, source, metadata);
		log_error(&context);
		context
	}

	/// Adds a single metadata entry.
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata
			.get_or_insert_with(HashMap::new)
			.insert(key.into(), value.into());
		self
	}

	/// Formats the message followed by `[key=value, ...]` with keys sorted.
	pub fn format_with_metadata(&self) -> String {
		let Some(metadata) = self.metadata.as_ref().filter(|m| !m.is_empty()) else {
			return self.message.clone();
		};

		let mut keys: Vec<_> = metadata.keys().collect();
		keys.sort();
		let parts: Vec<String> = keys
			.into_iter()
			.map(|key| format!("{}={}", key, metadata[key]))
			.collect();

		format!("{} [{}]", self.message, parts.join(", "))
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_with_metadata())
	}
}

impl std::error::Error for ErrorContext {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_ref()
			.map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
	}
}

/// Errors that expose a trace id.
pub trait TraceableError: std::error::Error + Send + Sync {
	/// Returns the trace id for this error
	fn trace_id(&self) -> String;
}

impl TraceableError for dyn std::error::Error + Send + Sync + 'static {
	fn trace_id(&self) -> String {
		const MAX_DEPTH: usize = 3;

		let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
		let mut depth = 0;
		while let Some(err) = current {
			if let Some(id) = try_extract_trace_id(err) {
				return id;
			}
			depth += 1;
			if depth > MAX_DEPTH {
				break;
			}
			current = err.source();
		}

		Uuid::new_v4().to_string()
	}
}

/// Extracts a trace id from the error types of this crate.
fn try_extract_trace_id(err: &(dyn std::error::Error + 'static)) -> Option<String> {
	use crate::{
		models::ConfigError,
		services::{blockwatcher::BlockWatcherError, chain::ChainError, observer::ObserverError},
	};

	if let Some(ctx) = err.downcast_ref::<ErrorContext>() {
		return Some(ctx.trace_id.clone());
	}
	if let Some(e) = err.downcast_ref::<ObserverError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = err.downcast_ref::<ChainError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = err.downcast_ref::<BlockWatcherError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = err.downcast_ref::<ConfigError>() {
		return Some(e.trace_id());
	}
	None
}

fn log_error(context: &ErrorContext) {
	match &context.source {
		Some(source) => tracing::error!(
			trace_id = %context.trace_id,
			timestamp = %context.timestamp,
			source = %source,
			"{}",
			context.format_with_metadata()
		),
		None => tracing::error!(
			trace_id = %context.trace_id,
			timestamp = %context.timestamp,
			"{}",
			context.format_with_metadata()
		),
	}
}
