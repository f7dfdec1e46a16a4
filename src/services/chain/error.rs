//! Chain client error types.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Errors raised while talking to the node
#[derive(ThisError, Debug)]
pub enum ChainError {
	/// The HTTP request failed or timed out
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// The node answered with a JSON-RPC error object
	#[error("RPC error: {0}")]
	RpcError(ErrorContext),

	/// The response does not have the expected shape
	#[error("Response parse error: {0}")]
	ResponseParseError(ErrorContext),

	/// The requested block does not exist yet
	#[error("Block not found: {0}")]
	BlockNotFound(ErrorContext),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ChainError {
	pub fn request_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn rpc_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RpcError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn response_parse_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParseError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn block_not_found(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BlockNotFound(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for ChainError {
	fn trace_id(&self) -> String {
		match self {
			Self::RequestError(ctx) => ctx.trace_id.clone(),
			Self::RpcError(ctx) => ctx.trace_id.clone(),
			Self::ResponseParseError(ctx) => ctx.trace_id.clone(),
			Self::BlockNotFound(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
