//! JSON-RPC 2.0 client over HTTP.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use std::{
	collections::HashMap,
	sync::atomic::{AtomicU64, Ordering},
	time::Duration,
};
use tracing::instrument;
use url::Url;

use crate::{
	models::{
		ApiAccount, ApiBlock, ApiDynamicGlobalProperties, ApiFindAccountsResponse,
		ApiGetBlockResponse,
	},
	services::chain::{ChainClient, ChainError},
};

const METHOD_FIND_ACCOUNTS: &str = "database_api.find_accounts";
const METHOD_GET_BLOCK: &str = "block_api.get_block";
const METHOD_GET_DYNAMIC_GLOBAL_PROPERTIES: &str = "database_api.get_dynamic_global_properties";

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
	code: i64,
	message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
	#[serde(default)]
	result: Option<Value>,
	#[serde(default)]
	error: Option<RpcErrorObject>,
}

/// Client for a node's JSON-RPC endpoint.
#[derive(Debug)]
pub struct HttpChainClient {
	client: reqwest::Client,
	url: Url,
	next_id: AtomicU64,
}

impl HttpChainClient {
	pub fn new(node_url: &str, timeout: Duration) -> Result<Self, ChainError> {
		let url = Url::parse(node_url).map_err(|e| {
			ChainError::request_error(
				format!("invalid node URL: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), node_url.to_string())])),
			)
		})?;
		let client = reqwest::ClientBuilder::new()
			.timeout(timeout)
			.build()
			.map_err(|e| {
				ChainError::request_error("failed to create HTTP client", Some(Box::new(e)), None)
			})?;

		Ok(Self {
			client,
			url,
			next_id: AtomicU64::new(1),
		})
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Sends one request and decodes its `result`.
	async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R, ChainError> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let metadata = || {
			Some(HashMap::from([
				("method".to_string(), method.to_string()),
				("id".to_string(), id.to_string()),
			]))
		};

		let request = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});

		let response = self
			.client
			.post(self.url.clone())
			.json(&request)
			.send()
			.await
			.map_err(|e| {
				ChainError::request_error(
					format!("request to {} failed", method),
					Some(Box::new(e)),
					metadata(),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(ChainError::request_error(
				format!("node answered with HTTP {}", status),
				None,
				metadata(),
			));
		}

		let body: RpcResponse = response.json().await.map_err(|e| {
			ChainError::response_parse_error(
				format!("invalid JSON-RPC response for {}", method),
				Some(Box::new(e)),
				metadata(),
			)
		})?;

		if let Some(error) = body.error {
			return Err(ChainError::rpc_error(
				format!("{} (code {})", error.message, error.code),
				None,
				metadata(),
			));
		}

		let result = body.result.ok_or_else(|| {
			ChainError::response_parse_error("response has neither result nor error", None, metadata())
		})?;

		serde_json::from_value(result).map_err(|e| {
			ChainError::response_parse_error(
				format!("unexpected result shape for {}", method),
				Some(Box::new(e)),
				metadata(),
			)
		})
	}
}

#[async_trait]
impl ChainClient for HttpChainClient {
	#[instrument(skip_all, fields(count = names.len()))]
	async fn find_accounts(&self, names: &[String]) -> Result<Vec<ApiAccount>, ChainError> {
		let response: ApiFindAccountsResponse = self
			.call(METHOD_FIND_ACCOUNTS, json!({ "accounts": names }))
			.await?;
		Ok(response.accounts)
	}

	#[instrument(skip(self))]
	async fn get_block(&self, number: u64) -> Result<Option<ApiBlock>, ChainError> {
		let response: ApiGetBlockResponse = self
			.call(METHOD_GET_BLOCK, json!({ "block_num": number }))
			.await?;
		Ok(response.block)
	}

	#[instrument(skip_all)]
	async fn get_dynamic_global_properties(
		&self,
	) -> Result<ApiDynamicGlobalProperties, ChainError> {
		self.call(METHOD_GET_DYNAMIC_GLOBAL_PROPERTIES, json!({}))
			.await
	}
}
