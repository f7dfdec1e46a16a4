use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

use chain_observer::{
	services::chain::{ChainClient, ChainError, HttpChainClient},
	utils::tests::builders::{
		account::ApiAccountBuilder,
		block::{head_properties, ApiBlockBuilder},
	},
};

fn client_for(server: &Server) -> HttpChainClient {
	HttpChainClient::new(&server.url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_find_accounts_success() {
	let mut server = Server::new_async().await;
	let accounts = vec![
		ApiAccountBuilder::new("alice").hive(1_000, 0, 0).build(),
		ApiAccountBuilder::new("bob").build(),
	];
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"jsonrpc": "2.0",
			"method": "database_api.find_accounts",
			"params": { "accounts": ["alice", "bob"] }
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(
			json!({ "jsonrpc": "2.0", "id": 1, "result": { "accounts": accounts } }).to_string(),
		)
		.create_async()
		.await;

	let client = client_for(&server);
	let result = client
		.find_accounts(&["alice".to_string(), "bob".to_string()])
		.await
		.unwrap();

	assert_eq!(result, accounts);
	mock.assert_async().await;
}

#[tokio::test]
async fn test_rpc_error_is_reported() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(
			json!({
				"jsonrpc": "2.0",
				"id": 1,
				"error": { "code": -32003, "message": "Assert Exception" }
			})
			.to_string(),
		)
		.create_async()
		.await;

	let client = client_for(&server);
	let result = client.find_accounts(&["alice".to_string()]).await;

	match result {
		Err(ChainError::RpcError(ctx)) => {
			assert_eq!(ctx.message, "Assert Exception (code -32003)");
		}
		other => panic!("expected an RPC error, got {:?}", other),
	}
	mock.assert_async().await;
}

#[tokio::test]
async fn test_http_failure_is_a_request_error() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(500)
		.create_async()
		.await;

	let client = client_for(&server);
	let result = client.get_dynamic_global_properties().await;

	assert!(matches!(result, Err(ChainError::RequestError(_))));
	mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_result_is_a_parse_error() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": { "head": "x" } }).to_string())
		.create_async()
		.await;

	let client = client_for(&server);
	let result = client.get_dynamic_global_properties().await;

	assert!(matches!(result, Err(ChainError::ResponseParseError(_))));
	mock.assert_async().await;
}

#[tokio::test]
async fn test_get_block() {
	let mut server = Server::new_async().await;
	let block = ApiBlockBuilder::new(5)
		.transfer("aa01", "alice", "bob", "1.000 HIVE")
		.build();
	let found = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "block_api.get_block",
			"params": { "block_num": 5 }
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": { "block": block } }).to_string())
		.create_async()
		.await;
	let missing = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "block_api.get_block",
			"params": { "block_num": 6 }
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({ "jsonrpc": "2.0", "id": 2, "result": {} }).to_string())
		.create_async()
		.await;

	let client = client_for(&server);
	assert_eq!(client.get_block(5).await.unwrap(), Some(block));
	assert_eq!(client.get_block(6).await.unwrap(), None);

	found.assert_async().await;
	missing.assert_async().await;
}

#[tokio::test]
async fn test_dynamic_global_properties() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "database_api.get_dynamic_global_properties",
			"params": {}
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(
			json!({
				"jsonrpc": "2.0",
				"id": 1,
				"result": {
					"head_block_number": 100,
					"head_block_id": "00000064",
					"time": "2024-05-01T12:00:03",
					"current_witness": "gtg",
					"last_irreversible_block_num": 80,
					"total_vesting_shares": { "amount": "1", "precision": 6, "nai": "@@000000037" }
				}
			})
			.to_string(),
		)
		.create_async()
		.await;

	let client = client_for(&server);
	let properties = client.get_dynamic_global_properties().await.unwrap();

	assert_eq!(properties.head_block_number, 100);
	assert_eq!(properties.last_irreversible_block_num, 80);
	assert_eq!(properties.current_witness, "gtg");
	mock.assert_async().await;
}

#[tokio::test]
async fn test_request_ids_increase() {
	let mut server = Server::new_async().await;
	let body = json!({ "jsonrpc": "2.0", "id": 0, "result": head_properties(1) }).to_string();
	let first = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "id": 1 })))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(body.clone())
		.create_async()
		.await;
	let second = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "id": 2 })))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(body)
		.create_async()
		.await;

	let client = client_for(&server);
	client.get_dynamic_global_properties().await.unwrap();
	client.get_dynamic_global_properties().await.unwrap();

	first.assert_async().await;
	second.assert_async().await;
}
