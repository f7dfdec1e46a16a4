use std::sync::Arc;

use chain_observer::{
	bootstrap::{build_filter, build_observer},
	models::{ClassifierIdentity, ClassifierKind, FilterConfig, ObserverConfig},
	utils::tests::builders::block::{ApiBlockBuilder, BlockHeaderBuilder},
};

use crate::integration::mocks::{empty_accounts, MockChainClient};

fn config(filters: Vec<FilterConfig>) -> ObserverConfig {
	ObserverConfig {
		node_url: "https://api.hive.blog".to_string(),
		poll_interval_ms: 3_000,
		request_timeout_ms: 10_000,
		filters,
	}
}

#[tokio::test]
async fn test_build_observer_with_every_filter_type() {
	let transaction_id = "0123456789abcdef0123456789abcdef01234567";
	let mut client = MockChainClient::new();
	client
		.expect_find_accounts()
		.times(1)
		.returning(|names| Ok(empty_accounts(names)));
	client.expect_get_block().times(1).returning(move |number| {
		Ok(Some(
			ApiBlockBuilder::new(number)
				.transfer(transaction_id, "alice", "bob", "1.000 HIVE")
				.build(),
		))
	});

	let config = config(vec![
		FilterConfig::NewBlock,
		FilterConfig::BlockNumber { number: 42 },
		FilterConfig::BalanceChange {
			accounts: vec!["alice".to_string(), "bob".to_string()],
			include_internal_transfers: false,
		},
		FilterConfig::TransactionIds {
			ids: vec![transaction_id.to_string()],
		},
		FilterConfig::All {
			filters: vec![FilterConfig::NewBlock, FilterConfig::BlockNumber { number: 42 }],
		},
		FilterConfig::Any {
			filters: vec![
				FilterConfig::BlockNumber { number: 1 },
				FilterConfig::BalanceChange {
					accounts: vec!["carol".to_string()],
					include_internal_transfers: true,
				},
			],
		},
	]);

	let (observer, ids) = build_observer(&config, Arc::new(client)).unwrap();
	assert_eq!(ids.len(), 6);
	assert_eq!(observer.filter_ids(), ids);
	assert_eq!(
		observer.subscription_count(&ClassifierIdentity::account("alice")),
		1
	);
	assert_eq!(
		observer.subscription_count(&ClassifierIdentity::account("carol")),
		1
	);

	let report = observer
		.run_cycle(&BlockHeaderBuilder::new(42).build())
		.await
		.unwrap();
	let verdicts: Vec<bool> = ids.iter().map(|id| report.verdict(*id).unwrap()).collect();
	assert_eq!(verdicts, vec![true, true, false, true, true, false]);
}

#[test]
fn test_build_filter_composite_dependencies() {
	let filter = build_filter(&FilterConfig::All {
		filters: vec![
			FilterConfig::NewBlock,
			FilterConfig::TransactionIds {
				ids: vec!["f".repeat(40)],
			},
			FilterConfig::BalanceChange {
				accounts: vec!["Alice".to_string()],
				include_internal_transfers: false,
			},
		],
	});

	assert_eq!(filter.name(), "logical_and_filter");
	assert_eq!(
		filter.dependencies(),
		vec![
			ClassifierIdentity::block_header(),
			ClassifierIdentity::block_view(),
			ClassifierIdentity::account("alice"),
		]
	);
}

#[test]
fn test_builtin_handlers_are_registered() {
	let (observer, ids) = build_observer(
		&config(vec![FilterConfig::NewBlock]),
		Arc::new(MockChainClient::new()),
	)
	.unwrap();

	assert_eq!(ids.len(), 1);
	for kind in [
		ClassifierKind::BlockHeader,
		ClassifierKind::Block,
		ClassifierKind::Account,
		ClassifierKind::DynamicGlobalProperties,
		ClassifierKind::BlockView,
	] {
		assert!(observer.registry().contains(kind), "missing handler for {}", kind);
	}
}
