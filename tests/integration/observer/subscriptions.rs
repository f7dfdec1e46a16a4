use async_trait::async_trait;
use std::{
	sync::{Arc, Mutex},
	time::Duration,
};

use chain_observer::{
	models::{ClassifierIdentity, ClassifierKind},
	services::{
		filters::BalanceChangeFilter,
		observer::{Filter, ObserverError, Resolver},
	},
	utils::tests::builders::block::BlockHeaderBuilder,
};

use crate::integration::mocks::{custom, empty_accounts, observer_with, MockChainClient, ReadingProvider};

fn alice() -> ClassifierIdentity {
	ClassifierIdentity::account("alice")
}

fn bob() -> ClassifierIdentity {
	ClassifierIdentity::account("bob")
}

#[test]
fn test_filters_hold_subscriptions_while_registered() {
	let mut observer = observer_with(MockChainClient::new());
	let first = observer
		.register_filter(Arc::new(BalanceChangeFilter::new(["alice"], false)))
		.unwrap();
	let second = observer
		.register_filter(Arc::new(BalanceChangeFilter::new(["alice", "bob"], false)))
		.unwrap();

	assert_eq!(observer.subscription_count(&alice()), 2);
	assert_eq!(observer.subscription_count(&bob()), 1);

	observer.unregister_filter(first).unwrap();
	assert_eq!(observer.subscription_count(&alice()), 1);
	assert_eq!(observer.subscription_count(&bob()), 1);

	observer.unregister_filter(second).unwrap();
	assert_eq!(observer.subscription_count(&alice()), 0);
	assert_eq!(observer.subscription_count(&bob()), 0);
}

#[test]
fn test_subscribe_returns_counts() {
	let observer = observer_with(MockChainClient::new());

	assert_eq!(observer.subscribe(&ClassifierIdentity::account("carol")).unwrap(), 1);
	assert_eq!(observer.subscribe(&ClassifierIdentity::account("Carol")).unwrap(), 2);
	assert_eq!(observer.unsubscribe(&ClassifierIdentity::account("carol")).unwrap(), 1);
	assert_eq!(observer.unsubscribe(&ClassifierIdentity::account("carol")).unwrap(), 0);

	// Never below zero
	assert_eq!(observer.unsubscribe(&ClassifierIdentity::account("carol")).unwrap(), 0);
	assert_eq!(observer.subscribe(&ClassifierIdentity::account("carol")).unwrap(), 1);
}

#[test]
fn test_subscribing_a_provider_subscribes_its_dependencies() {
	let mut observer = observer_with(MockChainClient::new());
	observer
		.register_provider(Arc::new(ReadingProvider {
			kind: ClassifierKind::Custom("portfolio"),
			dependencies: vec![alice(), bob(), ClassifierIdentity::block_view()],
		}))
		.unwrap();
	observer.validate().unwrap();

	assert_eq!(observer.subscribe(&custom("portfolio")).unwrap(), 0);
	assert_eq!(observer.subscription_count(&alice()), 1);
	assert_eq!(observer.subscription_count(&bob()), 1);

	observer.subscribe(&custom("portfolio")).unwrap();
	observer.unsubscribe(&custom("portfolio")).unwrap();
	assert_eq!(observer.subscription_count(&alice()), 1);

	observer.unsubscribe(&custom("portfolio")).unwrap();
	assert_eq!(observer.subscription_count(&alice()), 0);
	assert_eq!(observer.subscription_count(&bob()), 0);
}

#[test]
fn test_subscribing_without_handler_fails() {
	let observer = observer_with(MockChainClient::new());
	let result = observer.subscribe(&custom("unknown"));

	assert!(matches!(result, Err(ObserverError::RegistrationError(_))));
}

#[tokio::test]
async fn test_subscription_changes_apply_to_the_next_fetch() {
	let requested = Arc::new(Mutex::new(Vec::<Vec<String>>::new()));
	let recorded = requested.clone();

	let mut client = MockChainClient::new();
	client
		.expect_find_accounts()
		.times(3)
		.returning(move |names| {
			recorded.lock().unwrap().push(names.to_vec());
			Ok(empty_accounts(names))
		});

	let mut observer = observer_with(client);
	observer
		.register_filter(Arc::new(BalanceChangeFilter::new(["alice"], false)))
		.unwrap();

	observer
		.run_cycle(&BlockHeaderBuilder::new(1).build())
		.await
		.unwrap();
	observer.subscribe(&bob()).unwrap();
	observer
		.run_cycle(&BlockHeaderBuilder::new(2).build())
		.await
		.unwrap();
	observer.unsubscribe(&bob()).unwrap();
	observer
		.run_cycle(&BlockHeaderBuilder::new(3).build())
		.await
		.unwrap();

	let requested = requested.lock().unwrap().clone();
	assert_eq!(
		requested,
		vec![
			vec!["alice".to_string()],
			vec!["alice".to_string(), "bob".to_string()],
			vec!["alice".to_string()],
		]
	);
}

/// Reads `alice` only after giving other tasks time to run.
struct SlowAccountFilter;

#[async_trait]
impl Filter for SlowAccountFilter {
	fn name(&self) -> &str {
		"slow_account_filter"
	}

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		vec![alice()]
	}

	async fn matches(&self, resolver: &Resolver<'_>) -> Result<bool, ObserverError> {
		tokio::time::sleep(Duration::from_millis(50)).await;
		resolver.get(&alice()).await?;
		Ok(true)
	}
}

#[tokio::test]
async fn test_subscribing_during_a_cycle_waits_for_the_next_one() {
	let requested = Arc::new(Mutex::new(Vec::<Vec<String>>::new()));
	let recorded = requested.clone();

	let mut client = MockChainClient::new();
	client
		.expect_find_accounts()
		.times(2)
		.returning(move |names| {
			recorded.lock().unwrap().push(names.to_vec());
			Ok(empty_accounts(names))
		});

	let mut observer = observer_with(client);
	observer.register_filter(Arc::new(SlowAccountFilter)).unwrap();

	let header = BlockHeaderBuilder::new(1).build();
	let (report, count) = tokio::join!(
		observer.run_cycle(&header),
		async {
			tokio::time::sleep(Duration::from_millis(10)).await;
			observer.subscribe(&bob())
		}
	);
	assert!(report.unwrap().is_completed());
	assert_eq!(count.unwrap(), 1);
	assert_eq!(
		requested.lock().unwrap().clone(),
		vec![vec!["alice".to_string()]]
	);

	observer
		.run_cycle(&BlockHeaderBuilder::new(2).build())
		.await
		.unwrap();
	assert_eq!(
		requested.lock().unwrap().last().cloned(),
		Some(vec!["alice".to_string(), "bob".to_string()])
	);
}
