use std::{
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
	time::Duration,
};

use chain_observer::{
	services::{
		blockwatcher::{BlockSource, BlockWatcherError, PollingBlockSource},
		chain::ChainError,
	},
	utils::tests::builders::block::head_properties,
};

use crate::integration::mocks::MockChainClient;

/// Client whose head block follows `heads`, one entry per poll.
fn client_with_heads(heads: Vec<Option<u64>>) -> MockChainClient {
	let calls = AtomicUsize::new(0);
	let expected_calls = heads.len();
	let mut client = MockChainClient::new();
	client
		.expect_get_dynamic_global_properties()
		.times(expected_calls)
		.returning(move || {
			match heads[calls.fetch_add(1, Ordering::SeqCst)] {
				Some(number) => Ok(head_properties(number)),
				None => Err(ChainError::request_error("node unreachable", None, None)),
			}
		});
	client
}

#[tokio::test]
async fn test_polling_reports_each_new_head_once() {
	let client = client_with_heads(vec![Some(10), Some(10), Some(11), Some(14)]);
	let mut source = PollingBlockSource::new(Arc::new(client), Duration::from_millis(1));

	let mut numbers = Vec::new();
	for _ in 0..3 {
		numbers.push(source.next_block().await.unwrap().number);
	}

	assert_eq!(numbers, vec![10, 11, 14]);
	assert_eq!(source.last_seen(), Some(14));
}

#[tokio::test]
async fn test_polling_starts_after_the_given_block() {
	let client = client_with_heads(vec![Some(5), Some(6)]);
	let mut source =
		PollingBlockSource::new(Arc::new(client), Duration::from_millis(1)).starting_after(5);

	assert_eq!(source.next_block().await.unwrap().number, 6);
}

#[tokio::test]
async fn test_poll_failure_is_a_source_error() {
	let client = client_with_heads(vec![None, Some(3)]);
	let mut source = PollingBlockSource::new(Arc::new(client), Duration::from_millis(1));

	assert!(matches!(
		source.next_block().await,
		Err(BlockWatcherError::SourceError(_))
	));
	assert_eq!(source.last_seen(), None);
	assert_eq!(source.next_block().await.unwrap().number, 3);
}
