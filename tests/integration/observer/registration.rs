use std::sync::Arc;

use chain_observer::{
	models::{ClassifierIdentity, ClassifierKind},
	services::{
		collectors::AccountCollector,
		filters::BlockChangedFilter,
		observer::{Handler, Observer, ObserverError},
		providers::BlockProvider,
	},
	utils::tests::builders::block::BlockHeaderBuilder,
};

use crate::integration::mocks::{custom, observer_with, MockChainClient, ReadingFilter, ReadingProvider};

fn cyclic_observer() -> Observer {
	let mut observer = Observer::new();
	observer
		.register_provider(Arc::new(ReadingProvider {
			kind: ClassifierKind::Custom("a"),
			dependencies: vec![custom("b")],
		}))
		.unwrap();
	observer
		.register_provider(Arc::new(ReadingProvider {
			kind: ClassifierKind::Custom("b"),
			dependencies: vec![custom("a")],
		}))
		.unwrap();
	observer
}

#[test]
fn test_validate_rejects_dependency_cycle() {
	let mut observer = cyclic_observer();
	match observer.validate() {
		Err(ObserverError::CyclicDependency { chain, .. }) => {
			assert_eq!(chain, vec![custom("a"), custom("b"), custom("a")]);
		}
		other => panic!("expected a cycle, got {:?}", other),
	}
}

#[test]
fn test_register_filter_rejects_cyclic_dependency() {
	let mut observer = cyclic_observer();
	let result = observer.register_filter(Arc::new(ReadingFilter::reading(vec![custom("b")])));

	assert!(matches!(
		result,
		Err(ObserverError::CyclicDependency { .. })
	));
	assert!(observer.filter_ids().is_empty());
}

#[tokio::test]
async fn test_unvalidated_cycle_fails_the_cycle() {
	let observer = cyclic_observer();
	let result = observer
		.run_cycle(&BlockHeaderBuilder::new(1).build())
		.await;

	assert!(matches!(
		result,
		Err(ObserverError::CyclicDependency { .. })
	));
}

#[test]
fn test_missing_handler_is_rejected() {
	let mut observer = Observer::new();
	observer
		.register_provider(Arc::new(ReadingProvider {
			kind: ClassifierKind::Custom("derived"),
			dependencies: vec![custom("missing")],
		}))
		.unwrap();

	match observer.validate() {
		Err(ObserverError::RegistrationError(ctx)) => {
			assert!(ctx.message.contains("missing"));
			assert_eq!(
				ctx.metadata
					.as_ref()
					.and_then(|metadata| metadata.get("required_by"))
					.map(String::as_str),
				Some("derived")
			);
		}
		other => panic!("expected a registration error, got {:?}", other),
	}

	let result = observer.register_filter(Arc::new(ReadingFilter::reading(vec![
		ClassifierIdentity::account("alice"),
	])));
	assert!(matches!(result, Err(ObserverError::RegistrationError(_))));
}

#[test]
fn test_duplicate_handler_is_rejected() {
	let mut observer = observer_with(MockChainClient::new());
	let result = observer.register_provider(Arc::new(BlockProvider::new()));

	assert!(matches!(result, Err(ObserverError::RegistrationError(_))));
	assert_eq!(
		observer
			.registry()
			.get(ClassifierKind::BlockView)
			.map(Handler::name),
		Some("block_provider")
	);
}

#[test]
fn test_handler_identity_must_match_kind() {
	let mut observer = Observer::new();

	let result = observer.register_handler(
		ClassifierIdentity::block(),
		Handler::Provider(Arc::new(BlockProvider::new())),
	);
	assert!(matches!(result, Err(ObserverError::RegistrationError(_))));

	let result = observer.register_handler(
		ClassifierIdentity::account("alice"),
		Handler::Collector(Arc::new(AccountCollector::new(Arc::new(
			MockChainClient::new(),
		)))),
	);
	assert!(matches!(result, Err(ObserverError::RegistrationError(_))));

	assert!(observer
		.register_handler(
			ClassifierIdentity::block_view(),
			Handler::Provider(Arc::new(BlockProvider::new())),
		)
		.is_ok());
}

#[test]
fn test_options_on_unparameterized_kind_are_rejected() {
	let mut observer = observer_with(MockChainClient::new());
	let result = observer.register_filter(Arc::new(ReadingFilter::reading(vec![
		ClassifierIdentity::with_options(ClassifierKind::Block, "42"),
	])));

	assert!(matches!(result, Err(ObserverError::RegistrationError(_))));
}

#[test]
fn test_unregister_unknown_filter() {
	let mut observer = observer_with(MockChainClient::new());
	let id = observer
		.register_filter(Arc::new(BlockChangedFilter::new()))
		.unwrap();

	let removed = observer.unregister_filter(id).unwrap();
	assert_eq!(removed.name(), "block_changed_filter");
	assert!(observer.filter(id).is_none());
	assert!(matches!(
		observer.unregister_filter(id),
		Err(ObserverError::RegistrationError(_))
	));
}
