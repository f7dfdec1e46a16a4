//! Provider interface.

use async_trait::async_trait;

use crate::{
	models::{ClassifierIdentity, ClassifierKind, ResolvedValue},
	services::observer::{ObserverError, Resolver},
};

/// Pure combinator deriving a view from other classifiers.
///
/// `derive` performs no I/O and only reads the identities it declares in
/// [`Provider::dependencies`].
#[async_trait]
pub trait Provider: Send + Sync {
	fn name(&self) -> &str;

	fn kind(&self) -> ClassifierKind;

	fn dependencies(&self) -> Vec<ClassifierIdentity>;

	async fn derive(&self, resolver: &Resolver<'_>) -> Result<ResolvedValue, ObserverError>;
}
