//! Chain client interface consumed by collectors.

use async_trait::async_trait;

use crate::{
	models::{ApiAccount, ApiBlock, ApiDynamicGlobalProperties},
	services::chain::ChainError,
};

/// Read operations the observer needs from a node.
///
/// Implementations issue each call once; retrying is left to the caller.
#[async_trait]
pub trait ChainClient: Send + Sync {
	/// Looks up accounts by name. Unknown names are absent from the result.
	///
	/// Callers keep `names` within the node's batch limit.
	async fn find_accounts(&self, names: &[String]) -> Result<Vec<ApiAccount>, ChainError>;

	/// Returns the block with the given number, `None` when it does not exist yet
	async fn get_block(&self, number: u64) -> Result<Option<ApiBlock>, ChainError>;

	/// Returns the chain's current dynamic global properties
	async fn get_dynamic_global_properties(
		&self,
	) -> Result<ApiDynamicGlobalProperties, ChainError>;
}
