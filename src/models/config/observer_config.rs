//! Observer configuration file.
//!
//! ```json
//! {
//!   "node_url": "https://api.hive.blog",
//!   "poll_interval_ms": 3000,
//!   "filters": [
//!     { "type": "new_block" },
//!     { "type": "balance_change", "accounts": ["alice", "bob"] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path, time::Duration};
use url::Url;

use crate::models::config::error::ConfigError;

const MIN_POLL_INTERVAL_MS: u64 = 100;
const TRANSACTION_ID_LENGTH: usize = 40;

fn default_poll_interval_ms() -> u64 {
	3_000
}

fn default_request_timeout_ms() -> u64 {
	10_000
}

/// Top level configuration of the observer binary.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ObserverConfig {
	/// JSON-RPC endpoint of the node
	pub node_url: String,

	/// How often the head block is polled
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,

	/// Timeout of a single JSON-RPC request
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,

	/// Filters evaluated on every block
	pub filters: Vec<FilterConfig>,
}

/// Declarative description of one filter.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
	/// Matches whenever the head block changed
	NewBlock,
	/// Matches the block with the given number
	BlockNumber { number: u64 },
	/// Matches when a watched account's balance changed
	BalanceChange {
		accounts: Vec<String>,
		#[serde(default)]
		include_internal_transfers: bool,
	},
	/// Matches when one of the transactions is included in the block
	TransactionIds { ids: Vec<String> },
	/// Matches when every operand matches
	All { filters: Vec<FilterConfig> },
	/// Matches when any operand matches
	Any { filters: Vec<FilterConfig> },
}

impl ObserverConfig {
	/// Reads, parses and validates a configuration file.
	pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let path_metadata = || {
			Some(HashMap::from([(
				"path".to_string(),
				path.display().to_string(),
			)]))
		};

		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open observer config file: {}", e),
				Some(Box::new(e)),
				path_metadata(),
			)
		})?;
		let config: ObserverConfig = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse observer config: {}", e),
				Some(Box::new(e)),
				path_metadata(),
			)
		})?;

		config.validate()?;
		config.validate_protocol();

		Ok(config)
	}

	/// Checks every value that deserialization alone cannot enforce.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let url = Url::parse(&self.node_url).map_err(|e| {
			ConfigError::validation_error(
				format!("invalid node URL: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"node_url".to_string(),
					self.node_url.clone(),
				)])),
			)
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::validation_error(
				"Node URL must start with http:// or https://",
				None,
				None,
			));
		}

		if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
			return Err(ConfigError::validation_error(
				format!("Poll interval must be at least {}ms", MIN_POLL_INTERVAL_MS),
				None,
				Some(HashMap::from([(
					"poll_interval_ms".to_string(),
					self.poll_interval_ms.to_string(),
				)])),
			));
		}

		if self.request_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"Request timeout must be positive",
				None,
				None,
			));
		}

		if self.filters.is_empty() {
			return Err(ConfigError::validation_error(
				"At least one filter is required",
				None,
				None,
			));
		}

		self.filters.iter().try_for_each(FilterConfig::validate)
	}

	/// Warns about settings that work but are unsafe.
	pub fn validate_protocol(&self) {
		if self.node_url.starts_with("http://") {
			tracing::warn!("Node URL uses an insecure protocol: {}", self.node_url);
		}
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}
}

impl FilterConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		match self {
			Self::NewBlock | Self::BlockNumber { .. } => Ok(()),
			Self::BalanceChange { accounts, .. } => {
				if accounts.is_empty() {
					return Err(ConfigError::validation_error(
						"balance_change filter requires at least one account",
						None,
						None,
					));
				}
				accounts.iter().try_for_each(|account| validate_account_name(account))
			}
			Self::TransactionIds { ids } => {
				if ids.is_empty() {
					return Err(ConfigError::validation_error(
						"transaction_ids filter requires at least one id",
						None,
						None,
					));
				}
				ids.iter().try_for_each(|id| validate_transaction_id(id))
			}
			Self::All { filters } | Self::Any { filters } => {
				if filters.is_empty() {
					return Err(ConfigError::validation_error(
						"Composite filter requires at least one operand",
						None,
						None,
					));
				}
				filters.iter().try_for_each(FilterConfig::validate)
			}
		}
	}
}

/// Account names are 3 to 16 characters of lowercase letters, digits, `-` and `.`.
fn validate_account_name(name: &str) -> Result<(), ConfigError> {
	let valid_length = (3..=16).contains(&name.len());
	let valid_chars = name
		.chars()
		.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');

	if valid_length && valid_chars {
		Ok(())
	} else {
		Err(ConfigError::validation_error(
			"Invalid account name",
			None,
			Some(HashMap::from([("account".to_string(), name.to_string())])),
		))
	}
}

fn validate_transaction_id(id: &str) -> Result<(), ConfigError> {
	if id.len() == TRANSACTION_ID_LENGTH && id.chars().all(|c| c.is_ascii_hexdigit()) {
		Ok(())
	} else {
		Err(ConfigError::validation_error(
			"Transaction id must be 40 hexadecimal characters",
			None,
			Some(HashMap::from([("id".to_string(), id.to_string())])),
		))
	}
}
