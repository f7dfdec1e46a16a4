//! Account snapshot and balance accounting.
//!
//! Balances are composed from small named parts instead of a type hierarchy:
//! every asset kind embeds a [`DetailedBalance`] and adds what is specific to it.
//!
//! Totals count what the account owns:
//! - HIVE and HBD: `liquid + unclaimed + savings`
//! - HP: `liquid + unclaimed` vesting shares. Outgoing delegations stay owned
//!   and incoming ones are not owned, so neither changes the total; they only
//!   change [`VestingBalance::effective`].

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{
	models::blockchain::api::{ApiAccount, ApiAsset, ApiManabar},
	utils::parse_chain_time,
};

/// Amount of one asset in base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
	pub amount: u64,
	pub precision: u8,
	pub nai: String,
}

impl Asset {
	pub fn from_api(asset: &ApiAsset) -> anyhow::Result<Self> {
		let amount = asset
			.amount
			.parse::<u64>()
			.with_context(|| format!("invalid asset amount '{}'", asset.amount))?;
		Ok(Self {
			amount,
			precision: asset.precision,
			nai: asset.nai.clone(),
		})
	}

	/// Zero amount of the same asset.
	pub fn zero_like(&self) -> Self {
		Self {
			amount: 0,
			..self.clone()
		}
	}

	pub fn checked_add(&self, other: &Asset) -> anyhow::Result<Self> {
		self.ensure_same_asset(other)?;
		let amount = self
			.amount
			.checked_add(other.amount)
			.ok_or_else(|| anyhow!("asset amount overflow for {}", self.nai))?;
		Ok(Self {
			amount,
			..self.clone()
		})
	}

	/// Subtraction clamped at zero.
	pub fn saturating_sub(&self, other: &Asset) -> anyhow::Result<Self> {
		self.ensure_same_asset(other)?;
		Ok(Self {
			amount: self.amount.saturating_sub(other.amount),
			..self.clone()
		})
	}

	fn ensure_same_asset(&self, other: &Asset) -> anyhow::Result<()> {
		if self.nai != other.nai || self.precision != other.precision {
			return Err(anyhow!(
				"cannot combine assets {} and {}",
				self.nai,
				other.nai
			));
		}
		Ok(())
	}
}

/// Parts shared by every asset kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedBalance {
	/// Spendable amount
	pub liquid: Asset,
	/// Rewards not yet claimed
	pub unclaimed: Asset,
}

/// HIVE or HBD balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidBalance {
	pub detailed: DetailedBalance,
	pub savings: Asset,
	pub total: Asset,
}

impl LiquidBalance {
	pub fn new(liquid: Asset, unclaimed: Asset, savings: Asset) -> anyhow::Result<Self> {
		let total = liquid.checked_add(&unclaimed)?.checked_add(&savings)?;
		Ok(Self {
			detailed: DetailedBalance { liquid, unclaimed },
			savings,
			total,
		})
	}
}

/// HP balance expressed in vesting shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingBalance {
	pub detailed: DetailedBalance,
	/// Shares delegated to other accounts
	pub delegated: Asset,
	/// Shares received from other accounts
	pub received: Asset,
	/// Weekly power down rate
	pub powering_down: Asset,
	pub total: Asset,
}

impl VestingBalance {
	pub fn new(
		liquid: Asset,
		unclaimed: Asset,
		delegated: Asset,
		received: Asset,
		powering_down: Asset,
	) -> anyhow::Result<Self> {
		let total = liquid.checked_add(&unclaimed)?;
		Ok(Self {
			detailed: DetailedBalance { liquid, unclaimed },
			delegated,
			received,
			powering_down,
			total,
		})
	}

	/// Shares backing the account's voting power.
	pub fn effective(&self) -> anyhow::Result<Asset> {
		self.detailed
			.liquid
			.saturating_sub(&self.delegated)?
			.checked_add(&self.received)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
	pub hbd: LiquidBalance,
	pub hive: LiquidBalance,
	pub hp: VestingBalance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manabar {
	pub current_mana: u64,
	pub last_update_time: DateTime<Utc>,
}

impl Manabar {
	fn from_api(manabar: &ApiManabar) -> anyhow::Result<Self> {
		let last_update_time = DateTime::from_timestamp(manabar.last_update_time, 0)
			.ok_or_else(|| anyhow!("invalid manabar time {}", manabar.last_update_time))?;
		Ok(Self {
			current_mana: manabar.current_mana,
			last_update_time,
		})
	}
}

/// Upvote manabar with its maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxManabar {
	pub manabar: Manabar,
	pub max_mana: u64,
}

impl MaxManabar {
	/// Current mana as a percentage of the maximum.
	pub fn percent(&self) -> f64 {
		if self.max_mana == 0 {
			return 0.0;
		}
		self.manabar.current_mana as f64 * 100.0 / self.max_mana as f64
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
	pub name: String,
	pub upvote_manabar: MaxManabar,
	pub downvote_manabar: Manabar,
	pub posting_json_metadata: Value,
	pub json_metadata: Value,
	pub balance: AccountBalance,
	pub recovery_account: String,
	pub governance_vote_expiration: Option<DateTime<Utc>>,
}

impl Account {
	/// Converts a `find_accounts` entry.
	///
	/// Amounts must be valid; metadata that is not valid JSON becomes `null`.
	pub fn from_api(account: &ApiAccount) -> anyhow::Result<Self> {
		let asset = |a: &ApiAsset| Asset::from_api(a);

		let balance = AccountBalance {
			hbd: LiquidBalance::new(
				asset(&account.hbd_balance)?,
				asset(&account.reward_hbd_balance)?,
				asset(&account.savings_hbd_balance)?,
			)?,
			hive: LiquidBalance::new(
				asset(&account.balance)?,
				asset(&account.reward_hive_balance)?,
				asset(&account.savings_balance)?,
			)?,
			hp: VestingBalance::new(
				asset(&account.vesting_shares)?,
				asset(&account.reward_vesting_balance)?,
				asset(&account.delegated_vesting_shares)?,
				asset(&account.received_vesting_shares)?,
				asset(&account.vesting_withdraw_rate)?,
			)?,
		};

		let max_mana = asset(&account.post_voting_power)?.amount;

		Ok(Self {
			name: account.name.clone(),
			upvote_manabar: MaxManabar {
				manabar: Manabar::from_api(&account.voting_manabar)?,
				max_mana,
			},
			downvote_manabar: Manabar::from_api(&account.downvote_manabar)?,
			posting_json_metadata: parse_metadata(&account.posting_json_metadata),
			json_metadata: parse_metadata(&account.json_metadata),
			balance,
			recovery_account: account.recovery_account.clone(),
			governance_vote_expiration: account
				.governance_vote_expiration_ts
				.as_deref()
				.and_then(parse_chain_time)
				.filter(|time| time.timestamp() > 0),
		})
	}
}

fn parse_metadata(raw: &str) -> Value {
	serde_json::from_str(raw).unwrap_or(Value::Null)
}

/// Accounts resolved in one cycle, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountData {
	pub accounts: BTreeMap<String, Account>,
}
