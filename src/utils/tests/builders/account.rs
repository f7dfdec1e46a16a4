//! Test helper utilities for accounts
//!
//! - `ApiAccountBuilder`: Builder for `find_accounts` entries

use crate::models::{ApiAccount, ApiAsset, ApiManabar};

const HIVE_NAI: &str = "@@000000021";
const HBD_NAI: &str = "@@000000013";
const VESTS_NAI: &str = "@@000000037";

fn asset(amount: u64, precision: u8, nai: &str) -> ApiAsset {
	ApiAsset {
		amount: amount.to_string(),
		precision,
		nai: nai.to_string(),
	}
}

pub fn hive_asset(amount: u64) -> ApiAsset {
	asset(amount, 3, HIVE_NAI)
}

pub fn hbd_asset(amount: u64) -> ApiAsset {
	asset(amount, 3, HBD_NAI)
}

pub fn vests_asset(amount: u64) -> ApiAsset {
	asset(amount, 6, VESTS_NAI)
}

/// Builder for creating test `ApiAccount` instances
pub struct ApiAccountBuilder {
	account: ApiAccount,
}

impl ApiAccountBuilder {
	pub fn new(name: &str) -> Self {
		let manabar = ApiManabar {
			current_mana: 0,
			last_update_time: 1_700_000_000,
		};

		Self {
			account: ApiAccount {
				name: name.to_string(),
				voting_manabar: manabar.clone(),
				downvote_manabar: manabar,
				post_voting_power: vests_asset(0),
				posting_json_metadata: String::new(),
				json_metadata: String::new(),
				balance: hive_asset(0),
				savings_balance: hive_asset(0),
				reward_hive_balance: hive_asset(0),
				hbd_balance: hbd_asset(0),
				savings_hbd_balance: hbd_asset(0),
				reward_hbd_balance: hbd_asset(0),
				vesting_shares: vests_asset(0),
				delegated_vesting_shares: vests_asset(0),
				received_vesting_shares: vests_asset(0),
				reward_vesting_balance: vests_asset(0),
				vesting_withdraw_rate: vests_asset(0),
				recovery_account: "steem".to_string(),
				governance_vote_expiration_ts: Some("1969-12-31T23:59:59".to_string()),
			},
		}
	}

	pub fn hive(mut self, liquid: u64, unclaimed: u64, savings: u64) -> Self {
		self.account.balance = hive_asset(liquid);
		self.account.reward_hive_balance = hive_asset(unclaimed);
		self.account.savings_balance = hive_asset(savings);
		self
	}

	pub fn hbd(mut self, liquid: u64, unclaimed: u64, savings: u64) -> Self {
		self.account.hbd_balance = hbd_asset(liquid);
		self.account.reward_hbd_balance = hbd_asset(unclaimed);
		self.account.savings_hbd_balance = hbd_asset(savings);
		self
	}

	pub fn vests(mut self, liquid: u64, unclaimed: u64, delegated: u64, received: u64) -> Self {
		self.account.vesting_shares = vests_asset(liquid);
		self.account.reward_vesting_balance = vests_asset(unclaimed);
		self.account.delegated_vesting_shares = vests_asset(delegated);
		self.account.received_vesting_shares = vests_asset(received);
		self
	}

	pub fn voting_mana(mut self, current: u64, max: u64) -> Self {
		self.account.voting_manabar.current_mana = current;
		self.account.post_voting_power = vests_asset(max);
		self
	}

	pub fn json_metadata(mut self, metadata: &str) -> Self {
		self.account.json_metadata = metadata.to_string();
		self
	}

	pub fn governance_vote_expiration(mut self, timestamp: &str) -> Self {
		self.account.governance_vote_expiration_ts = Some(timestamp.to_string());
		self
	}

	pub fn build(self) -> ApiAccount {
		self.account
	}
}
