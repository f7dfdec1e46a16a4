use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::{
	models::{AccountBalance, AccountData, ClassifierIdentity},
	services::observer::{Filter, ObserverError, Resolver, StagedState},
	utils::normalize_account_name,
};

type Balances = BTreeMap<String, AccountBalance>;

/// Matches when the balance of a watched account changed since the last cycle.
///
/// The first evaluation records the balances and does not match. By default
/// only asset totals are compared, so moving funds between the parts of one
/// account (savings, rewards, delegations) is ignored unless
/// `include_internal_transfers` is set.
#[derive(Debug)]
pub struct BalanceChangeFilter {
	accounts: Vec<String>,
	include_internal_transfers: bool,
	previous: StagedState<Option<Balances>>,
}

impl BalanceChangeFilter {
	pub fn new<I, S>(accounts: I, include_internal_transfers: bool) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut accounts: Vec<String> = accounts
			.into_iter()
			.map(|name| normalize_account_name(name.as_ref()))
			.collect();
		accounts.sort();
		accounts.dedup();

		Self {
			accounts,
			include_internal_transfers,
			previous: StagedState::new(None),
		}
	}

	pub fn accounts(&self) -> &[String] {
		&self.accounts
	}

	fn changed(&self, before: &AccountBalance, after: &AccountBalance) -> bool {
		if self.include_internal_transfers {
			return before != after;
		}
		before.hive.total != after.hive.total
			|| before.hbd.total != after.hbd.total
			|| before.hp.total != after.hp.total
	}
}

#[async_trait]
impl Filter for BalanceChangeFilter {
	fn name(&self) -> &str {
		"balance_change_filter"
	}

	fn dependencies(&self) -> Vec<ClassifierIdentity> {
		self.accounts
			.iter()
			.map(|name| ClassifierIdentity::account(name))
			.collect()
	}

	async fn matches(&self, resolver: &Resolver<'_>) -> Result<bool, ObserverError> {
		let mut current = Balances::new();
		for name in &self.accounts {
			let data = resolver
				.get_as::<AccountData>(&ClassifierIdentity::account(name))
				.await?;
			// Accounts unknown to the chain are skipped
			if let Some(account) = data.accounts.get(name) {
				current.insert(name.clone(), account.balance.clone());
			}
		}

		let previous = self.previous.committed();
		self.previous.stage(Some(current.clone()));

		let Some(previous) = previous else {
			return Ok(false);
		};
		Ok(current.iter().any(|(name, balance)| {
			previous
				.get(name)
				.is_some_and(|before| self.changed(before, balance))
		}))
	}

	fn commit(&self) {
		self.previous.commit();
	}

	fn discard(&self) {
		self.previous.discard();
	}
}
