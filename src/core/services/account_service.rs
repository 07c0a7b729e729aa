use tracing::{debug, warn};

use crate::domain::{is_valid_amount, Account, AccountPatch};
use crate::errors::{Mutation, StoreResult};
use crate::storage::{document::report_write_failure, FinanceStore};

use super::{remove_from, update_in};

#[derive(Clone)]
pub struct AccountService {
    store: FinanceStore,
}

impl AccountService {
    pub fn new(store: FinanceStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Account> {
        self.store.read().accounts
    }

    pub fn get(&self, id: &str) -> Option<Account> {
        self.list().into_iter().find(|account| account.id == id)
    }

    pub fn try_add(&self, account: Account) -> StoreResult<Mutation> {
        if !is_valid_amount(account.balance) {
            warn!(id = %account.id, balance = account.balance, "rejecting account balance");
            return Ok(Mutation::Rejected);
        }
        let mut data = self.store.read();
        if data.accounts.iter().any(|existing| existing.id == account.id) {
            warn!(id = %account.id, "account id already in use");
            return Ok(Mutation::Duplicate);
        }
        debug!(id = %account.id, name = %account.name, "adding account");
        data.accounts.push(account);
        self.store.try_write(&data)?;
        Ok(Mutation::Applied)
    }

    pub fn try_update(&self, id: &str, patch: AccountPatch) -> StoreResult<Mutation> {
        if let Some(balance) = patch.balance.filter(|balance| !is_valid_amount(*balance)) {
            warn!(id, balance, "rejecting account balance");
            return Ok(Mutation::Rejected);
        }
        let mut data = self.store.read();
        let now = self.store.clock().now();
        let outcome = update_in(&mut data.accounts, id, now, |account| patch.apply(account));
        if outcome.applied() {
            self.store.try_write(&data)?;
        }
        Ok(outcome)
    }

    pub fn try_delete(&self, id: &str) -> StoreResult<Mutation> {
        let mut data = self.store.read();
        let outcome = remove_from(&mut data.accounts, id);
        self.store.try_write(&data)?;
        Ok(outcome)
    }

    pub fn add(&self, account: Account) {
        if let Err(err) = self.try_add(account) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn update(&self, id: &str, patch: AccountPatch) {
        if let Err(err) = self.try_update(id, patch) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn delete(&self, id: &str) {
        if let Err(err) = self.try_delete(id) {
            report_write_failure(self.store.key(), err);
        }
    }
}
