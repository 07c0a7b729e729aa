//! Repository over the expense flows of the finance document.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::{is_valid_amount, ExpenseFlow, ExpensePatch};
use crate::errors::{Mutation, StoreResult};
use crate::storage::{document::report_write_failure, FinanceStore};

use super::{remove_from, summary_service, update_in};

#[derive(Clone)]
pub struct ExpenseService {
    store: FinanceStore,
}

impl ExpenseService {
    pub fn new(store: FinanceStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<ExpenseFlow> {
        self.store.read().expense_flows
    }

    pub fn get(&self, id: &str) -> Option<ExpenseFlow> {
        self.list().into_iter().find(|flow| flow.id == id)
    }

    /// Active flows due within `window_days` of `today`, earliest first.
    pub fn upcoming(&self, today: NaiveDate, window_days: i64) -> Vec<ExpenseFlow> {
        let mut due: Vec<ExpenseFlow> = self
            .list()
            .into_iter()
            .filter(|flow| summary_service::is_due_within(flow, today, window_days))
            .collect();
        due.sort_by_key(|flow| flow.next_due_date);
        due
    }

    pub fn try_add(&self, flow: ExpenseFlow) -> StoreResult<Mutation> {
        if !is_valid_amount(flow.amount) {
            warn!(id = %flow.id, amount = flow.amount, "rejecting expense flow amount");
            return Ok(Mutation::Rejected);
        }
        let mut data = self.store.read();
        if data.expense_flows.iter().any(|existing| existing.id == flow.id) {
            warn!(id = %flow.id, "expense flow id already in use");
            return Ok(Mutation::Duplicate);
        }
        debug!(id = %flow.id, name = %flow.name, "adding expense flow");
        data.expense_flows.push(flow);
        self.store.try_write(&data)?;
        Ok(Mutation::Applied)
    }

    pub fn try_update(&self, id: &str, patch: ExpensePatch) -> StoreResult<Mutation> {
        if let Some(amount) = patch.amount.filter(|amount| !is_valid_amount(*amount)) {
            warn!(id, amount, "rejecting expense flow amount");
            return Ok(Mutation::Rejected);
        }
        let mut data = self.store.read();
        let now = self.store.clock().now();
        let outcome = update_in(&mut data.expense_flows, id, now, |flow| patch.apply(flow));
        if outcome.applied() {
            self.store.try_write(&data)?;
        }
        Ok(outcome)
    }

    pub fn try_delete(&self, id: &str) -> StoreResult<Mutation> {
        let mut data = self.store.read();
        let outcome = remove_from(&mut data.expense_flows, id);
        self.store.try_write(&data)?;
        Ok(outcome)
    }

    pub fn add(&self, flow: ExpenseFlow) {
        if let Err(err) = self.try_add(flow) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn update(&self, id: &str, patch: ExpensePatch) {
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
