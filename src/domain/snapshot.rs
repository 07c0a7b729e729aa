use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{new_entity_id, EntityId};

/// Point-in-time record of the aggregate finance metrics for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub id: EntityId,
    pub date: NaiveDate,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_worth: f64,
    pub net_cash_flow: f64,
    pub active_income_streams: usize,
    pub active_expense_flows: usize,
    pub total_accounts: usize,
    pub created_at: DateTime<Utc>,
}

/// Snapshot contents before an id and creation time are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotDraft {
    pub date: NaiveDate,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_worth: f64,
    pub net_cash_flow: f64,
    pub active_income_streams: usize,
    pub active_expense_flows: usize,
    pub total_accounts: usize,
}

impl SnapshotDraft {
    pub fn into_snapshot(self, created_at: DateTime<Utc>) -> FinancialSnapshot {
        FinancialSnapshot {
            id: new_entity_id(),
            date: self.date,
            total_income: self.total_income,
            total_expenses: self.total_expenses,
            net_worth: self.net_worth,
            net_cash_flow: self.net_cash_flow,
            active_income_streams: self.active_income_streams,
            active_expense_flows: self.active_expense_flows,
            total_accounts: self.total_accounts,
            created_at,
        }
    }
}
