//! Dated snapshots of the aggregate metrics, with bounded retention.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{FinanceData, FinancialSnapshot, SnapshotDraft};
use crate::errors::StoreResult;
use crate::storage::{document::report_write_failure, FinanceStore};

use super::summary_service::{monthly_expenses, monthly_income, net_worth};

/// Maximum number of snapshots kept in the history.
pub const MAX_SNAPSHOTS: usize = 24;

/// Builds the snapshot contents for `date` from the current entity state.
pub fn build_draft(data: &FinanceData, date: NaiveDate) -> SnapshotDraft {
    let total_income = monthly_income(&data.income_streams);
    let total_expenses = monthly_expenses(&data.expense_flows);
    SnapshotDraft {
        date,
        total_income,
        total_expenses,
        net_worth: net_worth(&data.accounts),
        net_cash_flow: total_income - total_expenses,
        active_income_streams: data.income_streams.iter().filter(|s| s.is_active()).count(),
        active_expense_flows: data.expense_flows.iter().filter(|f| f.is_active()).count(),
        total_accounts: data.accounts.iter().filter(|a| a.is_active()).count(),
    }
}

/// Places `snapshot` into `history`, replacing any entry with the same date,
/// then keeps the newest [`MAX_SNAPSHOTS`] dates in descending order.
pub fn insert_snapshot(history: &mut Vec<FinancialSnapshot>, snapshot: FinancialSnapshot) {
    match history.iter_mut().find(|existing| existing.date == snapshot.date) {
        Some(existing) => *existing = snapshot,
        None => history.push(snapshot),
    }
    history.sort_by(|a, b| b.date.cmp(&a.date));
    if history.len() > MAX_SNAPSHOTS {
        debug!(evicted = history.len() - MAX_SNAPSHOTS, "trimming snapshot history");
        history.truncate(MAX_SNAPSHOTS);
    }
}

#[derive(Clone)]
pub struct SnapshotService {
    store: FinanceStore,
}

impl SnapshotService {
    pub fn new(store: FinanceStore) -> Self {
        Self { store }
    }

    /// Stored snapshots, newest date first.
    pub fn list_snapshots(&self) -> Vec<FinancialSnapshot> {
        self.store.read().historical_data
    }

    pub fn latest(&self) -> Option<FinancialSnapshot> {
        self.list_snapshots().into_iter().next()
    }

    pub fn try_save_snapshot(&self, draft: SnapshotDraft) -> StoreResult<FinancialSnapshot> {
        let mut data = self.store.read();
        let snapshot = draft.into_snapshot(self.store.clock().now());
        insert_snapshot(&mut data.historical_data, snapshot.clone());
        self.store.try_write(&data)?;
        Ok(snapshot)
    }

    pub fn save_snapshot(&self, draft: SnapshotDraft) {
        if let Err(err) = self.try_save_snapshot(draft) {
            report_write_failure(self.store.key(), err);
        }
    }

    /// Captures the current aggregates under `today`, stamped at `now`.
    pub fn try_compute_and_save_at(
        &self,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> StoreResult<FinancialSnapshot> {
        let mut data = self.store.read();
        let snapshot = build_draft(&data, today).into_snapshot(now);
        insert_snapshot(&mut data.historical_data, snapshot.clone());
        self.store.try_write(&data)?;
        info!(
            date = %snapshot.date,
            net_worth = snapshot.net_worth,
            net_cash_flow = snapshot.net_cash_flow,
            "financial snapshot saved"
        );
        Ok(snapshot)
    }

    pub fn compute_and_save_snapshot_at(&self, now: DateTime<Utc>, today: NaiveDate) {
        if let Err(err) = self.try_compute_and_save_at(now, today) {
            report_write_failure(self.store.key(), err);
        }
    }

    /// Captures the current aggregates under the clock's local calendar date.
    pub fn compute_and_save_snapshot(&self) {
        let clock = self.store.clock();
        self.compute_and_save_snapshot_at(clock.now(), clock.today());
    }
}

/// Granularity used when browsing the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodMode {
    Monthly,
    Yearly,
}

impl PeriodMode {
    /// `YYYY-MM` for monthly periods, `YYYY` for yearly ones.
    pub fn key(self, date: NaiveDate) -> String {
        match self {
            PeriodMode::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
            PeriodMode::Yearly => format!("{:04}", date.year()),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" | "m" => Some(PeriodMode::Monthly),
            "yearly" | "year" | "y" => Some(PeriodMode::Yearly),
            _ => None,
        }
    }
}

/// Latest snapshot of each period, newest period first.
pub fn group_by_period(
    snapshots: &[FinancialSnapshot],
    mode: PeriodMode,
) -> Vec<(String, FinancialSnapshot)> {
    let mut periods: BTreeMap<String, &FinancialSnapshot> = BTreeMap::new();
    for snapshot in snapshots {
        let entry = periods.entry(mode.key(snapshot.date)).or_insert(snapshot);
        if snapshot.date > entry.date {
            *entry = snapshot;
        }
    }
    periods
        .into_iter()
        .rev()
        .map(|(key, snapshot)| (key, snapshot.clone()))
        .collect()
}

/// Difference between one metric in two periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodChange {
    pub amount: f64,
    pub percentage: f64,
}

impl PeriodChange {
    /// With no previous value the whole current value counts as change, at 0%.
    pub fn between(current: f64, previous: f64) -> Self {
        if previous == 0.0 {
            return Self {
                amount: current,
                percentage: 0.0,
            };
        }
        let amount = current - previous;
        Self {
            amount,
            percentage: amount / previous.abs() * 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub period: String,
    pub previous_period: String,
    pub income: PeriodChange,
    pub expenses: PeriodChange,
    pub net_worth: PeriodChange,
    pub cash_flow: PeriodChange,
}

impl PeriodComparison {
    fn new(
        (period, current): &(String, FinancialSnapshot),
        (previous_period, previous): &(String, FinancialSnapshot),
    ) -> Self {
        Self {
            period: period.clone(),
            previous_period: previous_period.clone(),
            income: PeriodChange::between(current.total_income, previous.total_income),
            expenses: PeriodChange::between(current.total_expenses, previous.total_expenses),
            net_worth: PeriodChange::between(current.net_worth, previous.net_worth),
            cash_flow: PeriodChange::between(current.net_cash_flow, previous.net_cash_flow),
        }
    }
}

/// Compares `period` against the period right before it, if both exist.
pub fn compare_period(
    snapshots: &[FinancialSnapshot],
    mode: PeriodMode,
    period: &str,
) -> Option<PeriodComparison> {
    let periods = group_by_period(snapshots, mode);
    let index = periods.iter().position(|(key, _)| key == period)?;
    let previous = periods.get(index + 1)?;
    Some(PeriodComparison::new(&periods[index], previous))
}

/// Compares the newest period against the one before it.
pub fn compare_latest(snapshots: &[FinancialSnapshot], mode: PeriodMode) -> Option<PeriodComparison> {
    let periods = group_by_period(snapshots, mode);
    match periods.as_slice() {
        [current, previous, ..] => Some(PeriodComparison::new(current, previous)),
        _ => None,
    }
}
