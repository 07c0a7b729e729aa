//! Aggregate calculations over the finance document.
//!
//! Expense amounts are stored positive; they are subtracted only here, when
//! the net cash flow is derived.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Account, ExpenseFlow, FinanceData, IncomeStream};

/// Days ahead (inclusive) in which a due expense counts as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Sum of active income streams normalized to a monthly rate.
pub fn monthly_income(streams: &[IncomeStream]) -> f64 {
    streams
        .iter()
        .filter(|stream| stream.is_active())
        .map(IncomeStream::monthly_amount)
        .sum()
}

/// Sum of active expense flows normalized to a monthly rate.
pub fn monthly_expenses(flows: &[ExpenseFlow]) -> f64 {
    flows
        .iter()
        .filter(|flow| flow.is_active())
        .map(ExpenseFlow::monthly_amount)
        .sum()
}

pub fn net_worth(accounts: &[Account]) -> f64 {
    accounts
        .iter()
        .filter(|account| account.is_active())
        .map(|account| account.balance)
        .sum()
}

pub fn net_cash_flow(data: &FinanceData) -> f64 {
    monthly_income(&data.income_streams) - monthly_expenses(&data.expense_flows)
}

/// Whether an active flow falls due between `today` and `window_days` ahead.
///
/// Compared by calendar day: anything due earlier today still counts, anything
/// due before today does not. Callers pass `Clock::today` so the window and
/// snapshot dates share one notion of the current day.
pub fn is_due_within(flow: &ExpenseFlow, today: NaiveDate, window_days: i64) -> bool {
    if !flow.is_active() {
        return false;
    }
    let Some(due) = flow.next_due_date else {
        return false;
    };
    let days = (due.date_naive() - today).num_days();
    (0..=window_days).contains(&days)
}

pub fn upcoming_bills_count(flows: &[ExpenseFlow], today: NaiveDate) -> usize {
    upcoming_bills_within(flows, today, UPCOMING_WINDOW_DAYS)
}

pub fn upcoming_bills_within(flows: &[ExpenseFlow], today: NaiveDate, window_days: i64) -> usize {
    flows
        .iter()
        .filter(|flow| is_due_within(flow, today, window_days))
        .count()
}

/// Thresholds used when deriving the summary and its insights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryOptions {
    pub upcoming_window_days: i64,
    pub high_expense_ratio: f64,
    pub healthy_cash_flow: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            upcoming_window_days: UPCOMING_WINDOW_DAYS,
            high_expense_ratio: 0.8,
            healthy_cash_flow: 1000.0,
        }
    }
}

/// Current aggregate metrics derived from live entity state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub net_worth: f64,
    pub net_cash_flow: f64,
    pub upcoming_bills: usize,
    pub active_income_streams: usize,
    pub active_expense_flows: usize,
    pub active_accounts: usize,
}

impl FinanceSummary {
    pub fn compute(data: &FinanceData, today: NaiveDate) -> Self {
        Self::compute_with(data, today, &SummaryOptions::default())
    }

    pub fn compute_with(data: &FinanceData, today: NaiveDate, options: &SummaryOptions) -> Self {
        let monthly_income = monthly_income(&data.income_streams);
        let monthly_expenses = monthly_expenses(&data.expense_flows);
        Self {
            monthly_income,
            monthly_expenses,
            net_worth: net_worth(&data.accounts),
            net_cash_flow: monthly_income - monthly_expenses,
            upcoming_bills: upcoming_bills_within(
                &data.expense_flows,
                today,
                options.upcoming_window_days,
            ),
            active_income_streams: data.income_streams.iter().filter(|s| s.is_active()).count(),
            active_expense_flows: data.expense_flows.iter().filter(|f| f.is_active()).count(),
            active_accounts: data.accounts.iter().filter(|a| a.is_active()).count(),
        }
    }

    /// Share of monthly income consumed by monthly expenses, when there is income.
    pub fn expense_ratio(&self) -> Option<f64> {
        (self.monthly_income > 0.0).then(|| self.monthly_expenses / self.monthly_income)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Info,
    Success,
}

/// A short health-check message about the current finances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(data: &FinanceData, today: NaiveDate, options: &SummaryOptions) -> FinanceSummary {
        FinanceSummary::compute_with(data, today, options)
    }

    /// Health-check messages in display order: warnings first, praise last.
    pub fn insights(data: &FinanceData, today: NaiveDate, options: &SummaryOptions) -> Vec<Insight> {
        let summary = FinanceSummary::compute_with(data, today, options);
        let mut insights = Vec::new();

        if summary.upcoming_bills > 0 {
            let plural = if summary.upcoming_bills > 1 { "s" } else { "" };
            insights.push(Insight::new(
                InsightKind::Warning,
                format!("{} subscription{} due soon!", summary.upcoming_bills, plural),
            ));
        }

        if summary.active_income_streams == 0 {
            insights.push(Insight::new(
                InsightKind::Info,
                "No active income sources added yet",
            ));
        }

        if summary
            .expense_ratio()
            .is_some_and(|ratio| ratio > options.high_expense_ratio)
        {
            insights.push(Insight::new(
                InsightKind::Warning,
                "High expense ratio detected - consider reviewing subscriptions",
            ));
        }

        if summary.net_cash_flow > options.healthy_cash_flow {
            insights.push(Insight::new(
                InsightKind::Success,
                format!(
                    "Great job! You're saving {:.0} monthly",
                    summary.net_cash_flow
                ),
            ));
        }

        insights
    }
}

/// Insights computed with the default thresholds.
pub fn health_insights(data: &FinanceData, today: NaiveDate) -> Vec<Insight> {
    SummaryService::insights(data, today, &SummaryOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cadence, ExpenseKind, ExpenseStatus, IncomeKind, IncomeStatus};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn empty() -> FinanceData {
        FinanceData::default()
    }

    fn bill(due_in: Duration) -> ExpenseFlow {
        ExpenseFlow::new(
            "Hosting",
            ExpenseKind::Subscription,
            20.0,
            Cadence::Monthly,
            "Infrastructure",
            now(),
        )
        .with_next_due_date(now() + due_in)
    }

    #[test]
    fn monthly_income_normalizes_yearly_streams() {
        let streams = vec![
            IncomeStream::new("Bonus", IncomeKind::Active, 1200.0, Cadence::Yearly, now()),
            IncomeStream::new("Retainer", IncomeKind::Active, 100.0, Cadence::Monthly, now()),
        ];
        assert_eq!(monthly_income(&streams), 200.0);
    }

    #[test]
    fn inactive_and_one_off_entries_do_not_count() {
        let mut paused =
            IncomeStream::new("Paused", IncomeKind::Active, 500.0, Cadence::Monthly, now());
        paused.status = IncomeStatus::Inactive;
        let one_off = IncomeStream::new("Gift", IncomeKind::Passive, 300.0, Cadence::OneOff, now());
        assert_eq!(monthly_income(&[paused, one_off]), 0.0);

        let mut cancelled = bill(Duration::days(1));
        cancelled.status = ExpenseStatus::Cancelled;
        assert_eq!(monthly_expenses(&[cancelled.clone()]), 0.0);
        assert_eq!(upcoming_bills_count(&[cancelled], today()), 0);
    }

    #[test]
    fn upcoming_window_includes_seventh_day_and_excludes_past() {
        let flows = vec![
            bill(Duration::days(7)),
            bill(Duration::days(8)),
            bill(Duration::days(-1)),
            bill(Duration::hours(-2)),
        ];
        // +7 days and "earlier today" count; +8 and yesterday do not
        assert_eq!(upcoming_bills_count(&flows, today()), 2);
    }

    #[test]
    fn seeded_document_summary() {
        let data = FinanceData::seeded(now());
        let summary = FinanceSummary::compute(&data, today());
        assert_eq!(summary.monthly_income, 9200.0);
        assert!((summary.monthly_expenses - 202.99).abs() < 1e-9);
        assert_eq!(summary.net_worth, 100_000.0);
        assert!((summary.net_cash_flow - 8997.01).abs() < 1e-9);
        assert_eq!(summary.upcoming_bills, 1);
    }

    #[test]
    fn insights_flag_missing_income_and_high_ratio() {
        let data = empty();
        let insights = SummaryService::insights(&data, today(), &SummaryOptions::default());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Info);

        let mut data = empty();
        data.income_streams.push(IncomeStream::new(
            "Job",
            IncomeKind::Active,
            100.0,
            Cadence::Monthly,
            now(),
        ));
        data.expense_flows.push(bill(Duration::days(30)));
        data.expense_flows[0].amount = 90.0;
        let insights = SummaryService::insights(&data, today(), &SummaryOptions::default());
        assert!(insights
            .iter()
            .any(|insight| insight.message.starts_with("High expense ratio")));
    }

    #[test]
    fn seeded_document_earns_praise_and_a_due_warning() {
        let data = FinanceData::seeded(now());
        let insights = SummaryService::insights(&data, today(), &SummaryOptions::default());
        let kinds: Vec<_> = insights.iter().map(|insight| insight.kind).collect();
        assert_eq!(kinds, vec![InsightKind::Warning, InsightKind::Success]);
        assert_eq!(insights[0].message, "1 subscription due soon!");
    }
}
