use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{
    account::{Account, AccountKind, AccountStatus},
    common::Cadence,
    expense::{ExpenseFlow, ExpenseKind, ExpenseStatus},
    income::{IncomeKind, IncomeStatus, IncomeStream},
    snapshot::FinancialSnapshot,
};

/// The single persisted finance document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinanceData {
    pub income_streams: Vec<IncomeStream>,
    pub expense_flows: Vec<ExpenseFlow>,
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub historical_data: Vec<FinancialSnapshot>,
}

impl FinanceData {
    /// Illustrative document handed out when nothing has been stored yet.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let income_streams = vec![
            IncomeStream {
                id: "1".into(),
                name: "Freelance Development".into(),
                kind: IncomeKind::Active,
                amount: 5000.0,
                frequency: Cadence::Monthly,
                status: IncomeStatus::Active,
                tags: vec!["freelance".into(), "development".into(), "primary".into()],
                notes: Some("Main freelance income from various clients".into()),
                link: None,
                created_at: now,
                updated_at: now,
            },
            IncomeStream {
                id: "2".into(),
                name: "SaaS Product Revenue".into(),
                kind: IncomeKind::Passive,
                amount: 4200.0,
                frequency: Cadence::Monthly,
                status: IncomeStatus::Active,
                tags: vec!["saas".into(), "passive".into(), "recurring".into()],
                notes: Some("Monthly recurring revenue from SaaS product".into()),
                link: Some("https://dashboard.stripe.com".into()),
                created_at: now,
                updated_at: now,
            },
        ];

        let expense_flows = vec![
            ExpenseFlow {
                id: "1".into(),
                name: "AWS Infrastructure".into(),
                kind: ExpenseKind::Subscription,
                amount: 150.0,
                billing_cycle: Cadence::Monthly,
                status: ExpenseStatus::Active,
                category: "Infrastructure".into(),
                notes: Some("Cloud hosting and services".into()),
                link: Some("https://aws.amazon.com/billing".into()),
                next_due_date: Some(now + Duration::days(7)),
                created_at: now,
                updated_at: now,
            },
            ExpenseFlow {
                id: "2".into(),
                name: "Adobe Creative Suite".into(),
                kind: ExpenseKind::Subscription,
                amount: 52.99,
                billing_cycle: Cadence::Monthly,
                status: ExpenseStatus::Active,
                category: "Software".into(),
                notes: Some("Design and creative tools".into()),
                link: Some("https://adobe.com/account".into()),
                next_due_date: Some(now + Duration::days(15)),
                created_at: now,
                updated_at: now,
            },
        ];

        let accounts = vec![
            Account {
                id: "1".into(),
                name: "Business Checking".into(),
                kind: AccountKind::Bank,
                balance: 25_000.0,
                institution: "Chase Bank".into(),
                notes: Some("Primary business account".into()),
                link: None,
                status: AccountStatus::Active,
                created_at: now,
                updated_at: now,
            },
            Account {
                id: "2".into(),
                name: "Investment Portfolio".into(),
                kind: AccountKind::Investment,
                balance: 75_000.0,
                institution: "Vanguard".into(),
                notes: Some("Long-term investment portfolio".into()),
                link: Some("https://investor.vanguard.com".into()),
                status: AccountStatus::Active,
                created_at: now,
                updated_at: now,
            },
        ];

        Self {
            income_streams,
            expense_flows,
            accounts,
            historical_data: Vec::new(),
        }
    }

    /// Coerces shapes written by earlier schema versions before typed decoding.
    ///
    /// Returns `true` when the value was changed.
    pub fn normalize_legacy(value: &mut serde_json::Value) -> bool {
        let Some(object) = value.as_object_mut() else {
            return false;
        };
        let needs_reset = !matches!(object.get("historicalData"), Some(serde_json::Value::Array(_)));
        if needs_reset {
            object.insert(
                "historicalData".into(),
                serde_json::Value::Array(Vec::new()),
            );
        }
        needs_reset
    }
}
