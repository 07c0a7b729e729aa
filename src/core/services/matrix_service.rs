//! Flattened view across income streams, expense flows and accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::FinanceData;

use super::matches_query;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatrixKind {
    Income,
    Expense,
    Account,
}

impl MatrixKind {
    pub fn label(self) -> &'static str {
        match self {
            MatrixKind::Income => "Income",
            MatrixKind::Expense => "Expense",
            MatrixKind::Account => "Account",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(MatrixKind::Income),
            "expense" | "expenses" => Some(MatrixKind::Expense),
            "account" | "accounts" => Some(MatrixKind::Account),
            _ => None,
        }
    }
}

/// One row of the matrix. Expense amounts are negated; account rows carry the balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixEntry {
    pub id: String,
    pub name: String,
    pub kind: MatrixKind,
    pub sub_kind: String,
    pub amount: f64,
    pub frequency: String,
    pub status: String,
    pub category: String,
    pub link: Option<String>,
    pub next_due: Option<DateTime<Utc>>,
    pub notes: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MatrixFilter {
    pub query: Option<String>,
    pub kind: Option<MatrixKind>,
    pub status: Option<String>,
}

impl MatrixFilter {
    pub fn matches(&self, entry: &MatrixEntry) -> bool {
        let query_ok = self
            .query
            .as_deref()
            .map_or(true, |query| matches_query(query, &[entry.name.as_str(), entry.notes.as_str()], &entry.tags));
        let kind_ok = self.kind.map_or(true, |kind| kind == entry.kind);
        let status_ok = self
            .status
            .as_deref()
            .map_or(true, |status| status.eq_ignore_ascii_case(&entry.status));
        query_ok && kind_ok && status_ok
    }
}

fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(text)) => text,
        _ => String::new(),
    }
}

pub struct MatrixService;

impl MatrixService {
    /// All rows: income first, then expenses, then accounts, each in stored order.
    pub fn entries(data: &FinanceData) -> Vec<MatrixEntry> {
        let income = data.income_streams.iter().map(|stream| MatrixEntry {
            id: stream.id.clone(),
            name: stream.name.clone(),
            kind: MatrixKind::Income,
            sub_kind: label(&stream.kind),
            amount: stream.amount,
            frequency: stream.frequency.label().to_string(),
            status: label(&stream.status),
            category: "Income".to_string(),
            link: stream.link.clone(),
            next_due: None,
            notes: stream.notes.clone().unwrap_or_default(),
            tags: stream.tags.clone(),
        });
        let expenses = data.expense_flows.iter().map(|flow| MatrixEntry {
            id: flow.id.clone(),
            name: flow.name.clone(),
            kind: MatrixKind::Expense,
            sub_kind: label(&flow.kind),
            amount: -flow.amount,
            frequency: flow.billing_cycle.label().to_string(),
            status: label(&flow.status),
            category: flow.category.clone(),
            link: flow.link.clone(),
            next_due: flow.next_due_date,
            notes: flow.notes.clone().unwrap_or_default(),
            tags: Vec::new(),
        });
        let accounts = data.accounts.iter().map(|account| MatrixEntry {
            id: account.id.clone(),
            name: account.name.clone(),
            kind: MatrixKind::Account,
            sub_kind: label(&account.kind),
            amount: account.balance,
            frequency: "balance".to_string(),
            status: label(&account.status),
            category: account.institution.clone(),
            link: account.link.clone(),
            next_due: None,
            notes: account.notes.clone().unwrap_or_default(),
            tags: Vec::new(),
        });
        income.chain(expenses).chain(accounts).collect()
    }

    pub fn filter(data: &FinanceData, filter: &MatrixFilter) -> Vec<MatrixEntry> {
        Self::entries(data)
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect()
    }
}
