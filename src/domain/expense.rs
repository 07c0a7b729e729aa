use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{impl_entity, merge, new_entity_id, present, Cadence, EntityId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseKind {
    Subscription,
    OneOff,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Active,
    Cancelled,
}

/// A subscription or one-off outgoing payment. `amount` is stored positive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFlow {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ExpenseKind,
    pub amount: f64,
    pub billing_cycle: Cadence,
    pub status: ExpenseStatus,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(ExpenseFlow);

impl ExpenseFlow {
    /// Creates an active flow with a fresh id, stamped at `now`.
    pub fn new(
        name: impl Into<String>,
        kind: ExpenseKind,
        amount: f64,
        billing_cycle: Cadence,
        category: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            kind,
            amount,
            billing_cycle,
            status: ExpenseStatus::Active,
            category: category.into(),
            notes: None,
            link: None,
            next_due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_next_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.next_due_date = Some(due);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ExpenseStatus::Active
    }

    pub fn monthly_amount(&self) -> f64 {
        self.billing_cycle.monthly_share(self.amount)
    }
}

/// Partial update for an [`ExpenseFlow`]. `id` and `createdAt` are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ExpenseKind>,
    pub amount: Option<f64>,
    pub billing_cycle: Option<Cadence>,
    pub status: Option<ExpenseStatus>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub link: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub next_due_date: Option<Option<DateTime<Utc>>>,
}

impl ExpensePatch {
    pub fn apply(self, target: &mut ExpenseFlow) {
        merge(&mut target.name, self.name);
        merge(&mut target.kind, self.kind);
        merge(&mut target.amount, self.amount);
        merge(&mut target.billing_cycle, self.billing_cycle);
        merge(&mut target.status, self.status);
        merge(&mut target.category, self.category);
        merge(&mut target.notes, self.notes);
        merge(&mut target.link, self.link);
        merge(&mut target.next_due_date, self.next_due_date);
    }
}
