//! Repositories and calculators layered on the persistent stores.

pub mod account_service;
pub mod expense_service;
pub mod income_service;
pub mod matrix_service;
pub mod secret_service;
pub mod snapshot_service;
pub mod snippet_service;
pub mod summary_service;

pub use account_service::AccountService;
pub use expense_service::ExpenseService;
pub use income_service::IncomeService;
pub use matrix_service::{MatrixEntry, MatrixFilter, MatrixKind, MatrixService};
pub use secret_service::SecretService;
pub use snapshot_service::{PeriodChange, PeriodComparison, PeriodMode, SnapshotService};
pub use snippet_service::SnippetService;
pub use summary_service::{FinanceSummary, Insight, InsightKind, SummaryOptions, SummaryService};

use chrono::{DateTime, Utc};

use crate::domain::{Identifiable, Timestamped};
use crate::errors::Mutation;

/// Applies `change` to the entity with `id` and stamps it with `now`.
pub(crate) fn update_in<E, F>(items: &mut [E], id: &str, now: DateTime<Utc>, change: F) -> Mutation
where
    E: Identifiable + Timestamped,
    F: FnOnce(&mut E),
{
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            change(item);
            item.touch(now);
            Mutation::Applied
        }
        None => Mutation::NotFound,
    }
}

/// Drops the entity with `id`, leaving the collection untouched when absent.
pub(crate) fn remove_from<E>(items: &mut Vec<E>, id: &str) -> Mutation
where
    E: Identifiable,
{
    let before = items.len();
    items.retain(|item| item.id() != id);
    if items.len() == before {
        Mutation::NotFound
    } else {
        Mutation::Applied
    }
}

/// Case-insensitive substring match used by the search helpers.
pub(crate) fn matches_query(query: &str, fields: &[&str], tags: &[String]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
        || tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
}
