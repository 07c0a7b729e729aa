pub mod account;
pub mod common;
pub mod expense;
pub mod finance_data;
pub mod income;
pub mod secret;
pub mod snapshot;
pub mod snippet;

pub use account::{Account, AccountKind, AccountPatch, AccountStatus};
pub use common::{is_valid_amount, new_entity_id, Cadence, EntityId, Identifiable, Timestamped};
pub use expense::{ExpenseFlow, ExpenseKind, ExpensePatch, ExpenseStatus};
pub use finance_data::FinanceData;
pub use income::{IncomeKind, IncomePatch, IncomeStatus, IncomeStream};
pub use secret::{Secret, SecretCategory, SecretPatch};
pub use snapshot::{FinancialSnapshot, SnapshotDraft};
pub use snippet::{Snippet, SnippetLanguage, SnippetPatch};
