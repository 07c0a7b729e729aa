use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{impl_entity, merge, new_entity_id, present, EntityId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Bank,
    Investment,
    Asset,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// A balance-holding entity contributing to net worth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub balance: f64,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Account);

impl Account {
    pub fn new(
        name: impl Into<String>,
        kind: AccountKind,
        balance: f64,
        institution: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            kind,
            balance,
            institution: institution.into(),
            notes: None,
            link: None,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Partial update for an [`Account`]. `id` and `createdAt` are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AccountKind>,
    pub balance: Option<f64>,
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub link: Option<Option<String>>,
    pub status: Option<AccountStatus>,
}

impl AccountPatch {
    pub fn apply(self, target: &mut Account) {
        merge(&mut target.name, self.name);
        merge(&mut target.kind, self.kind);
        merge(&mut target.balance, self.balance);
        merge(&mut target.institution, self.institution);
        merge(&mut target.notes, self.notes);
        merge(&mut target.link, self.link);
        merge(&mut target.status, self.status);
    }
}
