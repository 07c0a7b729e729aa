use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{impl_entity, merge, new_entity_id, present, Cadence, EntityId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncomeKind {
    Active,
    Passive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncomeStatus {
    Active,
    Inactive,
}

/// A recurring or one-off source of incoming funds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStream {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IncomeKind,
    pub amount: f64,
    pub frequency: Cadence,
    pub status: IncomeStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(IncomeStream);

impl IncomeStream {
    /// Creates an active stream with a fresh id, stamped at `now`.
    pub fn new(
        name: impl Into<String>,
        kind: IncomeKind,
        amount: f64,
        frequency: Cadence,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            kind,
            amount,
            frequency,
            status: IncomeStatus::Active,
            tags: Vec::new(),
            notes: None,
            link: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == IncomeStatus::Active
    }

    /// Contribution of this stream to the recurring monthly total.
    pub fn monthly_amount(&self) -> f64 {
        self.frequency.monthly_share(self.amount)
    }
}

/// Partial update for an [`IncomeStream`]. `id` and `createdAt` are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomePatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<IncomeKind>,
    pub amount: Option<f64>,
    pub frequency: Option<Cadence>,
    pub status: Option<IncomeStatus>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub link: Option<Option<String>>,
}

impl IncomePatch {
    pub fn apply(self, target: &mut IncomeStream) {
        merge(&mut target.name, self.name);
        merge(&mut target.kind, self.kind);
        merge(&mut target.amount, self.amount);
        merge(&mut target.frequency, self.frequency);
        merge(&mut target.status, self.status);
        merge(&mut target.tags, self.tags);
        merge(&mut target.notes, self.notes);
        merge(&mut target.link, self.link);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn deserializes_legacy_camel_case_document() {
        let json = r#"{
            "id": "1",
            "name": "Freelance Development",
            "type": "active",
            "amount": 5000,
            "frequency": "monthly",
            "status": "active",
            "tags": ["freelance"],
            "createdAt": "2025-01-15T10:30:00.000Z",
            "updatedAt": "2025-01-15T10:30:00.000Z"
        }"#;
        let stream: IncomeStream = serde_json::from_str(json).expect("parse income");
        assert_eq!(stream.id, "1");
        assert_eq!(stream.kind, IncomeKind::Active);
        assert_eq!(stream.amount, 5000.0);
        assert_eq!(stream.created_at, stamp());
        assert!(stream.notes.is_none());
    }

    #[test]
    fn patch_clears_notes_when_null_is_present() {
        let mut stream =
            IncomeStream::new("Dividends", IncomeKind::Passive, 80.0, Cadence::Monthly, stamp());
        stream.notes = Some("quarterly payout".into());

        let patch: IncomePatch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        patch.apply(&mut stream);
        assert!(stream.notes.is_none());

        let patch: IncomePatch = serde_json::from_str(r#"{"amount": 90}"#).unwrap();
        patch.apply(&mut stream);
        assert_eq!(stream.amount, 90.0);
        assert_eq!(stream.name, "Dividends");
    }
}
