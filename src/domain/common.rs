use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Identifier shared by every persisted entity.
///
/// Stored as a plain string so documents written with short numeric ids
/// keep loading.
pub type EntityId = String;

/// Generates a fresh, never-reused entity identifier.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Entities carrying creation and modification timestamps.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    /// Marks the entity as modified at `now`.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Amounts are stored as finite, non-negative values. Direction comes from the
/// collection an entity lives in, never from the sign.
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// How often an amount recurs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Cadence {
    Monthly,
    Yearly,
    OneOff,
}

impl Cadence {
    /// Share of `amount` that recurs every month. One-off amounts do not recur.
    pub fn monthly_share(self, amount: f64) -> f64 {
        match self {
            Cadence::Monthly => amount,
            Cadence::Yearly => amount / 12.0,
            Cadence::OneOff => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cadence::Monthly => "monthly",
            Cadence::Yearly => "yearly",
            Cadence::OneOff => "one-off",
        }
    }
}

/// Deserializes a present field (even `null`) as `Some(..)` so patches can
/// tell "leave unchanged" apart from "clear".
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Applies an optional replacement onto `slot`.
pub(crate) fn merge<T>(slot: &mut T, replacement: Option<T>) {
    if let Some(value) = replacement {
        *slot = value;
    }
}

macro_rules! impl_entity {
    ($ty:ty) => {
        impl $crate::domain::common::Identifiable for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        }

        impl $crate::domain::common::Timestamped for $ty {
            fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.updated_at
            }

            fn touch(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.updated_at = now;
            }
        }
    };
}

pub(crate) use impl_entity;
