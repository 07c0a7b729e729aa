//! Repository over the income streams of the finance document.

use tracing::{debug, warn};

use crate::domain::{is_valid_amount, IncomePatch, IncomeStream};
use crate::errors::{Mutation, StoreResult};
use crate::storage::{document::report_write_failure, FinanceStore};

use super::{remove_from, update_in};

/// CRUD over income streams. Every call reads the whole document, applies one
/// change and writes the whole document back.
#[derive(Clone)]
pub struct IncomeService {
    store: FinanceStore,
}

impl IncomeService {
    pub fn new(store: FinanceStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<IncomeStream> {
        self.store.read().income_streams
    }

    pub fn get(&self, id: &str) -> Option<IncomeStream> {
        self.list().into_iter().find(|stream| stream.id == id)
    }

    /// Appends a fully formed stream. Ids already in use and invalid amounts
    /// are rejected without touching storage.
    pub fn try_add(&self, stream: IncomeStream) -> StoreResult<Mutation> {
        if !is_valid_amount(stream.amount) {
            warn!(id = %stream.id, amount = stream.amount, "rejecting income stream amount");
            return Ok(Mutation::Rejected);
        }
        let mut data = self.store.read();
        if data.income_streams.iter().any(|existing| existing.id == stream.id) {
            warn!(id = %stream.id, "income stream id already in use");
            return Ok(Mutation::Duplicate);
        }
        debug!(id = %stream.id, name = %stream.name, "adding income stream");
        data.income_streams.push(stream);
        self.store.try_write(&data)?;
        Ok(Mutation::Applied)
    }

    /// Merges `patch` onto the stream and bumps `updatedAt`. Unknown ids are a no-op.
    pub fn try_update(&self, id: &str, patch: IncomePatch) -> StoreResult<Mutation> {
        if let Some(amount) = patch.amount.filter(|amount| !is_valid_amount(*amount)) {
            warn!(id, amount, "rejecting income stream amount");
            return Ok(Mutation::Rejected);
        }
        let mut data = self.store.read();
        let now = self.store.clock().now();
        let outcome = update_in(&mut data.income_streams, id, now, |stream| {
            patch.apply(stream)
        });
        if outcome.applied() {
            self.store.try_write(&data)?;
        }
        Ok(outcome)
    }

    pub fn try_delete(&self, id: &str) -> StoreResult<Mutation> {
        let mut data = self.store.read();
        let outcome = remove_from(&mut data.income_streams, id);
        self.store.try_write(&data)?;
        Ok(outcome)
    }

    pub fn add(&self, stream: IncomeStream) {
        if let Err(err) = self.try_add(stream) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn update(&self, id: &str, patch: IncomePatch) {
        if let Err(err) = self.try_update(id, patch) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn delete(&self, id: &str) {
        if let Err(err) = self.try_delete(id) {
            report_write_failure(self.store.key(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::{Clock, FixedClock};
    use crate::domain::{Cadence, IncomeKind, IncomeStatus};
    use crate::storage::MemoryStorage;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn service() -> (IncomeService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        ));
        let store = FinanceStore::new(Arc::new(MemoryStorage::new()), clock.clone());
        (IncomeService::new(store), clock)
    }

    #[test]
    fn add_then_update_bumps_updated_at_only() {
        let (service, clock) = service();
        let stream = IncomeStream::new(
            "Consulting",
            IncomeKind::Active,
            1500.0,
            Cadence::Monthly,
            clock.now(),
        );
        let id = stream.id.clone();
        assert_eq!(service.try_add(stream).unwrap(), Mutation::Applied);

        clock.advance(Duration::seconds(30));
        let patch = IncomePatch {
            status: Some(IncomeStatus::Inactive),
            ..IncomePatch::default()
        };
        assert_eq!(service.try_update(&id, patch).unwrap(), Mutation::Applied);

        let stored = service.get(&id).expect("stream persisted");
        assert_eq!(stored.status, IncomeStatus::Inactive);
        assert_eq!(stored.updated_at, clock.now());
        assert_eq!(stored.created_at, clock.now() - Duration::seconds(30));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let (service, clock) = service();
        let stream = IncomeStream::new(
            "Rent",
            IncomeKind::Passive,
            900.0,
            Cadence::Monthly,
            clock.now(),
        );
        service.add(stream.clone());
        assert_eq!(service.try_add(stream).unwrap(), Mutation::Duplicate);
        // two seeded streams plus the new one
        assert_eq!(service.list().len(), 3);
    }

    #[test]
    fn update_of_unknown_id_writes_nothing() {
        let (service, _clock) = service();
        let outcome = service
            .try_update("missing", IncomePatch::default())
            .unwrap();
        assert_eq!(outcome, Mutation::NotFound);
        assert!(service.store.try_read().unwrap().is_none());
    }

    #[test]
    fn non_finite_or_negative_amounts_are_rejected() {
        let (service, clock) = service();
        let refund = IncomeStream::new(
            "Refund",
            IncomeKind::Active,
            -500.0,
            Cadence::Monthly,
            clock.now(),
        );
        assert_eq!(service.try_add(refund).unwrap(), Mutation::Rejected);
        assert!(service.store.try_read().unwrap().is_none());

        for amount in [f64::NAN, f64::INFINITY, -0.01] {
            let patch = IncomePatch {
                amount: Some(amount),
                ..IncomePatch::default()
            };
            assert_eq!(service.try_update("1", patch).unwrap(), Mutation::Rejected);
        }
        assert_eq!(service.get("1").expect("seeded stream").amount, 5000.0);
    }
}
