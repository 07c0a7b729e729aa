use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::core::services::{
    AccountService, ExpenseService, FinanceSummary, IncomeService, Insight, MatrixEntry,
    MatrixFilter, MatrixService, SecretService, SnapshotService, SnippetService, SummaryOptions,
    SummaryService,
};
use crate::core::time::{Clock, SystemClock};
use crate::errors::StoreResult;
use crate::storage::{
    FileStorage, FinanceStore, KeyValueStorage, MemoryStorage, SecretStore, SnippetStore,
};

/// Facade owning the storage handle and clock for one session.
///
/// Every accessor hands out a repository bound to the same backend, so
/// changes made through one are visible through all the others.
#[derive(Clone)]
pub struct StashManager {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    options: SummaryOptions,
}

impl StashManager {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            options: SummaryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SummaryOptions) -> Self {
        self.options = options;
        self
    }

    /// Manager over a fresh in-memory backend and the system clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(SystemClock))
    }

    /// Manager over the file backend selected by `config` under `base`.
    pub fn open(config: &Config, base: &Path) -> StoreResult<Self> {
        let root = config.data_dir_in(base);
        let storage = FileStorage::new(root)?;
        info!(root = %storage.root().display(), "opened file storage");
        Ok(Self::new(Arc::new(storage), Arc::new(SystemClock))
            .with_options(config.summary_options()))
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn options(&self) -> &SummaryOptions {
        &self.options
    }

    pub fn finance_store(&self) -> FinanceStore {
        FinanceStore::new(self.storage.clone(), self.clock.clone())
    }

    pub fn incomes(&self) -> IncomeService {
        IncomeService::new(self.finance_store())
    }

    pub fn expenses(&self) -> ExpenseService {
        ExpenseService::new(self.finance_store())
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.finance_store())
    }

    pub fn snapshots(&self) -> SnapshotService {
        SnapshotService::new(self.finance_store())
    }

    pub fn snippets(&self) -> SnippetService {
        SnippetService::new(SnippetStore::new(self.storage.clone()), self.clock.clone())
    }

    pub fn secrets(&self) -> SecretService {
        SecretService::new(SecretStore::new(self.storage.clone()), self.clock.clone())
    }

    /// Aggregates over the stored finance document as of the clock's current day.
    pub fn summary(&self) -> FinanceSummary {
        let data = self.finance_store().read();
        SummaryService::summarize(&data, self.clock.today(), &self.options)
    }

    pub fn insights(&self) -> Vec<Insight> {
        let data = self.finance_store().read();
        SummaryService::insights(&data, self.clock.today(), &self.options)
    }

    pub fn matrix(&self, filter: &MatrixFilter) -> Vec<MatrixEntry> {
        MatrixService::filter(&self.finance_store().read(), filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;
    use crate::domain::{Account, AccountKind};
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    /// Clock whose local calendar day is still the day before its UTC instant.
    struct WestOfUtcClock(DateTime<Utc>);

    impl Clock for WestOfUtcClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }

        fn today(&self) -> NaiveDate {
            (self.0 - Duration::days(1)).date_naive()
        }
    }

    #[test]
    fn repositories_share_one_backend() {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        ));
        let manager = StashManager::new(Arc::new(MemoryStorage::new()), clock.clone());
        let before = manager.summary().net_worth;

        manager.accounts().add(Account::new(
            "Emergency fund",
            AccountKind::Bank,
            5000.0,
            "Ally",
            clock.now(),
        ));

        assert_eq!(manager.summary().net_worth, before + 5000.0);
        assert_eq!(manager.matrix(&MatrixFilter::default()).len(), 7);
    }

    #[test]
    fn summary_and_snapshot_share_the_clock_day() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 2, 0, 0).unwrap();
        let clock = Arc::new(WestOfUtcClock(instant));
        let manager = StashManager::new(Arc::new(MemoryStorage::new()), clock.clone());

        // seeded AWS bill is due seven UTC days after the instant, eight after the local day
        assert_eq!(manager.summary().upcoming_bills, 0);

        manager.snapshots().compute_and_save_snapshot();
        let snapshot = manager.snapshots().latest().expect("snapshot saved");
        assert_eq!(snapshot.date, clock.today());
    }
}
