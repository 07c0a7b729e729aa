mod common;

use std::sync::Arc;

use chrono::Duration;
use stash_core::{
    core::{
        services::snapshot_service::build_draft,
        time::{Clock, FixedClock},
    },
    domain::{
        Account, AccountKind, Cadence, ExpenseFlow, ExpenseKind, FinanceData, IncomeKind,
        IncomeStream,
    },
    errors::StorageError,
    storage::{DetachedStorage, FinanceStore, KeyValueStorage, MemoryStorage, FINANCE_STORAGE_KEY},
    StashManager,
};

use common::{file_manager, fixed_instant, memory_manager};

fn custom_document() -> FinanceData {
    let now = fixed_instant();
    let mut data = FinanceData::default();
    data.income_streams.push(IncomeStream::new(
        "Consulting",
        IncomeKind::Active,
        3200.0,
        Cadence::Monthly,
        now,
    ));
    data.expense_flows.push(
        ExpenseFlow::new(
            "Domain renewal",
            ExpenseKind::Subscription,
            24.5,
            Cadence::Yearly,
            "Infrastructure",
            now,
        )
        .with_next_due_date(now + Duration::days(40)),
    );
    data.accounts.push(Account::new(
        "Brokerage",
        AccountKind::Investment,
        18_250.75,
        "Fidelity",
        now,
    ));
    data
}

#[test]
fn written_document_reads_back_identically() {
    let (manager, _, _) = memory_manager();
    let store = manager.finance_store();
    let data = custom_document();

    store.try_write(&data).expect("write document");
    assert_eq!(store.read(), data);
}

#[test]
fn fractional_amounts_and_derived_snapshots_read_back_exactly() {
    let (manager, _, clock) = file_manager();
    let store = manager.finance_store();
    let now = clock.now();

    let mut data = custom_document();
    data.income_streams[0].amount = 940071.3677142857;
    data.expense_flows[0].amount = 0.1 + 0.2;
    data.accounts[0].balance = 1.0 / 3.0;

    // deterministic spread of values with long mantissas
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for index in 0..500 {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let amount = (seed >> 11) as f64 / (1u64 << 53) as f64 * 1_000_000.0;
        data.income_streams.push(IncomeStream::new(
            format!("Stream {index}"),
            IncomeKind::Passive,
            amount,
            Cadence::Yearly,
            now,
        ));
    }

    let snapshot = build_draft(&data, now.date_naive()).into_snapshot(now);
    data.historical_data.push(snapshot);

    store.try_write(&data).expect("write document");
    assert_eq!(store.read(), data);
}

#[test]
fn empty_storage_yields_seeded_defaults_without_writing() {
    let (manager, storage, clock) = memory_manager();
    let data = manager.finance_store().read();

    assert_eq!(data.income_streams.len(), 2);
    assert_eq!(data.expense_flows.len(), 2);
    assert_eq!(data.accounts.len(), 2);
    assert!(data.historical_data.is_empty());
    assert!(data
        .accounts
        .iter()
        .all(|account| account.created_at == clock.now()));
    assert!(storage.is_empty());
}

#[test]
fn file_storage_keeps_one_document_per_key() {
    let (manager, storage, _) = file_manager();
    let data = custom_document();
    manager.finance_store().write(&data);

    let path = storage.document_path(FINANCE_STORAGE_KEY);
    assert!(path.exists());
    let raw = std::fs::read_to_string(&path).expect("read document file");
    assert!(raw.contains("\"incomeStreams\""));
    assert!(raw.contains("\"billingCycle\":\"yearly\""));

    assert_eq!(manager.finance_store().read(), data);
    assert_eq!(
        storage.keys().unwrap(),
        vec![FINANCE_STORAGE_KEY.to_string()]
    );
}

#[test]
fn legacy_document_with_bad_history_loads_with_empty_history() {
    let (manager, storage, _) = memory_manager();
    let mut legacy = serde_json::to_value(custom_document()).unwrap();
    legacy
        .as_object_mut()
        .unwrap()
        .insert("historicalData".into(), serde_json::json!("not-a-list"));
    storage
        .set_item(FINANCE_STORAGE_KEY, &legacy.to_string())
        .unwrap();

    let data = manager.finance_store().read();
    assert_eq!(data.income_streams[0].name, "Consulting");
    assert!(data.historical_data.is_empty());
}

#[test]
fn corrupt_document_falls_back_and_stays_untouched() {
    let (manager, storage, _) = memory_manager();
    storage.set_item(FINANCE_STORAGE_KEY, "{ not json").unwrap();

    let data = manager.finance_store().read();
    assert_eq!(data.accounts.len(), 2);
    assert_eq!(
        storage.get_item(FINANCE_STORAGE_KEY).unwrap().as_deref(),
        Some("{ not json")
    );
}

#[test]
fn unavailable_storage_reads_defaults_and_skips_writes() {
    let clock = Arc::new(FixedClock::new(fixed_instant()));
    let manager = StashManager::new(Arc::new(DetachedStorage), clock);
    let store = manager.finance_store();

    assert_eq!(store.read().income_streams.len(), 2);
    assert!(matches!(
        store.try_write(&custom_document()),
        Err(StorageError::Unavailable)
    ));
    store.write(&custom_document());
    manager.incomes().delete("1");
    assert_eq!(manager.incomes().list().len(), 2);
}

#[test]
fn quota_failure_is_swallowed_and_nothing_is_stored() {
    let storage = Arc::new(MemoryStorage::with_quota(64));
    let clock = Arc::new(FixedClock::new(fixed_instant()));
    let store = FinanceStore::new(storage.clone(), clock);

    assert!(matches!(
        store.try_write(&custom_document()),
        Err(StorageError::QuotaExceeded { .. })
    ));
    store.write(&custom_document());
    assert!(storage.get_item(FINANCE_STORAGE_KEY).unwrap().is_none());
    assert_eq!(store.read().accounts[0].institution, "Chase Bank");
}
