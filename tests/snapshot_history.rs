mod common;

use chrono::{Duration, NaiveDate};
use stash_core::{
    core::{
        services::snapshot_service::{build_draft, compare_latest, group_by_period, MAX_SNAPSHOTS},
        services::PeriodMode,
        time::Clock,
    },
    domain::{AccountPatch, FinanceData},
};

use common::{fixed_instant, memory_manager};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn same_date_snapshot_is_replaced_by_the_latest_values() {
    let (manager, _, clock) = memory_manager();
    let snapshots = manager.snapshots();

    snapshots.compute_and_save_snapshot();
    manager.accounts().update(
        "1",
        AccountPatch {
            balance: Some(30_000.0),
            ..AccountPatch::default()
        },
    );
    clock.advance(Duration::hours(2));
    snapshots.compute_and_save_snapshot();

    let history = snapshots.list_snapshots();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].date, day(2025, 3, 1));
    assert_eq!(history[0].net_worth, 105_000.0);
    assert_eq!(history[0].created_at, clock.now());
}

#[test]
fn history_is_capped_to_the_most_recent_dates() {
    let (manager, _, _) = memory_manager();
    let snapshots = manager.snapshots();
    let start = day(2024, 1, 1);

    for offset in 0..30 {
        let date = start + Duration::days(offset);
        let now = fixed_instant() + Duration::days(offset);
        snapshots.compute_and_save_snapshot_at(now, date);
    }

    let history = snapshots.list_snapshots();
    assert_eq!(history.len(), MAX_SNAPSHOTS);
    assert_eq!(history.first().unwrap().date, start + Duration::days(29));
    assert_eq!(history.last().unwrap().date, start + Duration::days(6));
    assert!(history.windows(2).all(|pair| pair[0].date > pair[1].date));
}

#[test]
fn backdated_snapshot_lands_in_date_order() {
    let (manager, _, clock) = memory_manager();
    let snapshots = manager.snapshots();

    snapshots.compute_and_save_snapshot_at(clock.now(), day(2025, 3, 1));
    snapshots.compute_and_save_snapshot_at(clock.now(), day(2025, 1, 1));
    snapshots.compute_and_save_snapshot_at(clock.now(), day(2025, 2, 1));

    let dates: Vec<_> = snapshots
        .list_snapshots()
        .iter()
        .map(|snapshot| snapshot.date)
        .collect();
    assert_eq!(dates, vec![day(2025, 3, 1), day(2025, 2, 1), day(2025, 1, 1)]);
}

#[test]
fn snapshot_persists_alongside_entities() {
    let (manager, _, _) = memory_manager();
    manager.snapshots().compute_and_save_snapshot();

    let stored = manager
        .finance_store()
        .try_read()
        .unwrap()
        .expect("snapshot writes the whole document");
    assert_eq!(stored.historical_data.len(), 1);
    assert_eq!(stored.income_streams.len(), 2);

    let draft = build_draft(&stored, day(2025, 3, 1));
    assert_eq!(draft.total_income, stored.historical_data[0].total_income);
    assert_eq!(draft.total_accounts, 2);
}

#[test]
fn periods_group_and_compare_across_months() {
    let (manager, _, clock) = memory_manager();
    let snapshots = manager.snapshots();
    snapshots.compute_and_save_snapshot_at(clock.now(), day(2025, 1, 10));

    manager.accounts().update(
        "2",
        AccountPatch {
            balance: Some(100_000.0),
            ..AccountPatch::default()
        },
    );
    snapshots.compute_and_save_snapshot_at(clock.now(), day(2025, 2, 3));
    snapshots.compute_and_save_snapshot_at(clock.now(), day(2025, 2, 20));

    let history = snapshots.list_snapshots();
    let months = group_by_period(&history, PeriodMode::Monthly);
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].1.date, day(2025, 2, 20));

    let comparison = compare_latest(&history, PeriodMode::Monthly).expect("two months");
    assert_eq!(comparison.net_worth.amount, 25_000.0);
    assert_eq!(comparison.net_worth.percentage, 25.0);
    assert_eq!(comparison.income.amount, 0.0);

    assert!(compare_latest(&history, PeriodMode::Yearly).is_none());
    assert!(group_by_period(&FinanceData::default().historical_data, PeriodMode::Yearly).is_empty());
}
