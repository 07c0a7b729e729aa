use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, money, percentage};
use crate::cli::registry::CommandEntry;
use crate::core::services::snapshot_service::{compare_latest, group_by_period};
use crate::core::services::{PeriodChange, PeriodMode};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "snapshot",
            "Record today's totals in the history",
            "snapshot",
            cmd_snapshot,
        ),
        CommandEntry::new(
            "history",
            "Show recorded snapshots, optionally grouped by period",
            "history [monthly|yearly]",
            cmd_history,
        ),
    ]
}

fn cmd_snapshot(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let clock = context.manager.clock().clone();
    let snapshot = context
        .manager
        .snapshots()
        .try_compute_and_save_at(clock.now(), clock.today())?;
    output::success(format!(
        "Snapshot saved for {} (net worth {})",
        snapshot.date,
        money(snapshot.net_worth, context.currency()).trim()
    ));
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let snapshots = context.manager.snapshots().list_snapshots();
    let currency = context.currency().to_string();

    let Some(raw_mode) = args.first() else {
        output::section(format!("Snapshot history ({})", snapshots.len()));
        if snapshots.is_empty() {
            output::info("No snapshots yet. Run `snapshot` to record one.");
        }
        for snapshot in &snapshots {
            output::info(format!(
                "  {}  income {}  expenses {}  net worth {}",
                snapshot.date,
                money(snapshot.total_income, &currency),
                money(-snapshot.total_expenses, &currency),
                money(snapshot.net_worth, &currency)
            ));
        }
        return Ok(());
    };

    let mode = PeriodMode::parse(raw_mode).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown period `{}` (use monthly or yearly)",
            raw_mode
        ))
    })?;

    let periods = group_by_period(&snapshots, mode);
    output::section(format!("History by period ({})", periods.len()));
    for (period, snapshot) in &periods {
        output::info(format!(
            "  {:<8} cash flow {}  net worth {}",
            period,
            money(snapshot.net_cash_flow, &currency),
            money(snapshot.net_worth, &currency)
        ));
    }

    if let Some(comparison) = compare_latest(&snapshots, mode) {
        output::section(format!(
            "{} vs {}",
            comparison.period, comparison.previous_period
        ));
        print_change("Income", comparison.income, &currency);
        print_change("Expenses", comparison.expenses, &currency);
        print_change("Net worth", comparison.net_worth, &currency);
        print_change("Cash flow", comparison.cash_flow, &currency);
    }
    Ok(())
}

fn print_change(label: &str, change: PeriodChange, currency: &str) {
    output::info(format!(
        "  {:<10} {} ({})",
        label,
        money(change.amount, currency),
        percentage(change.percentage)
    ));
}
