use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, money};
use crate::cli::registry::CommandEntry;
use crate::core::services::{InsightKind, MatrixFilter, MatrixKind};

use super::query_from;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show monthly totals, net worth and upcoming bills",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "insights",
            "Show financial health hints",
            "insights",
            cmd_insights,
        ),
        CommandEntry::new("income", "List income streams", "income", cmd_income),
        CommandEntry::new("expenses", "List expense flows", "expenses", cmd_expenses),
        CommandEntry::new("accounts", "List accounts", "accounts", cmd_accounts),
        CommandEntry::new(
            "matrix",
            "Show every entry in one table, optionally filtered",
            "matrix [income|expense|account] [query]",
            cmd_matrix,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.manager.summary();
    let currency = context.currency().to_string();
    let window = context.manager.options().upcoming_window_days;

    output::section("Financial summary");
    output::info(format!("  Monthly income   : {}", money(summary.monthly_income, &currency)));
    output::info(format!("  Monthly expenses : {}", money(-summary.monthly_expenses, &currency)));
    output::info(format!("  Net cash flow    : {}", money(summary.net_cash_flow, &currency)));
    output::info(format!("  Net worth        : {}", money(summary.net_worth, &currency)));
    output::info(format!(
        "  Upcoming bills   : {} in the next {} days",
        summary.upcoming_bills, window
    ));
    output::info(format!(
        "  Active           : {} income, {} expenses, {} accounts",
        summary.active_income_streams, summary.active_expense_flows, summary.active_accounts
    ));
    Ok(())
}

fn cmd_insights(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let insights = context.manager.insights();
    output::section("Insights");
    if insights.is_empty() {
        output::info("Nothing to report.");
    }
    for insight in insights {
        match insight.kind {
            InsightKind::Warning => output::warning(insight.message),
            InsightKind::Info => output::info(insight.message),
            InsightKind::Success => output::success(insight.message),
        }
    }
    Ok(())
}

fn cmd_income(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let streams = context.manager.incomes().list();
    output::section(format!("Income streams ({})", streams.len()));
    for stream in streams {
        output::info(format!(
            "  {:<28} {} {:<8} {:?}/{:?}",
            stream.name,
            money(stream.amount, context.currency()),
            stream.frequency.label(),
            stream.kind,
            stream.status
        ));
    }
    Ok(())
}

fn cmd_expenses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let flows = context.manager.expenses().list();
    output::section(format!("Expense flows ({})", flows.len()));
    for flow in flows {
        let due = flow
            .next_due_date
            .map(|due| due.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".into());
        output::info(format!(
            "  {:<28} {} {:<8} {:<16} due {}",
            flow.name,
            money(-flow.amount, context.currency()),
            flow.billing_cycle.label(),
            flow.category,
            due
        ));
    }
    Ok(())
}

fn cmd_accounts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let accounts = context.manager.accounts().list();
    output::section(format!("Accounts ({})", accounts.len()));
    for account in accounts {
        output::info(format!(
            "  {:<28} {} {:<16} {:?}",
            account.name,
            money(account.balance, context.currency()),
            account.institution,
            account.kind
        ));
    }
    Ok(())
}

fn cmd_matrix(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (kind, rest) = match args.split_first() {
        Some((first, rest)) => match MatrixKind::parse(first) {
            Some(kind) => (Some(kind), rest),
            None => (None, args),
        },
        None => (None, args),
    };
    let filter = MatrixFilter {
        query: query_from(rest),
        kind,
        status: None,
    };

    let total = context.manager.matrix(&MatrixFilter::default()).len();
    let entries = context.manager.matrix(&filter);
    if entries.is_empty() && total > 0 {
        return Err(CommandError::InvalidArguments(format!(
            "no entries match `{}`",
            args.join(" ")
        )));
    }

    output::section("Finance matrix");
    for entry in &entries {
        output::info(format!(
            "  {:<8} {:<28} {} {:<8} {:<10} {}",
            entry.kind.label(),
            entry.name,
            money(entry.amount, context.currency()),
            entry.frequency,
            entry.status,
            entry.category
        ));
    }
    output::info(format!("Showing {} of {} entries", entries.len(), total));
    Ok(())
}
