//! Terminal tables for the report commands.

use analytics::{
    AccountGoalProgress, AccountMetrics, Alert, DailyResult, DashboardSummary, EvolutionPoint,
    GoalForecast, GoalSummary, Insight, PerformanceMetrics, PeriodBucket, StreakStats,
    WithdrawalSummary,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{find_account, Account, DailyLogEntry, Withdrawal};
use rust_decimal::{Decimal, RoundingStrategy};

/// Label shown for records whose account no longer exists.
pub const MISSING_ACCOUNT: &str = "N/A";

pub fn account_label<'a>(accounts: &'a [Account], account_id: &str) -> &'a str {
    find_account(accounts, account_id).map_or(MISSING_ACCOUNT, |a| a.name.as_str())
}

pub fn money(value: Decimal) -> String {
    format!("{:.2}", rounded(value, 2))
}

pub fn percent(value: Decimal) -> String {
    format!("{:.1}%", rounded(value, 1))
}

fn rounded(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn amount_cell(value: Decimal) -> Cell {
    Cell::new(money(value)).set_alignment(CellAlignment::Right)
}

fn key_values(rows: Vec<(&str, String)>) -> Table {
    let mut table = table(vec!["Metric", "Value"]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value).set_alignment(CellAlignment::Right)]);
    }
    table
}

pub fn performance(perf: &PerformanceMetrics, streaks: &StreakStats) -> Table {
    key_values(vec![
        ("Total profit (net)", money(perf.total_profit)),
        ("Total withdrawn (gross)", money(perf.total_gross)),
        ("Profit per account", money(perf.profit_per_account)),
        ("Daily average", money(perf.daily_average)),
        ("Weekly average", money(perf.weekly_average)),
        ("Monthly average", money(perf.monthly_average)),
        ("Days since start", perf.days_since_start.to_string()),
        ("Longest win streak", streaks.max_win_streak.to_string()),
        ("Longest loss streak", streaks.max_loss_streak.to_string()),
        ("Current win streak", streaks.current_win_streak.to_string()),
        ("Current loss streak", streaks.current_loss_streak.to_string()),
    ])
}

pub fn daily_results(results: &[DailyResult]) -> Table {
    let mut table = table(vec!["Date", "Result"]);
    for result in results {
        table.add_row(vec![Cell::new(result.date), amount_cell(result.total)]);
    }
    table
}

pub fn insights(insights: &[Insight]) -> Table {
    let mut table = table(vec!["Level", "Insight"]);
    for insight in insights {
        table.add_row(vec![format!("{:?}", insight.level), insight.message.clone()]);
    }
    table
}

pub fn account(name: &str, metrics: &AccountMetrics, balance: Decimal, goal: &GoalSummary) -> Table {
    key_values(vec![
        ("Account", name.to_string()),
        ("Logged days", metrics.total_days.to_string()),
        ("Total result", money(metrics.total_amount)),
        ("Average per day", money(metrics.average_per_day)),
        ("Positive days", metrics.positive_days.to_string()),
        ("Negative days", metrics.negative_days.to_string()),
        ("Average win", money(metrics.avg_positive)),
        ("Average loss", money(metrics.avg_negative)),
        ("Win rate", percent(metrics.win_rate)),
        ("Available balance", money(balance)),
        ("Goal", money(goal.target_amount)),
        ("Goal progress", percent(goal.progress)),
        ("Remaining", money(goal.remaining)),
    ])
}

pub fn forecast(forecast: &GoalForecast) -> Table {
    let summary = &forecast.summary;
    key_values(vec![
        ("Withdrawn (net)", money(summary.total_result)),
        ("Goal", money(summary.target_amount)),
        ("Progress", percent(summary.progress)),
        ("Remaining", money(summary.remaining)),
        ("Daily rate", money(forecast.daily_rate)),
        (
            "Days remaining",
            forecast.days_remaining.map_or_else(|| "-".to_string(), |d| d.to_string()),
        ),
        (
            "Estimated completion",
            forecast
                .estimated_completion
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
        ),
    ])
}

pub fn goal_progress(progress: &[AccountGoalProgress]) -> Table {
    let mut table = table(vec!["Account", "Result", "Goal", "Progress", "Remaining", "Met"]);
    for p in progress {
        table.add_row(vec![
            Cell::new(&p.account_name),
            amount_cell(p.summary.total_result),
            amount_cell(p.summary.target_amount),
            Cell::new(percent(p.summary.progress)).set_alignment(CellAlignment::Right),
            amount_cell(p.summary.remaining),
            Cell::new(if p.summary.is_goal_met { "yes" } else { "no" }),
        ]);
    }
    table
}

pub fn withdrawals(summary: &WithdrawalSummary, withdrawals: &[Withdrawal], accounts: &[Account]) -> Table {
    let mut table = table(vec!["Date", "Account", "Gross", "Tax", "Net"]);
    for w in withdrawals {
        table.add_row(vec![
            Cell::new(w.date.format("%Y-%m-%d")),
            Cell::new(account_label(accounts, &w.account_id)),
            amount_cell(w.gross_amount),
            amount_cell(w.tax_amount),
            amount_cell(w.net_amount),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(format!("{} withdrawals", summary.count)),
        amount_cell(summary.total_gross),
        amount_cell(summary.total_tax),
        amount_cell(summary.total_net),
    ]);
    table
}

pub fn monthly_withdrawals(summary: &WithdrawalSummary) -> Table {
    let mut table = table(vec!["Month", "Gross", "Net"]);
    for month in &summary.monthly {
        table.add_row(vec![
            Cell::new(month.month.format("%Y-%m")),
            amount_cell(month.gross),
            amount_cell(month.net),
        ]);
    }
    table
}

pub fn evolution(points: &[EvolutionPoint]) -> Table {
    let mut table = table(vec!["Date", "Cumulative"]);
    for point in points {
        table.add_row(vec![Cell::new(&point.display_date), amount_cell(point.cumulative_value)]);
    }
    table
}

pub fn dashboard(summary: &DashboardSummary) -> Table {
    key_values(vec![
        ("Real accounts", summary.real_accounts.to_string()),
        ("Demo accounts", summary.demo_accounts.to_string()),
        ("Total withdrawn", money(summary.total_withdrawn)),
        ("Total available", money(summary.total_available)),
    ])
}

pub fn alerts(alerts: &[Alert]) -> Table {
    let mut table = table(vec!["Level", "Alert"]);
    for alert in alerts {
        table.add_row(vec![format!("{:?}", alert.level), alert.message.clone()]);
    }
    table
}

pub fn journal(logs: &[DailyLogEntry], accounts: &[Account]) -> Table {
    let mut table = table(vec!["Date", "Account", "Result"]);
    for log in logs {
        table.add_row(vec![
            Cell::new(log.date),
            Cell::new(account_label(accounts, &log.account_id)),
            amount_cell(log.amount),
        ]);
    }
    table
}

pub fn buckets(buckets: &[PeriodBucket]) -> Table {
    let mut table = table(vec!["Period start", "Days", "Result"]);
    for bucket in buckets {
        table.add_row(vec![
            Cell::new(bucket.start),
            Cell::new(bucket.count),
            amount_cell(bucket.total),
        ]);
    }
    table
}
