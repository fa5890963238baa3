use chrono::{NaiveDate, Weekday};
use core_types::DailyLogEntry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-account results derived from the daily journal.
///
/// `total_amount == positive_sum + negative_sum`; flat days count towards
/// `total_days` but towards neither side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountMetrics {
    pub account_id: String,
    pub total_days: usize,
    pub total_amount: Decimal,
    pub average_per_day: Decimal,
    pub positive_days: usize,
    pub negative_days: usize,
    pub positive_sum: Decimal,
    pub negative_sum: Decimal,
    pub avg_positive: Decimal,
    /// Mean of the losing days, so zero or negative.
    pub avg_negative: Decimal,
    /// Percentage of logged days that were positive, 0 to 100.
    pub win_rate: Decimal,
    /// The account's entries, in input order.
    pub logs: Vec<DailyLogEntry>,
}

/// Journal-wide performance, driven by what was actually withdrawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Sum of withdrawal net amounts.
    pub total_profit: Decimal,
    /// Sum of withdrawal gross amounts.
    pub total_gross: Decimal,
    pub profit_per_account: Decimal,
    pub daily_average: Decimal,
    /// `daily_average * 7`
    pub weekly_average: Decimal,
    /// `daily_average * 30`, not calendar accurate.
    pub monthly_average: Decimal,
    /// Whole days since the first logged day, never below 1.
    pub days_since_start: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    pub max_win_streak: usize,
    pub max_loss_streak: usize,
    /// Streaks in effect after the most recent day.
    pub current_win_streak: usize,
    pub current_loss_streak: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub total_result: Decimal,
    pub target_amount: Decimal,
    /// Never negative.
    pub remaining: Decimal,
    /// Clamped to 0..=100.
    pub progress: Decimal,
    pub is_goal_met: bool,
}

/// Projection of when the global goal will be reached at the current pace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalForecast {
    pub summary: GoalSummary,
    pub days_since_start: i64,
    /// Net amount withdrawn per day since the first log.
    pub daily_rate: Decimal,
    /// `None` while nothing has been withdrawn yet.
    pub days_remaining: Option<i64>,
    pub estimated_completion: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountGoalProgress {
    pub account_id: String,
    pub account_name: String,
    pub summary: GoalSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgressReport {
    pub accounts: Vec<AccountGoalProgress>,
    /// Accounts at 100% progress.
    pub completed: usize,
    /// Accounts strictly between 0% and 100%.
    pub in_progress: usize,
}

/// One point of the cumulative result chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub date: NaiveDate,
    /// `dd/mm`
    pub display_date: String,
    pub cumulative_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightLevel {
    Positive,
    Info,
}

/// What an insight is about, with the figure it cites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum InsightTopic {
    BestWeekday { weekday: Weekday, average: Decimal },
    WinRate { win_rate: Decimal },
    Asymmetry { difference_pct: Decimal },
    WinStreak { length: usize },
    Consistency { recent_logs: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub level: InsightLevel,
    #[serde(flatten)]
    pub topic: InsightTopic,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Warning,
    Info,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum AlertTopic {
    GoalMet,
    NearGoal { remaining: Decimal },
    RecentWithdrawal { days_ago: i64 },
    AllClear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    #[serde(flatten)]
    pub topic: AlertTopic,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyWithdrawals {
    /// First day of the month.
    pub month: NaiveDate,
    pub gross: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalSummary {
    /// `None` when every account is included.
    pub account_id: Option<String>,
    pub count: usize,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub total_tax: Decimal,
    /// Net withdrawn as a percentage of the global goal. Not clamped.
    pub goal_progress: Decimal,
    /// Chronological.
    pub monthly: Vec<MonthlyWithdrawals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub real_accounts: usize,
    pub demo_accounts: usize,
    /// Sum of withdrawal net amounts.
    pub total_withdrawn: Decimal,
    /// Sum of the positive available balances of real accounts.
    pub total_available: Decimal,
}
