use core_types::Goal;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; omitted sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub goal: GoalDefaults,
    #[serde(default)]
    pub reports: ReportSettings,
    #[serde(default)]
    pub insights: InsightSettings,
    #[serde(default)]
    pub alerts: AlertSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// The global goal assumed when a stored snapshot carries none.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoalDefaults {
    pub name: String,
    pub amount: Decimal,
}

impl GoalDefaults {
    pub fn to_goal(&self) -> Goal {
        Goal {
            name: self.name.clone(),
            amount: self.amount,
        }
    }
}

/// Parameters for the chart-oriented reports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Lookback window of the cumulative evolution series, in days.
    pub evolution_days: i64,
    /// How many day buckets the journal results chart shows.
    pub daily_results_limit: usize,
}

/// Thresholds of the automatic insights.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InsightSettings {
    /// Win rate (percent) that must be exceeded to praise it.
    pub win_rate_threshold_pct: Decimal,
    /// Longest win streak needed for the streak insight.
    pub min_win_streak: usize,
    /// Window, in days, used by the consistency insight.
    pub consistency_window_days: i64,
    /// Logged days within the window needed for the consistency insight.
    pub consistency_min_logs: usize,
}

/// Thresholds of the dashboard alerts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Remaining amount under which the goal counts as "almost there".
    pub near_goal_threshold: Decimal,
    /// A withdrawal younger than this many whole days counts as recent.
    pub recent_withdrawal_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. `info` or `analytics=debug`.
    pub filter: String,
    /// When set, logs are also appended to this file.
    pub file: Option<PathBuf>,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for GoalDefaults {
    fn default() -> Self {
        let goal = Goal::default();
        Self {
            name: goal.name,
            amount: goal.amount,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            evolution_days: 30,
            daily_results_limit: 15,
        }
    }
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            win_rate_threshold_pct: dec!(60),
            min_win_streak: 5,
            consistency_window_days: 30,
            consistency_min_logs: 20,
        }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            near_goal_threshold: dec!(1000),
            recent_withdrawal_days: 3,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}
