//! # Tableflow Analytics Engine
//!
//! This crate derives every figure the trading journal reports from a snapshot
//! of its records: per-account statistics, withdrawal-driven performance,
//! win/loss streaks, goal progress, the cumulative evolution chart and a small
//! set of heuristic insights and dashboard alerts.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage or
//!   presentation. It depends only on `core-types` (Layer 0) and the threshold
//!   settings of `configuration`.
//! - **Stateless Calculation:** The `MetricsEngine` holds nothing but its reference
//!   instant and thresholds. It borrows the records, never mutates them, and never
//!   reads the wall clock, so identical inputs always give identical reports.
//!
//! ## Public API
//!
//! - `MetricsEngine`: The calculator. Its operations are split across the modules
//!   below by report family.
//! - `report`: The serializable output types.
//! - `AnalyticsError`: Returned only when building an engine with invalid settings.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod goals;
pub mod grouping;
pub mod insights;
pub mod ledger;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{EvolutionSeries, MetricsEngine};
pub use error::AnalyticsError;
pub use grouping::{DailyResult, LogFilter, Period, PeriodBucket};
pub use report::{
    AccountGoalProgress, AccountMetrics, Alert, AlertLevel, AlertTopic, DashboardSummary,
    EvolutionPoint, GoalForecast, GoalProgressReport, GoalSummary, Insight, InsightLevel,
    InsightTopic, MonthlyWithdrawals, PerformanceMetrics, StreakStats, WithdrawalSummary,
};
