use crate::error::AnalyticsError;
use crate::report::{AccountMetrics, EvolutionPoint, PerformanceMetrics, StreakStats};
use chrono::{DateTime, NaiveDate, Utc};
use configuration::{AlertSettings, InsightSettings};
use core_types::{Account, DailyLogEntry, Outcome, Withdrawal};
use rust_decimal::Decimal;

/// A stateless calculator for deriving journal metrics from a snapshot of records.
///
/// The engine never reads the wall clock: every "days ago" computation is
/// relative to `as_of`, so the same inputs always produce the same outputs.
/// Input collections are borrowed and never mutated.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    as_of: DateTime<Utc>,
    insights: InsightSettings,
    alerts: AlertSettings,
}

impl MetricsEngine {
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            insights: InsightSettings::default(),
            alerts: AlertSettings::default(),
        }
    }

    /// An engine evaluated at midnight UTC of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// Builds an engine with custom insight and alert thresholds.
    pub fn with_settings(
        as_of: DateTime<Utc>,
        insights: InsightSettings,
        alerts: AlertSettings,
    ) -> Result<Self, AnalyticsError> {
        if insights.win_rate_threshold_pct < Decimal::ZERO
            || insights.win_rate_threshold_pct > Decimal::ONE_HUNDRED
        {
            return Err(AnalyticsError::InvalidSettings(format!(
                "win rate threshold must be between 0 and 100, got {}",
                insights.win_rate_threshold_pct
            )));
        }
        if insights.consistency_window_days <= 0 {
            return Err(AnalyticsError::InvalidSettings(format!(
                "consistency window must be positive, got {} days",
                insights.consistency_window_days
            )));
        }
        if alerts.recent_withdrawal_days < 0 {
            return Err(AnalyticsError::InvalidSettings(format!(
                "recent withdrawal window must not be negative, got {} days",
                alerts.recent_withdrawal_days
            )));
        }

        Ok(Self {
            as_of,
            insights,
            alerts,
        })
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    pub fn today(&self) -> NaiveDate {
        self.as_of.date_naive()
    }

    pub(crate) fn insight_settings(&self) -> &InsightSettings {
        &self.insights
    }

    pub(crate) fn alert_settings(&self) -> &AlertSettings {
        &self.alerts
    }

    /// Whole calendar days between `date` and today. Negative for future dates.
    pub fn days_since(&self, date: NaiveDate) -> i64 {
        (self.today() - date).num_days()
    }

    /// Whole days elapsed since `timestamp`, truncated toward zero.
    pub fn days_since_timestamp(&self, timestamp: DateTime<Utc>) -> i64 {
        (self.as_of - timestamp).num_days()
    }

    /// Calculates the journal statistics of one account.
    ///
    /// Entries referencing other accounts are ignored. An account without
    /// entries produces an all-zero result rather than an error.
    pub fn account_metrics(&self, account_id: &str, logs: &[DailyLogEntry]) -> AccountMetrics {
        let account_logs: Vec<DailyLogEntry> = logs
            .iter()
            .filter(|l| l.account_id == account_id)
            .cloned()
            .collect();

        let total_days = account_logs.len();
        let total_amount: Decimal = account_logs.iter().map(|l| l.amount).sum();

        let mut positive_days = 0;
        let mut negative_days = 0;
        let mut positive_sum = Decimal::ZERO;
        let mut negative_sum = Decimal::ZERO;

        for entry in &account_logs {
            match entry.outcome() {
                Some(Outcome::Positive) => {
                    positive_days += 1;
                    positive_sum += entry.amount;
                }
                Some(Outcome::Negative) => {
                    negative_days += 1;
                    negative_sum += entry.amount;
                }
                None => {}
            }
        }

        let metrics = AccountMetrics {
            account_id: account_id.to_string(),
            total_days,
            total_amount,
            average_per_day: mean(total_amount, total_days),
            positive_days,
            negative_days,
            positive_sum,
            negative_sum,
            avg_positive: mean(positive_sum, positive_days),
            avg_negative: mean(negative_sum, negative_days),
            win_rate: percentage(positive_days, total_days),
            logs: account_logs,
        };

        tracing::debug!(
            account_id,
            total_days,
            total_amount = %metrics.total_amount,
            win_rate = %metrics.win_rate,
            "Calculated account metrics."
        );

        metrics
    }

    /// Calculates the journal-wide performance figures.
    ///
    /// Profit is what was actually withdrawn (net), averaged over the days
    /// elapsed since the first logged day.
    #[tracing::instrument(
        name = "performance_metrics",
        skip_all,
        fields(accounts = accounts.len(), logs = logs.len(), withdrawals = withdrawals.len())
    )]
    pub fn performance_metrics(
        &self,
        accounts: &[Account],
        logs: &[DailyLogEntry],
        withdrawals: &[Withdrawal],
    ) -> PerformanceMetrics {
        let total_profit: Decimal = withdrawals.iter().map(|w| w.net_amount).sum();
        let total_gross: Decimal = withdrawals.iter().map(|w| w.gross_amount).sum();

        let profit_per_account = if accounts.is_empty() {
            Decimal::ZERO
        } else {
            total_profit / Decimal::from(accounts.len())
        };

        let days_since_start = self.days_since_start(logs);
        let daily_average = total_profit / Decimal::from(days_since_start);

        tracing::debug!(
            %total_profit,
            days_since_start,
            %daily_average,
            "Calculated performance metrics."
        );

        PerformanceMetrics {
            total_profit,
            total_gross,
            profit_per_account,
            daily_average,
            weekly_average: daily_average.saturating_mul(Decimal::from(7)),
            monthly_average: daily_average.saturating_mul(Decimal::from(30)),
            days_since_start,
        }
    }

    /// Whole days since the earliest logged day, floored at 1 so that the
    /// first day counts as a full day. With no logs this is 1.
    pub fn days_since_start(&self, logs: &[DailyLogEntry]) -> i64 {
        logs.iter()
            .map(|l| l.date)
            .min()
            .map_or(1, |first| self.days_since(first).max(1))
    }

    /// Walks the journal chronologically tracking win and loss streaks.
    ///
    /// Flat days neither extend nor break a streak.
    pub fn streaks(&self, logs: &[DailyLogEntry]) -> StreakStats {
        let mut stats = StreakStats::default();

        for entry in chronological(logs) {
            match entry.outcome() {
                Some(Outcome::Positive) => {
                    stats.current_win_streak += 1;
                    stats.current_loss_streak = 0;
                    stats.max_win_streak = stats.max_win_streak.max(stats.current_win_streak);
                }
                Some(Outcome::Negative) => {
                    stats.current_loss_streak += 1;
                    stats.current_win_streak = 0;
                    stats.max_loss_streak = stats.max_loss_streak.max(stats.current_loss_streak);
                }
                None => {}
            }
        }

        stats
    }

    /// The running total of the journal over the last `days` days.
    ///
    /// Entries at most `days` whole days old are kept (future-dated entries
    /// included) and accumulated in date order. The series is computed lazily
    /// from a sorted view of `logs`; clone it or call again to restart.
    pub fn evolution<'a>(&self, logs: &'a [DailyLogEntry], days: i64) -> EvolutionSeries<'a> {
        let retained: Vec<&DailyLogEntry> = chronological(logs)
            .into_iter()
            .filter(|l| self.days_since(l.date) <= days)
            .collect();

        EvolutionSeries {
            entries: retained.into_iter(),
            accumulated: Decimal::ZERO,
        }
    }
}

/// Cumulative result series produced by [`MetricsEngine::evolution`].
#[derive(Debug, Clone)]
pub struct EvolutionSeries<'a> {
    entries: std::vec::IntoIter<&'a DailyLogEntry>,
    accumulated: Decimal,
}

impl Iterator for EvolutionSeries<'_> {
    type Item = EvolutionPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        self.accumulated += entry.amount;

        Some(EvolutionPoint {
            date: entry.date,
            display_date: entry.date.format("%d/%m").to_string(),
            cumulative_value: self.accumulated,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for EvolutionSeries<'_> {}

/// Entries sorted by date; entries sharing a date keep their input order.
pub(crate) fn chronological(logs: &[DailyLogEntry]) -> Vec<&DailyLogEntry> {
    let mut sorted: Vec<&DailyLogEntry> = logs.iter().collect();
    sorted.sort_by_key(|l| l.date);
    sorted
}

pub(crate) fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub(crate) fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED
    }
}

/// `part / whole * 100`, saturating at the Decimal bounds when the result
/// does not fit. `whole` must not be zero.
pub(crate) fn ratio_pct(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() == whole.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_types::{AccountPhase, AccountType};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(id: &str, account: &str, d: NaiveDate, amount: Decimal) -> DailyLogEntry {
        DailyLogEntry::new(id, account, d, amount)
    }

    fn sample_logs() -> Vec<DailyLogEntry> {
        vec![
            log("1", "A", date(2024, 1, 1), dec!(500)),
            log("2", "A", date(2024, 1, 2), dec!(-200)),
            log("3", "A", date(2024, 1, 3), dec!(300)),
        ]
    }

    #[test]
    fn account_metrics_for_sample_journal() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        let metrics = engine.account_metrics("A", &sample_logs());

        assert_eq!(metrics.total_days, 3);
        assert_eq!(metrics.total_amount, dec!(600));
        assert_eq!(metrics.average_per_day, dec!(200));
        assert_eq!(metrics.positive_days, 2);
        assert_eq!(metrics.negative_days, 1);
        assert_eq!(metrics.win_rate.round_dp(2), dec!(66.67));
        assert_eq!(metrics.avg_positive, dec!(400));
        assert_eq!(metrics.avg_negative, dec!(-200));
        assert_eq!(metrics.logs.len(), 3);
    }

    #[test]
    fn account_metrics_ignores_other_accounts_and_flat_days() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        let mut logs = sample_logs();
        logs.push(log("4", "B", date(2024, 1, 4), dec!(1000)));
        logs.push(log("5", "A", date(2024, 1, 5), dec!(0)));

        let metrics = engine.account_metrics("A", &logs);

        assert_eq!(metrics.total_days, 4);
        assert_eq!(metrics.positive_days + metrics.negative_days, 3);
        assert_eq!(metrics.total_amount, metrics.positive_sum + metrics.negative_sum);
        assert_eq!(metrics.win_rate, dec!(50));
        assert_eq!(
            metrics.logs.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "2", "3", "5"]
        );
    }

    #[test]
    fn account_metrics_for_unknown_account_is_zeroed() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        let metrics = engine.account_metrics("missing", &sample_logs());

        assert_eq!(metrics.total_days, 0);
        assert_eq!(metrics.average_per_day, Decimal::ZERO);
        assert_eq!(metrics.avg_positive, Decimal::ZERO);
        assert_eq!(metrics.avg_negative, Decimal::ZERO);
        assert_eq!(metrics.win_rate, Decimal::ZERO);
    }

    #[test]
    fn performance_without_accounts_or_logs() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        let withdrawal = Withdrawal::new(
            "w1",
            "gone",
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
            dec!(500),
            dec!(0),
        )
        .unwrap();

        let metrics = engine.performance_metrics(&[], &[], &[withdrawal]);

        assert_eq!(metrics.total_profit, dec!(500));
        assert_eq!(metrics.profit_per_account, Decimal::ZERO);
        assert_eq!(metrics.days_since_start, 1);
        assert_eq!(metrics.daily_average, dec!(500));
    }

    #[test]
    fn performance_of_empty_journal_is_zero() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        let metrics = engine.performance_metrics(&[], &[], &[]);

        assert_eq!(metrics.days_since_start, 1);
        assert_eq!(metrics.daily_average, Decimal::ZERO);
        assert_eq!(metrics.monthly_average, Decimal::ZERO);
    }

    #[test]
    fn performance_averages_over_elapsed_days() {
        let engine = MetricsEngine::on(date(2024, 1, 11));
        let accounts = vec![
            Account::new("A", "1", "Alpha", AccountType::Real, AccountPhase::One),
            Account::new("B", "2", "Beta", AccountType::Demo, AccountPhase::Two),
        ];
        let withdrawals = vec![
            Withdrawal::new("w1", "A", Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(), dec!(1250), dec!(20))
                .unwrap(),
        ];

        let metrics = engine.performance_metrics(&accounts, &sample_logs(), &withdrawals);

        assert_eq!(metrics.total_gross, dec!(1250));
        assert_eq!(metrics.total_profit, dec!(1000));
        assert_eq!(metrics.profit_per_account, dec!(500));
        assert_eq!(metrics.days_since_start, 10);
        assert_eq!(metrics.daily_average, dec!(100));
        assert_eq!(metrics.weekly_average, dec!(700));
        assert_eq!(metrics.monthly_average, dec!(3000));
    }

    #[test]
    fn streaks_for_sample_journal() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        let stats = engine.streaks(&sample_logs());

        assert_eq!(
            stats,
            StreakStats {
                max_win_streak: 1,
                max_loss_streak: 1,
                current_win_streak: 1,
                current_loss_streak: 0,
            }
        );
    }

    #[test]
    fn streaks_sort_by_date_and_skip_flat_days() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        let logs = vec![
            log("4", "A", date(2024, 1, 4), dec!(10)),
            log("1", "A", date(2024, 1, 1), dec!(-10)),
            log("3", "A", date(2024, 1, 3), dec!(0)),
            log("2", "A", date(2024, 1, 2), dec!(10)),
            log("5", "A", date(2024, 1, 5), dec!(10)),
        ];

        let stats = engine.streaks(&logs);

        assert_eq!(stats.max_win_streak, 3);
        assert_eq!(stats.max_loss_streak, 1);
        assert_eq!(stats.current_win_streak, 3);
        assert_eq!(stats.current_loss_streak, 0);
    }

    #[test]
    fn streaks_of_empty_journal() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        assert_eq!(engine.streaks(&[]), StreakStats::default());
    }

    #[test]
    fn evolution_accumulates_within_window() {
        let engine = MetricsEngine::on(date(2024, 2, 1));
        let logs = vec![
            log("3", "A", date(2024, 1, 30), dec!(50)),
            log("1", "A", date(2023, 12, 1), dec!(999)),
            log("2", "B", date(2024, 1, 2), dec!(-20)),
            log("4", "A", date(2024, 1, 2), dec!(100)),
        ];

        let points: Vec<_> = engine.evolution(&logs, 30).collect();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].display_date, "02/01");
        assert_eq!(points[0].cumulative_value, dec!(-20));
        assert_eq!(points[1].cumulative_value, dec!(80));
        assert_eq!(points[2].date, date(2024, 1, 30));
        assert_eq!(points[2].cumulative_value, dec!(130));
    }

    #[test]
    fn evolution_can_be_restarted() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        let logs = sample_logs();
        let series = engine.evolution(&logs, 30);

        assert_eq!(series.len(), 3);
        let first: Vec<_> = series.clone().collect();
        let second: Vec<_> = series.collect();
        assert_eq!(first, second);
        assert_eq!(first.last().unwrap().cumulative_value, dec!(600));
    }

    #[test]
    fn ratio_pct_saturates_instead_of_overflowing() {
        let huge = dec!(1000000000000000000000000000);
        assert_eq!(ratio_pct(huge, dec!(0.01)), Decimal::MAX);
        assert_eq!(ratio_pct(-huge, dec!(0.01)), Decimal::MIN);
        assert_eq!(ratio_pct(dec!(1), dec!(4)), dec!(25));
    }

    #[test]
    fn huge_profit_saturates_period_averages() {
        let engine = MetricsEngine::on(date(2024, 1, 10));
        let withdrawal = Withdrawal::new(
            "w1",
            "A",
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
            dec!(70000000000000000000000000000),
            dec!(0),
        )
        .unwrap();

        let metrics = engine.performance_metrics(&[], &[], &[withdrawal]);

        assert_eq!(metrics.daily_average, dec!(70000000000000000000000000000));
        assert_eq!(metrics.monthly_average, Decimal::MAX);
    }

    #[test]
    fn with_settings_rejects_bad_thresholds() {
        let insights = InsightSettings {
            win_rate_threshold_pct: dec!(120),
            ..InsightSettings::default()
        };
        let result = MetricsEngine::with_settings(Utc::now(), insights, AlertSettings::default());
        assert!(matches!(result, Err(AnalyticsError::InvalidSettings(_))));
    }
}
