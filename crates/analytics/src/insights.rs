use crate::engine::{mean, percentage, ratio_pct, MetricsEngine};
use crate::report::{Alert, AlertLevel, AlertTopic, Insight, InsightLevel, InsightTopic};
use chrono::{Datelike, Weekday};
use core_types::{Account, DailyLogEntry, Goal, Outcome, Withdrawal};
use rust_decimal::{Decimal, RoundingStrategy};

impl MetricsEngine {
    /// Heuristic observations about the journal.
    ///
    /// Every rule is evaluated independently and all matching rules are
    /// reported, in this order: best weekday, win rate, win/loss asymmetry,
    /// win streak, consistency. The list may be empty.
    #[tracing::instrument(name = "generate_insights", skip_all, fields(logs = logs.len()))]
    pub fn insights(&self, logs: &[DailyLogEntry]) -> Vec<Insight> {
        let settings = self.insight_settings();
        let mut insights = Vec::new();

        if let Some((weekday, average)) = best_weekday(logs).filter(|(_, avg)| *avg > Decimal::ZERO) {
            insights.push(Insight {
                level: InsightLevel::Positive,
                topic: InsightTopic::BestWeekday { weekday, average },
                message: format!("You trade best on {}s.", weekday_name(weekday)),
            });
        }

        let wins = logs.iter().filter(|l| l.outcome() == Some(Outcome::Positive));
        let losses = logs.iter().filter(|l| l.outcome() == Some(Outcome::Negative));
        let (win_count, win_sum) = wins.fold((0, Decimal::ZERO), |(n, s), l| (n + 1, s + l.amount));
        let (loss_count, loss_sum) = losses.fold((0, Decimal::ZERO), |(n, s), l| (n + 1, s + l.amount));

        let win_rate = percentage(win_count, logs.len());
        if win_rate > settings.win_rate_threshold_pct {
            insights.push(Insight {
                level: InsightLevel::Positive,
                topic: InsightTopic::WinRate { win_rate },
                message: format!("Excellent win rate of {}%!", display(win_rate, 1)),
            });
        }

        if win_count > 0 && loss_count > 0 {
            let avg_win = mean(win_sum, win_count);
            let avg_loss = mean(loss_sum, loss_count).abs();

            if avg_win > avg_loss {
                let difference_pct = ratio_pct(avg_win - avg_loss, avg_loss);
                insights.push(Insight {
                    level: InsightLevel::Positive,
                    topic: InsightTopic::Asymmetry { difference_pct },
                    message: format!(
                        "Your average winning day is {}% larger than your average losing day.",
                        display(difference_pct, 0)
                    ),
                });
            }
        }

        let streaks = self.streaks(logs);
        if streaks.max_win_streak >= settings.min_win_streak {
            insights.push(Insight {
                level: InsightLevel::Info,
                topic: InsightTopic::WinStreak {
                    length: streaks.max_win_streak,
                },
                message: format!(
                    "Your longest winning streak was {} days!",
                    streaks.max_win_streak
                ),
            });
        }

        let recent_logs = logs
            .iter()
            .filter(|l| self.days_since(l.date) <= settings.consistency_window_days)
            .count();
        if recent_logs >= settings.consistency_min_logs {
            insights.push(Insight {
                level: InsightLevel::Positive,
                topic: InsightTopic::Consistency { recent_logs },
                message: "Your trading consistency is excellent!".to_string(),
            });
        }

        tracing::debug!(count = insights.len(), "Generated insights.");
        insights
    }

    /// Dashboard alerts derived from the global goal and the latest withdrawal.
    ///
    /// Always returns at least one alert; when nothing noteworthy happened it
    /// is a single neutral one.
    pub fn alerts(&self, goal: &Goal, accounts: &[Account], withdrawals: &[Withdrawal]) -> Vec<Alert> {
        let settings = self.alert_settings();
        let summary = self.global_goal_summary(goal, accounts, withdrawals, None);
        let mut alerts = Vec::new();

        if summary.is_goal_met {
            alerts.push(Alert {
                level: AlertLevel::Success,
                topic: AlertTopic::GoalMet,
                message: "Global goal reached!".to_string(),
            });
        } else if summary.remaining > Decimal::ZERO && summary.remaining < settings.near_goal_threshold {
            alerts.push(Alert {
                level: AlertLevel::Warning,
                topic: AlertTopic::NearGoal {
                    remaining: summary.remaining,
                },
                message: "Almost there, the goal is within reach!".to_string(),
            });
        }

        // The most recently registered withdrawal is the last one stored.
        if let Some(last) = withdrawals.last() {
            let days_ago = self.days_since_timestamp(last.date);
            if days_ago < settings.recent_withdrawal_days {
                alerts.push(Alert {
                    level: AlertLevel::Info,
                    topic: AlertTopic::RecentWithdrawal { days_ago },
                    message: "Recent withdrawal registered.".to_string(),
                });
            }
        }

        if alerts.is_empty() {
            alerts.push(Alert {
                level: AlertLevel::Neutral,
                topic: AlertTopic::AllClear,
                message: "All quiet around here.".to_string(),
            });
        }

        alerts
    }
}

/// The weekday with the highest mean result. Ties go to the weekday that
/// appears first in the journal.
fn best_weekday(logs: &[DailyLogEntry]) -> Option<(Weekday, Decimal)> {
    let mut per_weekday: Vec<(Weekday, Decimal, usize)> = Vec::new();

    for entry in logs {
        let weekday = entry.date.weekday();
        match per_weekday.iter_mut().find(|(w, _, _)| *w == weekday) {
            Some((_, total, count)) => {
                *total += entry.amount;
                *count += 1;
            }
            None => per_weekday.push((weekday, entry.amount, 1)),
        }
    }

    let mut best: Option<(Weekday, Decimal)> = None;
    for (weekday, total, count) in per_weekday {
        let average = mean(total, count);
        if best.is_none_or(|(_, best_avg)| average > best_avg) {
            best = Some((weekday, average));
        }
    }
    best
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn display(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
