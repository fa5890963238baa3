use crate::engine::{ratio_pct, MetricsEngine};
use crate::report::{AccountGoalProgress, GoalForecast, GoalProgressReport, GoalSummary};
use chrono::Days;
use core_types::{find_account, Account, DailyLogEntry, Goal, Withdrawal};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

// Two goal summaries exist on purpose. The account summary measures the
// operational result logged for an account, the global one measures money
// actually withdrawn. They are kept separate rather than merged behind one
// overloaded entry point.

impl MetricsEngine {
    /// Progress of one account's logged results towards its goal.
    ///
    /// The target is the account's own goal when it defines one, otherwise
    /// the global goal. A dangling account id simply uses the global goal.
    pub fn account_goal_summary(
        &self,
        account_id: &str,
        goal: &Goal,
        accounts: &[Account],
        logs: &[DailyLogEntry],
    ) -> GoalSummary {
        let total_result: Decimal = logs
            .iter()
            .filter(|l| l.account_id == account_id)
            .map(|l| l.amount)
            .sum();

        summarize(total_result, resolve_target(goal, accounts, Some(account_id)))
    }

    /// Progress of withdrawn money (net) towards the goal.
    ///
    /// Without an account every withdrawal counts against the global goal.
    /// With one, only that account's withdrawals count and its goal override
    /// applies.
    pub fn global_goal_summary(
        &self,
        goal: &Goal,
        accounts: &[Account],
        withdrawals: &[Withdrawal],
        account_id: Option<&str>,
    ) -> GoalSummary {
        let total_result: Decimal = withdrawals
            .iter()
            .filter(|w| account_id.is_none_or(|id| w.account_id == id))
            .map(|w| w.net_amount)
            .sum();

        summarize(total_result, resolve_target(goal, accounts, account_id))
    }

    /// Projects the completion date of the global goal from the average net
    /// withdrawn per day since the first log.
    pub fn goal_forecast(
        &self,
        goal: &Goal,
        logs: &[DailyLogEntry],
        withdrawals: &[Withdrawal],
    ) -> GoalForecast {
        let summary = self.global_goal_summary(goal, &[], withdrawals, None);
        let days_since_start = self.days_since_start(logs);
        let daily_rate = summary.total_result / Decimal::from(days_since_start);

        let days_remaining = if daily_rate > Decimal::ZERO {
            summary
                .remaining
                .checked_div(daily_rate)
                .and_then(|days| days.ceil().to_i64())
        } else {
            None
        };
        let estimated_completion = days_remaining
            .and_then(|days| u64::try_from(days).ok())
            .and_then(|days| self.today().checked_add_days(Days::new(days)));

        tracing::debug!(
            %daily_rate,
            ?days_remaining,
            ?estimated_completion,
            "Calculated goal forecast."
        );

        GoalForecast {
            summary,
            days_since_start,
            daily_rate,
            days_remaining,
            estimated_completion,
        }
    }

    /// Goal progress of every account, in input order.
    pub fn account_goal_progress(
        &self,
        goal: &Goal,
        accounts: &[Account],
        logs: &[DailyLogEntry],
    ) -> GoalProgressReport {
        let progress: Vec<AccountGoalProgress> = accounts
            .iter()
            .map(|account| AccountGoalProgress {
                account_id: account.id.clone(),
                account_name: account.name.clone(),
                summary: self.account_goal_summary(&account.id, goal, accounts, logs),
            })
            .collect();

        let completed = progress
            .iter()
            .filter(|p| p.summary.progress >= Decimal::ONE_HUNDRED)
            .count();
        let in_progress = progress
            .iter()
            .filter(|p| p.summary.progress > Decimal::ZERO && p.summary.progress < Decimal::ONE_HUNDRED)
            .count();

        GoalProgressReport {
            accounts: progress,
            completed,
            in_progress,
        }
    }
}

/// The account's own goal when one is defined, otherwise the global goal.
pub(crate) fn resolve_target(goal: &Goal, accounts: &[Account], account_id: Option<&str>) -> Decimal {
    account_id
        .and_then(|id| find_account(accounts, id))
        .and_then(|account| account.goal)
        .unwrap_or(goal.amount)
}

pub(crate) fn summarize(total_result: Decimal, target_amount: Decimal) -> GoalSummary {
    let remaining = target_amount
        .checked_sub(total_result)
        .unwrap_or(Decimal::MAX)
        .max(Decimal::ZERO);
    let progress = if target_amount > Decimal::ZERO {
        ratio_pct(total_result, target_amount).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    GoalSummary {
        total_result,
        target_amount,
        remaining,
        progress,
        is_goal_met: total_result >= target_amount,
    }
}
