use crate::engine::{ratio_pct, MetricsEngine};
use crate::grouping::Period;
use crate::report::{DashboardSummary, MonthlyWithdrawals, WithdrawalSummary};
use core_types::{Account, DailyLogEntry, Goal, Withdrawal};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

impl MetricsEngine {
    /// Totals of the withdrawals, optionally restricted to one account, with
    /// a chronological monthly breakdown.
    #[tracing::instrument(name = "withdrawal_summary", skip(self, goal, withdrawals), fields(withdrawals = withdrawals.len()))]
    pub fn withdrawal_summary(
        &self,
        goal: &Goal,
        withdrawals: &[Withdrawal],
        account_id: Option<&str>,
    ) -> WithdrawalSummary {
        let selected: Vec<&Withdrawal> = withdrawals
            .iter()
            .filter(|w| account_id.is_none_or(|id| w.account_id == id))
            .collect();

        let total_gross: Decimal = selected.iter().map(|w| w.gross_amount).sum();
        let total_net: Decimal = selected.iter().map(|w| w.net_amount).sum();

        let goal_progress = if goal.amount > Decimal::ZERO {
            ratio_pct(total_net, goal.amount)
        } else {
            Decimal::ZERO
        };

        let mut months: BTreeMap<_, (Decimal, Decimal)> = BTreeMap::new();
        for w in &selected {
            let month = Period::Month.start_of(w.date.date_naive());
            let (gross, net) = months.entry(month).or_default();
            *gross += w.gross_amount;
            *net += w.net_amount;
        }

        let summary = WithdrawalSummary {
            account_id: account_id.map(str::to_string),
            count: selected.len(),
            total_gross,
            total_net,
            total_tax: total_gross - total_net,
            goal_progress,
            monthly: months
                .into_iter()
                .map(|(month, (gross, net))| MonthlyWithdrawals { month, gross, net })
                .collect(),
        };

        tracing::debug!(
            count = summary.count,
            total_net = %summary.total_net,
            "Calculated withdrawal summary."
        );
        summary
    }

    /// Logged result of an account minus everything withdrawn from it (gross).
    /// Negative when more was withdrawn than logged.
    pub fn available_balance(
        &self,
        account_id: &str,
        logs: &[DailyLogEntry],
        withdrawals: &[Withdrawal],
    ) -> Decimal {
        let logged: Decimal = logs
            .iter()
            .filter(|l| l.account_id == account_id)
            .map(|l| l.amount)
            .sum();
        let withdrawn: Decimal = withdrawals
            .iter()
            .filter(|w| w.account_id == account_id)
            .map(|w| w.gross_amount)
            .sum();

        logged - withdrawn
    }

    pub fn dashboard_summary(
        &self,
        accounts: &[Account],
        logs: &[DailyLogEntry],
        withdrawals: &[Withdrawal],
    ) -> DashboardSummary {
        let real_accounts: Vec<&Account> = accounts.iter().filter(|a| a.account_type.is_real()).collect();

        let total_available = real_accounts
            .iter()
            .map(|a| self.available_balance(&a.id, logs, withdrawals).max(Decimal::ZERO))
            .sum();

        DashboardSummary {
            real_accounts: real_accounts.len(),
            demo_accounts: accounts.len() - real_accounts.len(),
            total_withdrawn: withdrawals.iter().map(|w| w.net_amount).sum(),
            total_available,
        }
    }
}
