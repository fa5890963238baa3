use analytics::{AlertLevel, InsightTopic, LogFilter, MetricsEngine, Period};
use chrono::{NaiveDate, TimeZone, Utc};
use core_types::{DailyLogEntry, Goal, JournalSnapshot, Outcome};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SNAPSHOT: &str = r#"{
    "goal": { "name": "Freedom", "amount": 1000 },
    "accounts": [
        { "id": "A", "number": "1001", "name": "Funded", "type": "real", "goal": 2000 },
        { "id": "B", "number": 1002, "name": "Challenge", "type": "demo", "phase": 2 }
    ],
    "logs": [
        { "id": 1, "accountId": "A", "date": "2024-01-01", "amount": 500 },
        { "id": 2, "accountId": "A", "date": "2024-01-02", "amount": -200 },
        { "id": 3, "account_id": "A", "date": "2024-01-03", "amount": "300" },
        { "id": 4, "accountId": "B", "date": "2024-01-03", "amount": 0 },
        { "id": 5, "accountId": "deleted", "date": "2024-01-04", "amount": 150 }
    ],
    "withdrawals": [
        { "id": "w1", "accountId": "A", "date": "2024-01-05T12:00:00Z",
          "grossAmount": 800, "taxPercentage": 10, "tax": 80, "netAmount": 720 },
        { "id": "w2", "account_id": "A", "date": "2024-01-09",
          "gross_amount": 500, "tax_percentage": 0, "net_amount": 480 }
    ]
}"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn snapshot() -> JournalSnapshot {
    JournalSnapshot::from_json_str(SNAPSHOT, &Goal::default()).unwrap()
}

fn engine() -> MetricsEngine {
    MetricsEngine::new(Utc.with_ymd_and_hms(2024, 1, 11, 9, 0, 0).unwrap())
}

#[test]
fn account_report_from_stored_snapshot() {
    let snap = snapshot();
    let metrics = engine().account_metrics("A", &snap.logs);

    assert_eq!(metrics.total_days, 3);
    assert_eq!(metrics.total_amount, dec!(600));
    assert_eq!(metrics.positive_days, 2);
    assert_eq!(metrics.negative_days, 1);
    assert_eq!(metrics.win_rate.round_dp(2), dec!(66.67));
    assert_eq!(metrics.avg_positive, dec!(400));
    assert_eq!(metrics.avg_negative, dec!(-200));
}

#[test]
fn performance_uses_stored_net_amounts() {
    let snap = snapshot();
    let perf = engine().performance_metrics(&snap.accounts, &snap.logs, &snap.withdrawals);

    // Stored net amounts are authoritative even when they disagree with the tax.
    assert_eq!(perf.total_profit, dec!(1200));
    assert_eq!(perf.total_gross, dec!(1300));
    assert_eq!(perf.profit_per_account, dec!(600));
    assert_eq!(perf.days_since_start, 10);
    assert_eq!(perf.daily_average, dec!(120));
}

#[test]
fn both_goal_summaries_over_the_same_snapshot() {
    let snap = snapshot();
    let engine = engine();

    let global = engine.global_goal_summary(&snap.goal, &snap.accounts, &snap.withdrawals, None);
    assert_eq!(global.total_result, dec!(1200));
    assert_eq!(global.remaining, Decimal::ZERO);
    assert_eq!(global.progress, dec!(100));
    assert!(global.is_goal_met);

    let account = engine.account_goal_summary("A", &snap.goal, &snap.accounts, &snap.logs);
    assert_eq!(account.target_amount, dec!(2000));
    assert_eq!(account.total_result, dec!(600));
    assert_eq!(account.progress, dec!(30));
    assert_eq!(account.remaining, dec!(1400));

    let alerts = engine.alerts(&snap.goal, &snap.accounts, &snap.withdrawals);
    assert_eq!(alerts[0].level, AlertLevel::Success);
    // The last withdrawal is two days old at the reference instant.
    assert_eq!(alerts[1].level, AlertLevel::Info);
}

#[test]
fn dangling_references_do_not_fail_aggregates() {
    let snap = snapshot();
    let engine = engine();

    assert!(snap.find_account("deleted").is_none());
    let metrics = engine.account_metrics("deleted", &snap.logs);
    assert_eq!(metrics.total_amount, dec!(150));

    let summary = engine.account_goal_summary("deleted", &snap.goal, &snap.accounts, &snap.logs);
    assert_eq!(summary.target_amount, dec!(1000));
}

#[test]
fn journal_views_over_the_snapshot() {
    let snap = snapshot();
    let engine = engine();

    let wins = engine.filter_logs(
        &snap.logs,
        &LogFilter {
            outcome: Some(Outcome::Positive),
            ..LogFilter::default()
        },
    );
    assert_eq!(wins.len(), 3);

    let weeks = engine.group_by_period(&snap.logs, Period::Week);
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].start, date(2023, 12, 31));
    assert_eq!(weeks[0].total, dec!(750));

    let evolution: Vec<_> = engine.evolution(&snap.logs, 30).collect();
    assert_eq!(evolution.len(), 5);
    assert_eq!(evolution.last().unwrap().cumulative_value, dec!(750));

    let dashboard = engine.dashboard_summary(&snap.accounts, &snap.logs, &snap.withdrawals);
    assert_eq!(dashboard.real_accounts, 1);
    assert_eq!(dashboard.demo_accounts, 1);
    // 600 logged against 1300 withdrawn leaves nothing available.
    assert_eq!(dashboard.total_available, Decimal::ZERO);
}

#[test]
fn insights_over_the_snapshot() {
    let snap = snapshot();
    let engine = engine();

    // Three wins out of five logged days sits exactly on the threshold.
    let all = engine.insights(&snap.logs);
    assert!(!all.iter().any(|i| matches!(i.topic, InsightTopic::WinRate { .. })));

    let funded = engine.account_metrics("A", &snap.logs).logs;
    let insights = engine.insights(&funded);
    assert!(insights.iter().any(|i| matches!(i.topic, InsightTopic::WinRate { .. })));
    assert!(!insights.iter().any(|i| matches!(i.topic, InsightTopic::WinStreak { .. })));
}

#[test]
fn empty_snapshot_yields_neutral_reports() {
    let snap = JournalSnapshot::from_json_str("{}", &Goal::default()).unwrap();
    let engine = engine();

    let perf = engine.performance_metrics(&snap.accounts, &snap.logs, &snap.withdrawals);
    assert_eq!(perf.days_since_start, 1);
    assert_eq!(perf.daily_average, Decimal::ZERO);
    assert_eq!(perf.profit_per_account, Decimal::ZERO);

    assert_eq!(engine.streaks(&snap.logs).max_win_streak, 0);
    assert_eq!(engine.evolution(&snap.logs, 30).count(), 0);
    assert!(engine.insights(&snap.logs).is_empty());

    let summary = engine.global_goal_summary(&snap.goal, &snap.accounts, &snap.withdrawals, None);
    assert_eq!(summary.progress, Decimal::ZERO);
    assert_eq!(summary.remaining, dec!(10000));

    let alerts = engine.alerts(&snap.goal, &snap.accounts, &snap.withdrawals);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Neutral);
}

#[test]
fn malformed_amounts_are_rejected_at_the_boundary() {
    let json = r#"{ "logs": [{ "id": 1, "accountId": "A", "date": "2024-01-01", "amount": "abc" }] }"#;
    assert!(JournalSnapshot::from_json_str(json, &Goal::default()).is_err());
}

/// Deterministic pseudo-random journals covering wins, losses and flat days.
fn generated_journals() -> Vec<Vec<DailyLogEntry>> {
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    (0..50)
        .map(|_| {
            let len = (next() % 40) as usize;
            (0..len)
                .map(|i| {
                    let amount = Decimal::from((next() % 2001) as i64 - 1000);
                    let day = date(2024, 1, 1) + chrono::Days::new(next() % 60);
                    DailyLogEntry::new(i.to_string(), "A", day, amount)
                })
                .collect()
        })
        .collect()
}

#[test]
fn metric_invariants_hold_for_generated_journals() {
    let engine = MetricsEngine::on(date(2024, 3, 1));

    for logs in generated_journals() {
        let metrics = engine.account_metrics("A", &logs);
        assert!(metrics.win_rate >= Decimal::ZERO && metrics.win_rate <= dec!(100));
        assert_eq!(metrics.total_amount, metrics.positive_sum + metrics.negative_sum);

        let streaks = engine.streaks(&logs);
        assert!(streaks.max_win_streak >= streaks.current_win_streak);
        assert!(streaks.max_loss_streak >= streaks.current_loss_streak);

        for target in [dec!(1), dec!(500), dec!(100000)] {
            let goal = Goal::new("Goal", target).unwrap();
            let summary = engine.account_goal_summary("A", &goal, &[], &logs);
            assert!(summary.progress >= Decimal::ZERO && summary.progress <= dec!(100));
            assert!(summary.remaining >= Decimal::ZERO);
        }
    }
}
