use crate::engine::MetricsEngine;
use chrono::{Datelike, Days, NaiveDate};
use core_types::{DailyLogEntry, Outcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Calendar granularity used to bucket journal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    /// Weeks start on Sunday.
    Week,
    Month,
}

impl Period {
    /// The first day of the period containing `date`.
    pub fn start_of(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Week => {
                let offset = u64::from(date.weekday().num_days_from_sunday());
                date.checked_sub_days(Days::new(offset)).unwrap_or(date)
            }
            Period::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(format!("unknown period `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub period: Period,
    pub start: NaiveDate,
    pub count: usize,
    pub total: Decimal,
    /// In input order.
    pub entries: Vec<DailyLogEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyResult {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// Journal table filter. Every `None` criterion matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    pub account_id: Option<String>,
    /// Flat days match neither outcome.
    pub outcome: Option<Outcome>,
    /// Substring of the `YYYY-MM-DD` rendering of the date.
    pub date_contains: Option<String>,
}

impl LogFilter {
    pub fn matches(&self, entry: &DailyLogEntry) -> bool {
        let matches_account = self
            .account_id
            .as_deref()
            .is_none_or(|id| entry.account_id == id);
        let matches_outcome = self.outcome.is_none_or(|o| entry.outcome() == Some(o));
        let matches_date = self.date_contains.as_deref().is_none_or(|needle| {
            needle.is_empty() || entry.date.format("%Y-%m-%d").to_string().contains(needle)
        });

        matches_account && matches_outcome && matches_date
    }
}

impl MetricsEngine {
    /// Buckets entries by period start, in ascending order.
    pub fn group_by_period(&self, logs: &[DailyLogEntry], period: Period) -> Vec<PeriodBucket> {
        let mut buckets: BTreeMap<NaiveDate, PeriodBucket> = BTreeMap::new();

        for entry in logs {
            let start = period.start_of(entry.date);
            let bucket = buckets.entry(start).or_insert_with(|| PeriodBucket {
                period,
                start,
                count: 0,
                total: Decimal::ZERO,
                entries: Vec::new(),
            });
            bucket.count += 1;
            bucket.total += entry.amount;
            bucket.entries.push(entry.clone());
        }

        buckets.into_values().collect()
    }

    /// Net result of each of the `limit` most recent logged days.
    pub fn daily_results(&self, logs: &[DailyLogEntry], limit: usize) -> Vec<DailyResult> {
        let days = self.group_by_period(logs, Period::Day);
        let skip = days.len().saturating_sub(limit);

        days.into_iter()
            .skip(skip)
            .map(|bucket| DailyResult {
                date: bucket.start,
                total: bucket.total,
            })
            .collect()
    }

    pub fn filter_logs(&self, logs: &[DailyLogEntry], filter: &LogFilter) -> Vec<DailyLogEntry> {
        logs.iter().filter(|l| filter.matches(l)).cloned().collect()
    }
}
