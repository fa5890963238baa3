//! The boundary between stored journal records and the canonical types.
//!
//! Records written by different versions of the persistence layer disagree on
//! key casing (`accountId` vs `account_id`), id representation (string vs
//! number), amount representation (number vs numeric string) and on the shape
//! of the goal (a bare number in older stores). Everything is resolved here,
//! once, so the rest of the workspace only ever sees one shape.

use crate::enums::{AccountPhase, AccountType};
use crate::error::CoreError;
use crate::structs::{Account, DailyLogEntry, Goal, JournalSnapshot, Withdrawal};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;

impl JournalSnapshot {
    /// Parses a stored snapshot document into canonical records.
    ///
    /// `default_goal` is used when the document carries no goal at all.
    pub fn from_json_str(json: &str, default_goal: &Goal) -> Result<Self, CoreError> {
        let stored: StoredSnapshot = serde_json::from_str(json)?;
        let snapshot = stored.normalize(default_goal)?;

        tracing::debug!(
            accounts = snapshot.accounts.len(),
            logs = snapshot.logs.len(),
            withdrawals = snapshot.withdrawals.len(),
            "Normalized stored journal snapshot."
        );

        Ok(snapshot)
    }
}

/// Parses a calendar date stored either as `YYYY-MM-DD` or as a full timestamp.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_timestamp(raw).map(|ts| ts.date_naive())
}

/// Parses a timestamp stored as RFC 3339, as a naive `YYYY-MM-DDTHH:MM:SS`
/// (read as UTC) or as a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(CoreError::InvalidInput(
        "date".to_string(),
        format!("`{raw}` is not a valid date or timestamp"),
    ))
}

// ==============================================================================
// Stored shapes
// ==============================================================================

#[derive(Debug, Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    goal: Option<StoredGoal>,
    #[serde(default)]
    accounts: Vec<StoredAccount>,
    #[serde(default)]
    logs: Vec<StoredLog>,
    #[serde(default)]
    withdrawals: Vec<StoredWithdrawal>,
}

/// Older stores saved the goal as a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredGoal {
    Legacy(Decimal),
    Named {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        amount: Decimal,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredId {
    Text(String),
    Number(i64),
}

impl From<StoredId> for String {
    fn from(id: StoredId) -> Self {
        match id {
            StoredId::Text(s) => s,
            StoredId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredPhase {
    Text(String),
    Number(u8),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAccount {
    id: StoredId,
    #[serde(default)]
    number: Option<StoredId>,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", alias = "account_type", alias = "accountType")]
    account_type: String,
    #[serde(default)]
    phase: Option<StoredPhase>,
    #[serde(default, deserialize_with = "optional_amount")]
    goal: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLog {
    id: StoredId,
    #[serde(alias = "account_id")]
    account_id: StoredId,
    date: String,
    #[serde(default)]
    amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWithdrawal {
    id: StoredId,
    #[serde(alias = "account_id")]
    account_id: StoredId,
    date: String,
    #[serde(default, alias = "gross_amount")]
    gross_amount: Option<Decimal>,
    #[serde(default, alias = "tax_percentage")]
    tax_percentage: Option<Decimal>,
    /// Tax in currency, as stored alongside the percentage.
    #[serde(default, alias = "tax_amount")]
    tax: Option<Decimal>,
    #[serde(default, alias = "net_amount")]
    net_amount: Option<Decimal>,
}

/// Accepts a number, a numeric string, an empty string or null.
fn optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Amount(Decimal),
        Text(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Amount(value)) => Ok(Some(value)),
        Some(Repr::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Repr::Text(text)) => Err(de::Error::custom(format!("invalid amount `{text}`"))),
    }
}

// ==============================================================================
// Normalization
// ==============================================================================

impl StoredSnapshot {
    fn normalize(self, default_goal: &Goal) -> Result<JournalSnapshot, CoreError> {
        let goal = match self.goal {
            None => default_goal.clone(),
            Some(StoredGoal::Legacy(amount)) => Goal::new(default_goal.name.clone(), amount)?,
            Some(StoredGoal::Named { name, amount }) => {
                Goal::new(name.unwrap_or_else(|| default_goal.name.clone()), amount)?
            }
        };

        let accounts = self
            .accounts
            .into_iter()
            .map(StoredAccount::normalize)
            .collect::<Result<Vec<_>, _>>()?;
        let logs = self
            .logs
            .into_iter()
            .map(StoredLog::normalize)
            .collect::<Result<Vec<_>, _>>()?;
        let withdrawals = self
            .withdrawals
            .into_iter()
            .map(StoredWithdrawal::normalize)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(JournalSnapshot {
            goal,
            accounts,
            logs,
            withdrawals,
        })
    }
}

impl StoredAccount {
    fn normalize(self) -> Result<Account, CoreError> {
        let account_type: AccountType = self.account_type.parse()?;
        let phase = match self.phase {
            None => AccountPhase::default(),
            Some(StoredPhase::Text(text)) => text.parse()?,
            Some(StoredPhase::Number(n)) => n.to_string().parse()?,
        };

        let mut account = Account::new(
            self.id,
            self.number.map(String::from).unwrap_or_default(),
            self.name,
            account_type,
            phase,
        );
        account.goal = self.goal;
        Ok(account)
    }
}

impl StoredLog {
    fn normalize(self) -> Result<DailyLogEntry, CoreError> {
        Ok(DailyLogEntry::new(
            self.id,
            self.account_id,
            parse_calendar_date(&self.date)?,
            self.amount,
        ))
    }
}

impl StoredWithdrawal {
    /// Stored amounts are kept verbatim; nothing is re-derived from gross and tax.
    fn normalize(self) -> Result<Withdrawal, CoreError> {
        let gross_amount = self.gross_amount.unwrap_or_default();
        let net_amount = self.net_amount.unwrap_or_default();

        Ok(Withdrawal {
            id: self.id.into(),
            account_id: self.account_id.into(),
            date: parse_timestamp(&self.date)?,
            gross_amount,
            tax_percentage: self.tax_percentage.unwrap_or_default(),
            tax_amount: self.tax.unwrap_or(gross_amount - net_amount),
            net_amount,
        })
    }
}
