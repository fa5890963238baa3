use crate::enums::{AccountPhase, AccountType, Outcome};
use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day's profit or loss for a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogEntry {
    pub id: String,
    /// Weak reference: the account may no longer exist.
    pub account_id: String,
    pub date: NaiveDate,
    /// Signed result, profit positive and loss negative.
    pub amount: Decimal,
}

impl DailyLogEntry {
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
            date,
            amount,
        }
    }

    /// `None` for a flat (zero-amount) day.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.amount > Decimal::ZERO {
            Some(Outcome::Positive)
        } else if self.amount < Decimal::ZERO {
            Some(Outcome::Negative)
        } else {
            None
        }
    }
}

/// A cash-out from a real account.
///
/// `tax_amount` and `net_amount` are derived once when the withdrawal is
/// registered and stored as-is afterwards. Consumers must read them rather
/// than recompute them from `gross_amount` and `tax_percentage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: String,
    pub account_id: String,
    pub date: DateTime<Utc>,
    pub gross_amount: Decimal,
    /// Broker / prop-firm fee, 0 to 100.
    pub tax_percentage: Decimal,
    pub tax_amount: Decimal,
    pub net_amount: Decimal,
}

impl Withdrawal {
    /// Registers a new withdrawal, deriving the tax and net amounts.
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        date: DateTime<Utc>,
        gross_amount: Decimal,
        tax_percentage: Decimal,
    ) -> Result<Self, CoreError> {
        if gross_amount < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "gross amount".to_string(),
                format!("must not be negative, got {gross_amount}"),
            ));
        }
        if tax_percentage < Decimal::ZERO || tax_percentage > Decimal::ONE_HUNDRED {
            return Err(CoreError::InvalidInput(
                "tax percentage".to_string(),
                format!("must be between 0 and 100, got {tax_percentage}"),
            ));
        }

        let tax_amount = gross_amount * tax_percentage / Decimal::ONE_HUNDRED;

        Ok(Self {
            id: id.into(),
            account_id: account_id.into(),
            date,
            gross_amount,
            tax_percentage,
            tax_amount,
            net_amount: gross_amount - tax_amount,
        })
    }
}

/// A journaled trading account ("mesa").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Only meaningful for demo accounts.
    pub phase: AccountPhase,
    /// Overrides the global goal when set.
    pub goal: Option<Decimal>,
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        number: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        phase: AccountPhase,
    ) -> Self {
        // Real accounts have no evaluation phase.
        let phase = if account_type.is_real() {
            AccountPhase::One
        } else {
            phase
        };

        Self {
            id: id.into(),
            number: number.into(),
            name: name.into(),
            account_type,
            phase,
            goal: None,
        }
    }

    pub fn with_goal(mut self, goal: Decimal) -> Self {
        self.goal = Some(goal);
        self
    }
}

/// The single global financial goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub amount: Decimal,
}

impl Goal {
    pub const DEFAULT_NAME: &'static str = "My Goal";

    pub fn new(name: impl Into<String>, amount: Decimal) -> Result<Self, CoreError> {
        if amount < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "goal amount".to_string(),
                format!("must not be negative, got {amount}"),
            ));
        }
        Ok(Self {
            name: name.into(),
            amount,
        })
    }
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            amount: Decimal::from(10_000),
        }
    }
}

/// An immutable view of every record the journal holds at one moment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSnapshot {
    pub goal: Goal,
    pub accounts: Vec<Account>,
    pub logs: Vec<DailyLogEntry>,
    pub withdrawals: Vec<Withdrawal>,
}

impl JournalSnapshot {
    pub fn find_account(&self, account_id: &str) -> Option<&Account> {
        find_account(&self.accounts, account_id)
    }
}

/// Looks up an account by id. Dangling references simply return `None`.
pub fn find_account<'a>(accounts: &'a [Account], account_id: &str) -> Option<&'a Account> {
    accounts.iter().find(|a| a.id == account_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn withdrawal_derives_net_amount_once() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let w = Withdrawal::new("w1", "a1", date, dec!(1000), dec!(20)).unwrap();
        assert_eq!(w.tax_amount, dec!(200));
        assert_eq!(w.net_amount, dec!(800));
    }

    #[test]
    fn withdrawal_rejects_out_of_range_tax() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert!(Withdrawal::new("w1", "a1", date, dec!(1000), dec!(101)).is_err());
        assert!(Withdrawal::new("w1", "a1", date, dec!(1000), dec!(-1)).is_err());
        assert!(Withdrawal::new("w1", "a1", date, dec!(-5), dec!(10)).is_err());
    }

    #[test]
    fn real_accounts_drop_the_evaluation_phase() {
        let account = Account::new("a1", "123", "Main", AccountType::Real, AccountPhase::Two);
        assert_eq!(account.phase, AccountPhase::One);
    }

    #[test]
    fn log_outcome_treats_zero_as_flat() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(DailyLogEntry::new("1", "a", date, dec!(0)).outcome(), None);
        assert_eq!(
            DailyLogEntry::new("2", "a", date, dec!(-3)).outcome(),
            Some(Outcome::Negative)
        );
    }

    #[test]
    fn find_account_tolerates_missing_ids() {
        let accounts = vec![Account::new("a1", "1", "One", AccountType::Demo, AccountPhase::Two)];
        assert!(find_account(&accounts, "a1").is_some());
        assert!(find_account(&accounts, "deleted").is_none());
    }
}
