use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a journaled account trades real funds or is an evaluation account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Demo,
    Real,
}

impl AccountType {
    pub fn is_real(&self) -> bool {
        matches!(self, AccountType::Real)
    }
}

impl FromStr for AccountType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(AccountType::Demo),
            "real" => Ok(AccountType::Real),
            other => Err(CoreError::InvalidInput(
                "account type".to_string(),
                format!("expected `demo` or `real`, got `{other}`"),
            )),
        }
    }
}

/// Evaluation phase of a demo account. Real accounts always carry `One`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountPhase {
    #[default]
    One,
    Two,
    /// Single-phase evaluation ("única").
    Unica,
}

impl FromStr for AccountPhase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "one" => Ok(AccountPhase::One),
            "2" | "two" => Ok(AccountPhase::Two),
            "unica" | "única" => Ok(AccountPhase::Unica),
            other => Err(CoreError::InvalidInput(
                "account phase".to_string(),
                format!("expected `1`, `2` or `unica`, got `{other}`"),
            )),
        }
    }
}

impl fmt::Display for AccountPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountPhase::One => write!(f, "1"),
            AccountPhase::Two => write!(f, "2"),
            AccountPhase::Unica => write!(f, "unica"),
        }
    }
}

/// The sign of a day's result. Zero-amount days have no outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Positive,
    Negative,
}

impl FromStr for Outcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "win" | "profit" => Ok(Outcome::Positive),
            "negative" | "loss" => Ok(Outcome::Negative),
            other => Err(CoreError::InvalidInput(
                "outcome".to_string(),
                format!("expected `positive` or `negative`, got `{other}`"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_phase_spellings() {
        assert_eq!("1".parse::<AccountPhase>().unwrap(), AccountPhase::One);
        assert_eq!(" 2 ".parse::<AccountPhase>().unwrap(), AccountPhase::Two);
        assert_eq!("Única".parse::<AccountPhase>().unwrap(), AccountPhase::Unica);
        assert!("3".parse::<AccountPhase>().is_err());
    }

    #[test]
    fn parses_account_type_case_insensitively() {
        assert_eq!("REAL".parse::<AccountType>().unwrap(), AccountType::Real);
        assert!("paper".parse::<AccountType>().is_err());
    }

    #[test]
    fn parses_outcome_aliases() {
        assert_eq!("Win".parse::<Outcome>().unwrap(), Outcome::Positive);
        assert_eq!("loss".parse::<Outcome>().unwrap(), Outcome::Negative);
        assert!("flat".parse::<Outcome>().is_err());
    }
}
