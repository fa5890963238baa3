//! # Tableflow Core Types
//!
//! Layer 0 of the workspace: the canonical journal records every other crate
//! speaks, and the one place where stored records are normalized into them.

pub mod enums;
pub mod error;
pub mod normalize;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AccountPhase, AccountType, Outcome};
pub use error::CoreError;
pub use normalize::{parse_calendar_date, parse_timestamp};
pub use structs::{find_account, Account, DailyLogEntry, Goal, JournalSnapshot, Withdrawal};
