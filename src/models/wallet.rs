use super::transaction::WalletTransaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WalletStatus {
    Active,
    Blocked,
    Closed,
}

impl WalletStatus {
    /// Allowed transitions: active<->blocked, anything open -> closed.
    /// `Closed` is terminal and self-transitions are rejected.
    pub fn can_transition_to(self, next: WalletStatus) -> bool {
        use WalletStatus::*;
        matches!(
            (self, next),
            (Active, Blocked) | (Active, Closed) | (Blocked, Active) | (Blocked, Closed)
        )
    }
}

impl fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletStatus::Active => write!(f, "active"),
            WalletStatus::Blocked => write!(f, "blocked"),
            WalletStatus::Closed => write!(f, "closed"),
        }
    }
}

/// One wallet per (school, student) pair, persisted as a single aggregate
/// with its embedded transaction history. `version` backs the store's
/// compare-and-swap; `balance` is always the running sum of the history.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub school_id: String,
    pub student_id: String,
    /// Minor units (cents), never negative.
    pub balance: i64,
    pub status: WalletStatus,
    pub transactions: Vec<WalletTransaction>,
    pub version: u64,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(school_id: &str, student_id: &str) -> Self {
        let now = Utc::now();
        Wallet {
            school_id: school_id.to_string(),
            student_id: student_id.to_string(),
            balance: 0,
            status: WalletStatus::Active,
            transactions: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sequence number for the next appended transaction (1-based).
    pub fn next_seq(&self) -> u64 {
        self.transactions.len() as u64 + 1
    }
}
