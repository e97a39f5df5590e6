use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Credit,
    Debit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TxCategory {
    Recharge,
    FeePayment,
    Canteen,
    LibraryFine,
    Transport,
    Refund,
    Other,
}

/// Immutable once appended. `seq` is the server-assigned per-wallet order
/// and is authoritative for history ordering and `balance_after`; `date`
/// is informational.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub tx_id: String,
    pub seq: u64,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub category: TxCategory,
    /// Minor units, always positive; the sign comes from `kind`.
    pub amount: i64,
    pub description: Option<String>,
    pub reference_id: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
    pub balance_after: i64,
    pub performed_by: String,
}

impl WalletTransaction {
    /// Effect of this transaction on the balance.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TxKind::Credit => self.amount,
            TxKind::Debit => -self.amount,
        }
    }
}
