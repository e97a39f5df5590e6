use crate::models::wallet::WalletStatus;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
pub enum WalletError {
    /// Credit/debit amount is zero or negative
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    /// Wallet exists but is blocked or closed
    #[error("Wallet is {0}, only active wallets accept transactions")]
    WalletNotActive(WalletStatus),

    /// Debit larger than the current balance
    #[error("Insufficient balance: have {balance}, requested {requested}")]
    InsufficientBalance { balance: i64, requested: i64 },

    /// Credit would push the balance past the representable maximum
    #[error("Credit of {amount} overflows balance {balance}")]
    BalanceOverflow { balance: i64, amount: i64 },

    /// Status change outside the allowed transition table
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: WalletStatus,
        to: WalletStatus,
    },

    /// No wallet for the given student on a non-creating path
    #[error("Wallet for student {0} not found")]
    WalletNotFound(String),

    /// Access policy rejected the actor for this action
    #[error("User {0} is not authorized for this operation")]
    NotAuthorized(String),

    /// `studentId` query parameter missing
    #[error("studentId is required")]
    MissingStudentId,

    /// Upstream gateway header absent or empty
    #[error("Missing actor header: {0}")]
    MissingActorHeader(String),

    /// Role string from the gateway is not a known role
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// CAS retries exhausted under contention
    #[error("Concurrent updates on wallet for student {0}, retries exhausted")]
    ConcurrencyConflict(String),

    /// Generated transaction id already present in the store
    #[error("Transaction id {0} already exists")]
    TxIdCollision(String),

    /// Operation deadline expired before a successful swap
    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Audit log error: {0}")]
    AuditLogError(String),
}
