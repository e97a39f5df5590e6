use crate::error::WalletError;
use crate::models::wallet::Wallet;
use async_trait::async_trait;

/// Durable keyed storage for wallet aggregates. The abstraction does not
/// assume a storage engine; any backend with an optimistic-lock write
/// (relational row with a version column, document store, in-memory map)
/// can implement it.
#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn load(
        &self,
        school_id: &str,
        student_id: &str,
    ) -> Result<Option<Wallet>, WalletError>;

    /// Returns the existing wallet or inserts a fresh one with defaults.
    /// Idempotent.
    async fn create_if_absent(
        &self,
        school_id: &str,
        student_id: &str,
    ) -> Result<Wallet, WalletError>;

    /// The single atomicity primitive behind credit/debit/set-status.
    /// Accepts `wallet` only if the stored version still equals
    /// `expected_version`, bumping it to `expected_version + 1`; returns
    /// `Ok(false)` on a version mismatch so the caller retries from a
    /// fresh load. Newly appended transaction ids are checked for global
    /// uniqueness and a duplicate fails with `TxIdCollision` before
    /// anything is written.
    async fn compare_and_swap(
        &self,
        wallet: Wallet,
        expected_version: u64,
    ) -> Result<bool, WalletError>;
}

pub mod in_memory;
