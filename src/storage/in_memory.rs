use crate::error::WalletError;
use crate::models::wallet::Wallet;
use crate::storage::WalletStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

type WalletKey = (String, String); // (school_id, student_id)

struct StoreInner {
    wallets: HashMap<WalletKey, Wallet>,
    tx_ids: HashSet<String>,
}

/// In-memory backend for tests and single-process deployments. One mutex
/// guards both maps so the version check, the tx-id uniqueness check, and
/// the swap are a single atomic step.
pub struct InMemoryWalletStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryWalletStore {
    pub fn new() -> Self {
        InMemoryWalletStore {
            inner: Mutex::new(StoreInner {
                wallets: HashMap::new(),
                tx_ids: HashSet::new(),
            }),
        }
    }
}

impl Default for InMemoryWalletStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletStore for InMemoryWalletStore {
    async fn load(
        &self,
        school_id: &str,
        student_id: &str,
    ) -> Result<Option<Wallet>, WalletError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .wallets
            .get(&(school_id.to_string(), student_id.to_string()))
            .cloned())
    }

    async fn create_if_absent(
        &self,
        school_id: &str,
        student_id: &str,
    ) -> Result<Wallet, WalletError> {
        let mut inner = self.inner.lock().await;
        let key = (school_id.to_string(), student_id.to_string());
        Ok(inner
            .wallets
            .entry(key)
            .or_insert_with(|| Wallet::new(school_id, student_id))
            .clone())
    }

    async fn compare_and_swap(
        &self,
        mut wallet: Wallet,
        expected_version: u64,
    ) -> Result<bool, WalletError> {
        let mut inner = self.inner.lock().await;
        let key = (wallet.school_id.clone(), wallet.student_id.clone());

        let applied_len = match inner.wallets.get(&key) {
            Some(stored) if stored.version == expected_version => stored.transactions.len(),
            _ => return Ok(false),
        };

        // Ids of transactions this swap would append.
        let new_ids: Vec<String> = wallet
            .transactions
            .get(applied_len..)
            .unwrap_or_default()
            .iter()
            .map(|tx| tx.tx_id.clone())
            .collect();
        for id in &new_ids {
            if inner.tx_ids.contains(id) {
                return Err(WalletError::TxIdCollision(id.clone()));
            }
        }

        inner.tx_ids.extend(new_ids);
        wallet.version = expected_version + 1;
        inner.wallets.insert(key, wallet);
        Ok(true)
    }
}
