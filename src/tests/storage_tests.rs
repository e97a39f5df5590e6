use crate::error::WalletError;
use crate::models::transaction::{TxCategory, TxKind, WalletTransaction};
use crate::storage::WalletStore;
use crate::storage::in_memory::InMemoryWalletStore;
use crate::tests::SCHOOL;
use chrono::Utc;

fn tx(id: &str, seq: u64, amount: i64, balance_after: i64) -> WalletTransaction {
    WalletTransaction {
        tx_id: id.to_string(),
        seq,
        kind: TxKind::Credit,
        category: TxCategory::Recharge,
        amount,
        description: None,
        reference_id: None,
        date: Utc::now(),
        balance_after,
        performed_by: "adm-1".to_string(),
    }
}

#[tokio::test]
async fn test_create_if_absent_is_idempotent() {
    let store = InMemoryWalletStore::new();
    let first = store.create_if_absent(SCHOOL, "stu-1").await.unwrap();
    let second = store.create_if_absent(SCHOOL, "stu-1").await.unwrap();
    assert_eq!(first.version, second.version);
    assert_eq!(first.created_at, second.created_at);

    assert!(store.load(SCHOOL, "ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_cas_refuses_stale_version() {
    let store = InMemoryWalletStore::new();
    let wallet = store.create_if_absent(SCHOOL, "stu-1").await.unwrap();
    let stale_version = wallet.version;

    // First writer wins.
    let mut first = wallet.clone();
    first.balance = 100;
    first.transactions.push(tx("tx-a", 1, 100, 100));
    assert!(store.compare_and_swap(first, stale_version).await.unwrap());

    // Second writer submitted against the version it read before the swap.
    let mut second = wallet;
    second.balance = 50;
    second.transactions.push(tx("tx-b", 1, 50, 50));
    assert!(!store.compare_and_swap(second, stale_version).await.unwrap());

    let stored = store.load(SCHOOL, "stu-1").await.unwrap().unwrap();
    assert_eq!(stored.balance, 100);
    assert_eq!(stored.version, stale_version + 1);
    assert_eq!(stored.transactions.len(), 1);
    assert_eq!(stored.transactions[0].tx_id, "tx-a");
}

#[tokio::test]
async fn test_cas_surfaces_tx_id_collision() {
    let store = InMemoryWalletStore::new();
    let wallet = store.create_if_absent(SCHOOL, "stu-1").await.unwrap();

    let mut first = wallet.clone();
    first.balance = 100;
    first.transactions.push(tx("tx-dup", 1, 100, 100));
    let version = first.version;
    assert!(store.compare_and_swap(first, version).await.unwrap());

    // Same id resubmitted from a fresh load must not be silently accepted.
    let reloaded = store.load(SCHOOL, "stu-1").await.unwrap().unwrap();
    let mut second = reloaded.clone();
    second.balance = 200;
    second.transactions.push(tx("tx-dup", 2, 100, 200));
    let err = store
        .compare_and_swap(second, reloaded.version)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::TxIdCollision(id) if id == "tx-dup"));

    // The failed swap wrote nothing.
    let stored = store.load(SCHOOL, "stu-1").await.unwrap().unwrap();
    assert_eq!(stored.balance, 100);
    assert_eq!(stored.transactions.len(), 1);
}

#[tokio::test]
async fn test_tx_ids_are_unique_across_wallets() {
    let store = InMemoryWalletStore::new();
    let w1 = store.create_if_absent(SCHOOL, "stu-1").await.unwrap();
    let w2 = store.create_if_absent(SCHOOL, "stu-2").await.unwrap();

    let mut first = w1.clone();
    first.transactions.push(tx("tx-shared", 1, 10, 10));
    first.balance = 10;
    assert!(store.compare_and_swap(first, w1.version).await.unwrap());

    let mut second = w2.clone();
    second.transactions.push(tx("tx-shared", 1, 10, 10));
    second.balance = 10;
    let err = store.compare_and_swap(second, w2.version).await.unwrap_err();
    assert!(matches!(err, WalletError::TxIdCollision(_)));
}
