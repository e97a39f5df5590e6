use crate::constants::TX_ID_PREFIX;
use chrono::Utc;
use uuid::Uuid;

/// Globally unique transaction id: millisecond timestamp plus a random
/// UUIDv4 suffix. Uniqueness is still enforced by the store; a collision
/// there surfaces as a retryable `TxIdCollision`.
pub fn new_tx_id() -> String {
    format!(
        "{}_{:x}_{}",
        TX_ID_PREFIX,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}
