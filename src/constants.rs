/// Upper bound on compare-and-swap attempts before an operation gives up
/// with `ConcurrencyConflict`.
pub const MAX_CAS_RETRIES: u32 = 5;

/// Transaction history page size when the caller does not pass `limit`.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Hard cap on `limit` to keep a single response bounded.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Prefix carried by every generated transaction id.
pub const TX_ID_PREFIX: &str = "txn";

// Audit action names.
pub const WALLET_CREATED: &str = "wallet_created";
pub const WALLET_CREDITED: &str = "wallet_credited";
pub const WALLET_DEBITED: &str = "wallet_debited";
pub const WALLET_STATUS_CHANGED: &str = "wallet_status_changed";
