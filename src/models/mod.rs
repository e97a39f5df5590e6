pub mod audit;
pub mod transaction;
pub mod wallet;

pub use audit::AppLog;
pub use transaction::{TxCategory, TxKind, WalletTransaction};
pub use wallet::{Wallet, WalletStatus};
