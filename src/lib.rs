pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod logger;
pub mod models;
pub mod policy;
pub mod service;
pub mod storage;
pub mod txid;

pub use error::WalletError;
pub use logger::in_memory::InMemoryAuditLogger;
pub use policy::RoleAccessPolicy;
pub use service::LedgerService;
pub use storage::in_memory::InMemoryWalletStore;

#[cfg(test)]
mod tests;
