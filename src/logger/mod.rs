use crate::error::WalletError;
use crate::models::audit::AppLog;
use async_trait::async_trait;

#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), WalletError>;

    async fn get_logs(&self) -> Result<Vec<AppLog>, WalletError>;
}

pub mod in_memory;
