use crate::error::WalletError;
use crate::logger::AuditLogger;
use crate::models::audit::AppLog;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

pub struct InMemoryAuditLogger {
    logs: tokio::sync::Mutex<Vec<AppLog>>,
}

impl InMemoryAuditLogger {
    pub fn new() -> Self {
        InMemoryAuditLogger {
            logs: tokio::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryAuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLogger for InMemoryAuditLogger {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), WalletError> {
        let mut logs = self.logs.lock().await;
        logs.push(AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id: user_id.map(String::from),
            details,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, WalletError> {
        Ok(self.logs.lock().await.clone())
    }
}
