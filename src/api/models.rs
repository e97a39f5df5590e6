use crate::error::WalletError;
use crate::models::transaction::{TxCategory, WalletTransaction};
use crate::models::wallet::WalletStatus;
use crate::service::TransactionPage;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Query parameters

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletQuery {
    pub student_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub student_id: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

// Request bodies

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RechargeRequest {
    pub student_id: String,
    /// Minor units (cents).
    pub amount: i64,
    pub description: Option<String>,
    pub reference_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductRequest {
    pub student_id: String,
    /// Minor units (cents).
    pub amount: i64,
    pub category: Option<TxCategory>,
    pub description: Option<String>,
    pub reference_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub student_id: String,
    pub status: WalletStatus,
}

// Responses

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub message: String,
    pub new_balance: i64,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub transactions: Vec<WalletTransaction>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

impl From<TransactionPage> for HistoryResponse {
    fn from(page: TransactionPage) -> Self {
        HistoryResponse {
            transactions: page.items,
            total: page.total,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for WalletError to implement IntoResponse
pub struct ApiError(pub WalletError);

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            WalletError::InvalidAmount(_)
            | WalletError::WalletNotActive(_)
            | WalletError::InsufficientBalance { .. }
            | WalletError::BalanceOverflow { .. }
            | WalletError::InvalidStatusTransition { .. }
            | WalletError::MissingStudentId => StatusCode::BAD_REQUEST,
            WalletError::MissingActorHeader(_) | WalletError::UnknownRole(_) => {
                StatusCode::UNAUTHORIZED
            }
            WalletError::NotAuthorized(_) => StatusCode::FORBIDDEN,
            WalletError::WalletNotFound(_) => StatusCode::NOT_FOUND,
            WalletError::ConcurrencyConflict(_) | WalletError::TxIdCollision(_) => {
                StatusCode::CONFLICT
            }
            WalletError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            WalletError::StorageError(_) | WalletError::AuditLogError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
