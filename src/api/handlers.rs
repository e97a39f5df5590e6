use crate::{
    api::models::*,
    error::WalletError,
    logger::in_memory::InMemoryAuditLogger,
    models::transaction::TxCategory,
    policy::{Actor, Role, RoleAccessPolicy},
    service::{BalanceSummary, LedgerService},
    storage::in_memory::InMemoryWalletStore,
};
use axum::{
    Extension, Json, Router,
    extract::{Query, Request, State},
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post, put},
};
use http::HeaderMap;
use std::sync::Arc;

pub type WalletService = LedgerService<InMemoryWalletStore, RoleAccessPolicy, InMemoryAuditLogger>;

fn required_header(headers: &HeaderMap, name: &str) -> Result<String, WalletError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| WalletError::MissingActorHeader(name.to_string()))
}

/// Authentication happens upstream; the gateway forwards the verified
/// identity in `x-actor-id`, `x-actor-role`, `x-school-id`.
async fn actor_middleware(mut req: Request, next: Next) -> Result<impl IntoResponse, ApiError> {
    let user_id = required_header(req.headers(), "x-actor-id")?;
    let role_raw = required_header(req.headers(), "x-actor-role")?;
    let school_id = required_header(req.headers(), "x-school-id")?;
    let role: Role = role_raw.parse().map_err(WalletError::UnknownRole)?;

    req.extensions_mut().insert(Actor {
        user_id,
        role,
        school_id,
    });
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(service: Arc<WalletService>) -> Router {
    Router::new()
        .route("/wallet", get(get_wallet))
        .route("/wallet/transactions", get(get_wallet_transactions))
        .route("/wallet/recharge", post(recharge_wallet))
        .route("/wallet/deduct", post(deduct_wallet))
        .route("/wallet/status", put(set_wallet_status))
        .route_layer(middleware::from_fn(actor_middleware))
        .with_state(service)
}

#[utoipa::path(
    get,
    path = "/wallet",
    params(
        ("studentId" = String, Query, description = "ID of the student whose wallet to read")
    ),
    responses(
        (status = 200, description = "Balance retrieved successfully", body = BalanceSummary),
        (status = 400, description = "Missing studentId", body = ErrorResponse),
        (status = 401, description = "Missing or malformed actor headers", body = ErrorResponse),
        (status = 403, description = "Role not allowed to view this wallet", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_wallet(
    State(service): State<Arc<WalletService>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<WalletQuery>,
) -> Result<Json<BalanceSummary>, ApiError> {
    let student_id = query.student_id.ok_or(WalletError::MissingStudentId)?;
    let summary = service
        .get_balance(&actor.school_id, &student_id, &actor)
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/wallet/transactions",
    params(
        ("studentId" = String, Query, description = "ID of the student whose history to read"),
        ("page" = Option<u64>, Query, description = "1-indexed page, defaults to 1"),
        ("limit" = Option<u64>, Query, description = "Page size, defaults to 10")
    ),
    responses(
        (status = 200, description = "History page retrieved successfully", body = HistoryResponse),
        (status = 400, description = "Missing studentId", body = ErrorResponse),
        (status = 403, description = "Role not allowed to view this wallet", body = ErrorResponse),
        (status = 404, description = "Wallet not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_wallet_transactions(
    State(service): State<Arc<WalletService>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let student_id = query.student_id.ok_or(WalletError::MissingStudentId)?;
    let page = service
        .get_transactions(&actor.school_id, &student_id, query.page, query.limit, &actor)
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    post,
    path = "/wallet/recharge",
    request_body = RechargeRequest,
    responses(
        (status = 200, description = "Wallet recharged successfully", body = MutationResponse),
        (status = 400, description = "Invalid amount or wallet not active", body = ErrorResponse),
        (status = 403, description = "Role not allowed to recharge", body = ErrorResponse),
        (status = 409, description = "Concurrent updates, retries exhausted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn recharge_wallet(
    State(service): State<Arc<WalletService>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<RechargeRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let (new_balance, _tx_id) = service
        .credit(
            &actor.school_id,
            &req.student_id,
            req.amount,
            TxCategory::Recharge,
            req.description,
            req.reference_id,
            &actor,
        )
        .await?;
    Ok(Json(MutationResponse {
        message: "Wallet recharged".to_string(),
        new_balance,
    }))
}

#[utoipa::path(
    post,
    path = "/wallet/deduct",
    request_body = DeductRequest,
    responses(
        (status = 200, description = "Amount deducted successfully", body = MutationResponse),
        (status = 400, description = "Invalid amount, insufficient balance, or wallet not active", body = ErrorResponse),
        (status = 403, description = "Role not allowed to deduct", body = ErrorResponse),
        (status = 404, description = "Wallet not found", body = ErrorResponse),
        (status = 409, description = "Concurrent updates, retries exhausted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn deduct_wallet(
    State(service): State<Arc<WalletService>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<DeductRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let (new_balance, _tx_id) = service
        .debit(
            &actor.school_id,
            &req.student_id,
            req.amount,
            req.category.unwrap_or(TxCategory::Other),
            req.description,
            req.reference_id,
            &actor,
        )
        .await?;
    Ok(Json(MutationResponse {
        message: "Amount deducted".to_string(),
        new_balance,
    }))
}

#[utoipa::path(
    put,
    path = "/wallet/status",
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Wallet status updated", body = MessageResponse),
        (status = 400, description = "Invalid status transition", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Wallet not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn set_wallet_status(
    State(service): State<Arc<WalletService>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let wallet = service
        .set_status(&actor.school_id, &req.student_id, req.status, &actor)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("Wallet status updated to {}", wallet.status),
    }))
}
