use utoipa::OpenApi;

use crate::{
    api::models::{
        DeductRequest, ErrorResponse, HistoryResponse, MessageResponse, MutationResponse,
        RechargeRequest, SetStatusRequest,
    },
    models::{
        transaction::{TxCategory, TxKind, WalletTransaction},
        wallet::WalletStatus,
    },
    service::{BalanceSummary, TransactionPage},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::get_wallet,
        super::handlers::get_wallet_transactions,
        super::handlers::recharge_wallet,
        super::handlers::deduct_wallet,
        super::handlers::set_wallet_status
    ),
    components(schemas(
        RechargeRequest,
        DeductRequest,
        SetStatusRequest,
        MutationResponse,
        MessageResponse,
        HistoryResponse,
        ErrorResponse,
        BalanceSummary,
        TransactionPage,
        WalletTransaction,
        WalletStatus,
        TxKind,
        TxCategory
    )),
    info(
        title = "Eduwallet API",
        description = "Student wallet ledger: balances, credits, debits, status",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
