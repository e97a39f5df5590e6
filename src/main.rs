use axum::{Router, routing::get};
use eduwallet::api::handlers::api_routes;
use eduwallet::api::openapi::ApiDoc;
use eduwallet::config::CONFIG;
use eduwallet::logger::in_memory::InMemoryAuditLogger;
use eduwallet::policy::RoleAccessPolicy;
use eduwallet::service::LedgerService;
use eduwallet::storage::in_memory::InMemoryWalletStore;
use http::header;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(CONFIG.log_level.as_str())
        .init();

    // Wire the ledger with in-memory backends
    let storage = InMemoryWalletStore::new();
    let audit = InMemoryAuditLogger::new();
    let service = Arc::new(LedgerService::new(
        storage,
        RoleAccessPolicy,
        audit,
        Duration::from_millis(CONFIG.op_timeout_ms),
    ));

    let app = Router::new()
        // add / route with a simple health check
        .route("/", get(|| async { "OK" }))
        .merge(api_routes(service))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30))) // 30-second timeout
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http()); // Request tracing

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
