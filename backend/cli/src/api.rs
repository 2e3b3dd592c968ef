use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::error;

use cardhook_core::{Authorization, HookError, Transaction};
use cardhook_hooks::HookDispatcher;

/// Shared application state for API handlers.
pub struct AppState {
    pub dispatcher: HookDispatcher,
}

/// Build the Axum router with the three hook endpoints.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/hooks/before-transaction", post(before_transaction))
        .route("/hooks/after-transaction", post(after_transaction))
        .route("/hooks/after-decline", post(after_decline))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "cardhook",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn before_transaction(
    State(state): State<Arc<AppState>>,
    Json(authorization): Json<Authorization>,
) -> Json<Value> {
    let allow = state.dispatcher.before_transaction(&authorization).await;
    Json(json!({ "allow": allow }))
}

async fn after_transaction(
    State(state): State<Arc<AppState>>,
    Json(transaction): Json<Transaction>,
) -> Response {
    match state.dispatcher.after_transaction(&transaction).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            error!(error = %e, "after_transaction failed");
            let status = match &e {
                HookError::Cancelled(_) => StatusCode::GATEWAY_TIMEOUT,
                HookError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

async fn after_decline(
    State(state): State<Arc<AppState>>,
    Json(transaction): Json<Transaction>,
) -> StatusCode {
    state.dispatcher.after_decline(&transaction).await;
    StatusCode::NO_CONTENT
}
