//! HTTP API for the payment service.
//!
//! Thin boundary layer: request validation, routing, and response shaping.
//! All reconciliation semantics live in `payflow-core`, `checkout`, and
//! `webhook`.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use payflow_core::resolver::{resolve_return, ReturnFlow};
use payflow_core::types::{Receipt, TransactionId, TransactionStatus};
use payflow_gateway::types::{CaptureResponse, TransactionInfo};
use payflow_gateway::NotificationEvent;

use crate::checkout;
use crate::error::ApiError;
use crate::state::AppState;
use crate::webhook;

// --- Request / response types ---

#[derive(Deserialize)]
pub struct InitRequest {
    pub amount: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    pub success: bool,
    pub token: String,
    pub redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

#[derive(Deserialize)]
pub struct AssertApiRequest {
    pub token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertApiResponse {
    pub success: bool,
    pub status: TransactionStatus,
    pub message: String,
    pub transaction: TransactionInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureApiRequest {
    pub transaction_id: Option<String>,
    pub amount: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    pub capture: CaptureResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

// --- Handlers ---

async fn handle_init(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InitRequest>,
) -> Result<Json<InitResponse>, ApiError> {
    let amount = match req.amount {
        Some(amount) if amount > 0 => amount,
        _ => return Err(ApiError::Validation("Amount is required".into())),
    };

    let initiated = checkout::start_payment(&state, amount).await?;
    Ok(Json(InitResponse {
        success: true,
        token: initiated.token,
        redirect_url: initiated.redirect_url,
        expiration: initiated.expiration,
    }))
}

async fn handle_assert(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssertApiRequest>,
) -> Result<Json<AssertApiResponse>, ApiError> {
    let token = match req.token {
        Some(token) if !token.is_empty() => token,
        _ => return Err(ApiError::Validation("Token is required".into())),
    };

    let outcome = state.gateway.assert_session(&token).await?;
    let (success, message) = match outcome.status {
        TransactionStatus::Authorized => (true, "Payment authorized"),
        TransactionStatus::Pending => (true, "Waiting for bank transfer"),
        _ => (false, "Payment not successful"),
    };

    Ok(Json(AssertApiResponse {
        success,
        status: outcome.status,
        message: message.to_string(),
        transaction: outcome.transaction,
    }))
}

async fn handle_capture(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CaptureApiRequest>,
) -> Result<Json<CaptureApiResponse>, ApiError> {
    let transaction_id = match req.transaction_id {
        Some(id) if !id.is_empty() => TransactionId(id),
        _ => return Err(ApiError::Validation("TransactionId is required".into())),
    };
    let amount = match req.amount {
        Some(amount) if amount > 0 => amount,
        _ => return Err(ApiError::Validation("Amount is required".into())),
    };

    let captured = checkout::capture_payment(&state, transaction_id, amount).await?;
    Ok(Json(CaptureApiResponse {
        success: true,
        transaction_id: captured.transaction_id,
        capture: captured.capture,
        redirect_url: captured.receipt_url,
    }))
}

async fn handle_return_success(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Redirect {
    tracing::info!(?params, "success return received");
    Redirect::to(resolve_return(ReturnFlow::Success, &params, &state.sessions).target())
}

async fn handle_return_fail(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Redirect {
    Redirect::to(resolve_return(ReturnFlow::Fail, &params, &state.sessions).target())
}

async fn handle_return_abort(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Redirect {
    Redirect::to(resolve_return(ReturnFlow::Abort, &params, &state.sessions).target())
}

/// The gateway only cares that we received the notification; processing
/// failures are local concerns. No JSON extractor here: an unparseable
/// body must still be acknowledged.
async fn handle_notification(State(state): State<Arc<AppState>>, body: Bytes) -> &'static str {
    match serde_json::from_slice::<NotificationEvent>(&body) {
        Ok(event) => {
            webhook::reconcile(&state.receipts, &event);
        }
        Err(err) => {
            tracing::warn!(error = %err, "unparseable notification body, acknowledging anyway");
        }
    }
    "OK"
}

async fn handle_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Receipt>, ApiError> {
    state
        .receipts
        .get(&TransactionId(id))
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))
}

// --- Server ---

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/payments/init", post(handle_init))
        .route("/api/payments/assert", post(handle_assert))
        .route("/api/payments/capture", post(handle_capture))
        .route("/api/payments/return/success", get(handle_return_success))
        .route("/api/payments/return/fail", get(handle_return_fail))
        .route("/api/payments/return/abort", get(handle_return_abort))
        .route("/api/payments/notification", post(handle_notification))
        .route("/api/payments/transaction/{id}", get(handle_transaction))
        .with_state(state)
}

pub async fn start_api_server(listen_addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
