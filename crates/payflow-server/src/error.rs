//! API error taxonomy and HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use payflow_gateway::GatewayError;

/// Request-level failures surfaced to API callers.
///
/// Store operations never fail and absence is a normal outcome, so the only
/// error sources are missing input, upstream trouble, and lookup misses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required input field is missing; nothing was mutated.
    #[error("{0}")]
    Validation(String),

    /// A lookup missed.
    #[error("{0}")]
    NotFound(String),

    /// The gateway call failed; no local state was mutated.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Gateway(err) => {
                // The raw upstream body stays in the logs, not the reply.
                tracing::error!(error = %err, "gateway call failed");
                let message = match err {
                    GatewayError::Transport(_) => "Payment gateway unreachable",
                    GatewayError::Upstream { .. } => "Payment gateway rejected the request",
                    GatewayError::Malformed { .. } => "Invalid response from payment gateway",
                };
                (StatusCode::BAD_GATEWAY, message.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = ApiError::Validation("Amount is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("Transaction not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_gateway_maps_to_502() {
        let err = ApiError::Gateway(GatewayError::Upstream {
            status: 500,
            body: "{}".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
