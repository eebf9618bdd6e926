use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::ChatRequest;
use crate::services::providers::ProviderError;
use crate::services::record_relay_request;
use crate::startup::AppState;

/// POST /api/chat — forward a conversation history to the Gemini API and
/// relay the reply. Upstream errors pass through with their original status;
/// everything else collapses to a generic 500.
#[tracing::instrument(skip(state, request))]
pub async fn relay_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    match state.chat_provider.generate(&request.chat_history).await {
        Ok(body) => {
            record_relay_request("chat", "ok");
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(ProviderError::Upstream { status, body }) => {
            record_relay_request("chat", "upstream_error");
            tracing::warn!(status, "Gemini API returned an error");

            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(json!({ "message": "Error from Gemini API", "details": body })),
            )
                .into_response()
        }
        Err(e) => {
            record_relay_request("chat", "internal_error");
            tracing::error!(error = %e, "Chat relay failed");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}
