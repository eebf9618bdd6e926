use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_core::error::AppError;
use serde_json::json;
use validator::Validate;

use crate::models::ContactMessage;
use crate::services::{compose_contact_email, record_relay_request};
use crate::startup::AppState;

/// POST /api/send-email — compose a contact-form message and dispatch it to
/// the operator's address. A single attempt; any transport failure is logged
/// and collapsed to a generic 500.
#[tracing::instrument(skip(state, request))]
pub async fn send_contact_email(
    State(state): State<AppState>,
    Json(request): Json<ContactMessage>,
) -> Result<Response, AppError> {
    request.validate()?;

    let envelope = compose_contact_email(&request, &state.config.contact.recipient);

    match state.email_provider.send(&envelope).await {
        Ok(()) => {
            record_relay_request("send_email", "ok");
            tracing::info!(to = %envelope.to, "Contact email dispatched");

            Ok((
                StatusCode::OK,
                Json(json!({ "message": "Email sent successfully!" })),
            )
                .into_response())
        }
        Err(e) => {
            record_relay_request("send_email", "error");
            tracing::error!(error = %e, "Failed to send contact email");

            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Failed to send email." })),
            )
                .into_response())
        }
    }
}
