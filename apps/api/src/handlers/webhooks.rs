//! Automation-platform webhook intake.
//!
//! Both endpoints authenticate the raw body before parsing it, so the
//! signature covers exactly the bytes the platform sent.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use brandflow_application::WebhookOutcome;
use brandflow_core::AppError;
use brandflow_domain::{ContactSubmission, WebhookEvent};
use serde_json::Value;
use tracing::{info, warn};

use crate::dto::{ContactIntakeResponse, WebhookAcceptedResponse, ZapierWebhookRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 of the request body.
pub const SIGNATURE_HEADER: &str = "x-zapier-signature";

fn authenticate(state: &AppState, headers: &HeaderMap, body: &[u8]) -> ApiResult<()> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    state
        .webhook_service
        .verify_signature(body, signature)
        .map_err(|error| {
            warn!(
                signature_present = signature.is_some(),
                "rejected webhook with invalid signature"
            );
            ApiError::from(error)
        })
}

/// POST /api/webhooks/zapier - Apply one automation event.
pub async fn zapier_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAcceptedResponse>> {
    authenticate(&state, &headers, &body)?;

    let request: ZapierWebhookRequest = serde_json::from_slice(&body)
        .map_err(|error| AppError::Validation(format!("invalid webhook payload: {error}")))?;

    let event_type = request.event_type_name();
    let outcome = state
        .webhook_service
        .handle_event(WebhookEvent::new(&event_type, request.data))
        .await?;

    match outcome {
        WebhookOutcome::Inserted { table } => {
            info!(%event_type, table, "webhook event recorded");
        }
        WebhookOutcome::Updated {
            external_id,
            matched_rows: 0,
        } => {
            warn!(%external_id, "automation_update matched no automation");
        }
        WebhookOutcome::Updated {
            external_id,
            matched_rows,
        } => {
            info!(%external_id, matched_rows, "automation counters updated");
        }
        WebhookOutcome::Unchanged { external_id } => {
            info!(%external_id, "automation_update carried no counters");
        }
        WebhookOutcome::Ignored { .. } => {
            info!(%event_type, "ignoring unhandled webhook event type");
        }
    }

    Ok(Json(WebhookAcceptedResponse { success: true }))
}

/// POST /api/webhooks/zapier/contacts - Store one contact.
pub async fn zapier_contact_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ContactIntakeResponse>> {
    authenticate(&state, &headers, &body)?;

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|error| AppError::Validation(format!("invalid contact payload: {error}")))?;
    let contact = ContactSubmission::from_body(&payload)?;

    let stored = state.webhook_service.ingest_contact(contact).await?;
    info!("contact recorded");

    Ok(Json(ContactIntakeResponse {
        success: true,
        data: stored,
    }))
}

/// Any non-POST method on a webhook route.
pub async fn method_not_allowed_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
}
