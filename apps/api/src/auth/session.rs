use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use brandflow_application::AuthSession;
use brandflow_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::warn;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_PROVIDER_SESSION_KEY;

/// POST /auth/logout - Revoke the provider session and clear the cookie session.
pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<StatusCode> {
    let provider_session = session
        .get::<AuthSession>(SESSION_PROVIDER_SESSION_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read provider session: {error}"))
        })?;

    if let Some(provider_session) = provider_session
        && let Err(error) = state.auth_service.sign_out(&provider_session).await
    {
        warn!(
            subject = provider_session.identity.subject(),
            %error,
            "failed to revoke provider session"
        );
    }

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Current user.
pub async fn me_handler(Extension(identity): Extension<UserIdentity>) -> Json<UserIdentityResponse> {
    Json(UserIdentityResponse::from(&identity))
}
