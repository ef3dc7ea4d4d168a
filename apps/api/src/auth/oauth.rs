use axum::extract::{Query, State};
use axum::response::Redirect;
use brandflow_core::AppError;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::dto::OAuthCallbackQuery;
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_PKCE_VERIFIER_KEY;
use super::session_helpers::establish_session;

/// GET /auth/oauth/google - Redirect to the provider's Google sign-in.
pub async fn oauth_google_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Redirect> {
    let authorization = state.auth_service.begin_google_sign_in().await?;

    session
        .insert(SESSION_PKCE_VERIFIER_KEY, &authorization.code_verifier)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist oauth verifier: {error}"))
        })?;

    Ok(Redirect::to(authorization.authorize_url.as_str()))
}

/// GET /api/auth/callback - Exchange the provider code and start a session.
pub async fn oauth_callback_handler(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OAuthCallbackQuery>,
) -> ApiResult<Redirect> {
    let code_verifier = session
        .remove::<String>(SESSION_PKCE_VERIFIER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read oauth verifier: {error}")))?;

    let auth_session = state
        .auth_service
        .complete_oauth(query.code.as_deref(), code_verifier.as_deref())
        .await
        .inspect_err(|error| {
            if matches!(error, AppError::Unauthorized(_)) {
                warn!(%error, "oauth code exchange rejected");
            }
        })?;

    establish_session(&session, &auth_session).await?;
    info!(subject = auth_session.identity.subject(), "oauth sign-in completed");

    Ok(Redirect::to(format!("{}/", state.frontend_url).as_str()))
}
