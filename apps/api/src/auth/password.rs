use axum::Json;
use axum::extract::State;
use tower_sessions::Session;
use tracing::info;

use crate::dto::{
    AuthLoginRequest as LoginRequest, AuthRegisterRequest as RegisterRequest,
    AuthRegisterResponse as RegisterResponse, UserIdentityResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::establish_session;
use super::{SIGN_UP_COMPLETE_MESSAGE, SIGN_UP_CONFIRMATION_MESSAGE};

/// POST /auth/login - Authenticate with email+password.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let auth_session = state
        .auth_service
        .sign_in(&payload.email, &payload.password)
        .await?;

    establish_session(&session, &auth_session).await?;
    info!(subject = auth_session.identity.subject(), "password sign-in completed");

    Ok(Json(UserIdentityResponse::from(&auth_session.identity)))
}

/// POST /auth/register - Create a new account with email+password.
pub async fn register_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let outcome = state
        .auth_service
        .sign_up(&payload.email, &payload.password)
        .await?;

    if let Some(auth_session) = &outcome.session {
        establish_session(&session, auth_session).await?;
    }

    let confirmation_pending = outcome.confirmation_pending();
    info!(
        subject = outcome.identity.subject(),
        confirmation_pending, "account registered"
    );

    let message = if confirmation_pending {
        SIGN_UP_CONFIRMATION_MESSAGE
    } else {
        SIGN_UP_COMPLETE_MESSAGE
    };

    Ok(Json(RegisterResponse {
        user: UserIdentityResponse::from(&outcome.identity),
        confirmation_pending,
        message: message.to_owned(),
    }))
}
