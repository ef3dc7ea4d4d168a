use brandflow_application::AuthSession;
use brandflow_core::AppError;
use tower_sessions::Session;

use super::{SESSION_CREATED_AT_KEY, SESSION_PROVIDER_SESSION_KEY, SESSION_USER_KEY};

/// Rotates the session id and stores the signed-in user.
pub(super) async fn establish_session(
    session: &Session,
    auth_session: &AuthSession,
) -> Result<(), AppError> {
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &auth_session.identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_PROVIDER_SESSION_KEY, auth_session)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist provider session: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    Ok(())
}
