use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use brandflow_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::auth::{SESSION_ABSOLUTE_LIFETIME_SECONDS, SESSION_CREATED_AT_KEY, SESSION_USER_KEY};
use crate::error::ApiResult;
use crate::state::AppState;

/// Rejects requests without a signed-in user and exposes the identity to handlers.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let created_at = session
        .get::<i64>(SESSION_CREATED_AT_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session age: {error}")))?;
    if session_outlived(created_at, chrono::Utc::now().timestamp()) {
        session
            .flush()
            .await
            .map_err(|error| AppError::Internal(format!("failed to end session: {error}")))?;
        return Err(AppError::Unauthorized("session expired".to_owned()).into());
    }

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Blocks state-changing browser requests that do not originate from the frontend.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if headers
            .get("sec-fetch-site")
            .is_some_and(|fetch_site| fetch_site == HeaderValue::from_static("cross-site"))
        {
            return Err(AppError::Forbidden("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url.as_str();
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer == allowed_origin
            || referer
                .strip_prefix(allowed_origin)
                .is_some_and(|rest| rest.starts_with('/'));

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Forbidden("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

/// A session without a creation time predates timeout tracking and is treated as expired.
fn session_outlived(created_at: Option<i64>, now: i64) -> bool {
    created_at.is_none_or(|created_at| now - created_at > SESSION_ABSOLUTE_LIFETIME_SECONDS)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
