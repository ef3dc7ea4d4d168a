use axum::Router;
use axum::routing::{get, post};

use crate::auth;
use crate::state::AppState;

pub(super) fn build_public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/oauth/google", get(auth::oauth_google_handler))
        .route("/api/auth/callback", get(auth::oauth_callback_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/logout", post(auth::logout_handler))
}
