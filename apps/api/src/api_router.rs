use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use brandflow_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;
mod public_auth;
mod webhooks;

use cors::build_cors_layer;
use public_auth::build_public_auth_routes;
use webhooks::build_webhook_routes;

/// Assembles every route with tracing, CORS and the session layer.
pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/portal/dashboard",
            get(handlers::portal::dashboard_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = build_cors_layer(frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(build_public_auth_routes())
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        // Server-to-server callers send no Origin; signatures guard these routes instead.
        .merge(build_webhook_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
