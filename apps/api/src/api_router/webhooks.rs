use axum::Router;
use axum::routing::post;

use crate::handlers::webhooks::{
    method_not_allowed_handler, zapier_contact_handler, zapier_webhook_handler,
};
use crate::state::AppState;

pub(super) fn build_webhook_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/webhooks/zapier",
            post(zapier_webhook_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/api/webhooks/zapier/contacts",
            post(zapier_contact_handler).fallback(method_not_allowed_handler),
        )
}
