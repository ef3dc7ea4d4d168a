use brandflow_application::{AuthService, PortalService, WebhookIntakeService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub webhook_service: WebhookIntakeService,
    pub auth_service: AuthService,
    pub portal_service: PortalService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
}
