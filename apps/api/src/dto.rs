mod auth;
mod common;
mod portal;
mod webhooks;

pub use auth::{
    AuthLoginRequest, AuthRegisterRequest, AuthRegisterResponse, OAuthCallbackQuery,
    UserIdentityResponse,
};
pub use common::{HealthDependencyStatus, HealthResponse};
pub use portal::{
    AutomationMetricsResponse, CrmMetricsResponse, DashboardMetricsResponse, DashboardResponse,
    LeadMetricsResponse,
};
pub use webhooks::{ContactIntakeResponse, WebhookAcceptedResponse, ZapierWebhookRequest};
