//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_ports;
mod auth_service;
mod portal_service;
mod record_ports;
mod webhook_ports;
mod webhook_service;

pub use auth_ports::{AuthProvider, AuthSession, OAuthAuthorization, SignUpOutcome};
pub use auth_service::{AuthService, OAUTH_PROVIDER_GOOGLE};
pub use portal_service::{ClientDashboard, PortalService};
pub use record_ports::{
    FieldCondition, RecordFilter, RecordOrder, RecordQuery, RecordStore, StoreTable,
};
pub use webhook_ports::{WebhookSignaturePolicy, WebhookSignatureVerifier};
pub use webhook_service::{WebhookIntakeService, WebhookOutcome};
