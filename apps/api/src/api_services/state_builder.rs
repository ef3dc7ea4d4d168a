use std::sync::Arc;

use brandflow_application::{
    AuthService, PortalService, RecordStore, WebhookIntakeService, WebhookSignaturePolicy,
};
use brandflow_core::AppError;
use brandflow_infrastructure::{
    HmacSha256SignatureVerifier, PostgresRecordStore, SupabaseAuthProvider,
};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, WebhookSigningConfig};
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let record_store: Arc<dyn RecordStore> = Arc::new(PostgresRecordStore::new(pool.clone()));

    let http_client = reqwest::Client::builder()
        .timeout(config.auth_http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;
    let auth_provider = SupabaseAuthProvider::new(
        http_client,
        config.supabase_url.as_str(),
        config.supabase_anon_key.as_str(),
    )?;

    let mut webhook_service = WebhookIntakeService::new(
        record_store.clone(),
        webhook_signature_policy(&config.webhook_signing)?,
    );
    if let Some(client_id) = config.webhook_client_id {
        webhook_service = webhook_service.with_bound_client(client_id);
    }
    if webhook_service.signature_policy().is_open() {
        warn!("WEBHOOK_SECRET is not set; accepting unsigned webhooks");
    }
    if let Some(client_id) = webhook_service.bound_client_id() {
        info!(%client_id, "webhook mutations are bound to a single client");
    }

    Ok(AppState {
        webhook_service,
        auth_service: AuthService::new(
            Arc::new(auth_provider),
            config.auth_callback_url.as_str(),
        ),
        portal_service: PortalService::new(record_store),
        postgres_pool: pool,
        frontend_url: config.frontend_url.clone(),
    })
}

fn webhook_signature_policy(
    signing: &WebhookSigningConfig,
) -> Result<WebhookSignaturePolicy, AppError> {
    match signing {
        WebhookSigningConfig::Secret(secret) => Ok(WebhookSignaturePolicy::Required(Arc::new(
            HmacSha256SignatureVerifier::new(secret.as_bytes())?,
        ))),
        WebhookSigningConfig::Unsigned => Ok(WebhookSignaturePolicy::Open),
    }
}

#[cfg(test)]
mod tests {
    use super::webhook_signature_policy;
    use crate::api_config::WebhookSigningConfig;

    #[test]
    fn secret_requires_signatures() {
        let Ok(policy) = webhook_signature_policy(&WebhookSigningConfig::Secret("s".to_owned()))
        else {
            panic!("secret should build a verifier");
        };
        assert!(!policy.is_open());
    }

    #[test]
    fn unsigned_opt_in_is_open() {
        let Ok(policy) = webhook_signature_policy(&WebhookSigningConfig::Unsigned) else {
            panic!("unsigned policy should build");
        };
        assert!(policy.is_open());
    }
}
