use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use brandflow_core::{AppError, ClientId};
use tracing_subscriber::EnvFilter;

/// How inbound webhooks are authenticated, as configured.
#[derive(Clone)]
pub enum WebhookSigningConfig {
    /// HMAC-SHA256 with the shared secret.
    Secret(String),
    /// No secret; unsigned intake was explicitly allowed.
    Unsigned,
}

impl std::fmt::Debug for WebhookSigningConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secret(_) => formatter.write_str("Secret(<redacted>)"),
            Self::Unsigned => formatter.write_str("Unsigned"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub webhook_signing: WebhookSigningConfig,
    pub webhook_client_id: Option<ClientId>,
    pub frontend_url: String,
    pub auth_callback_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub auth_http_timeout: Duration,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let supabase_url = required_non_empty_env("SUPABASE_URL")?;
        let supabase_anon_key = required_non_empty_env("SUPABASE_ANON_KEY")?;

        let webhook_signing = webhook_signing_from(
            optional_non_empty_env("WEBHOOK_SECRET"),
            flag_env("WEBHOOK_ALLOW_UNSIGNED"),
        )?;
        let webhook_client_id = optional_non_empty_env("WEBHOOK_CLIENT_ID")
            .map(|value| {
                ClientId::from_str(value.trim()).map_err(|error| {
                    AppError::Validation(format!("invalid WEBHOOK_CLIENT_ID: {error}"))
                })
            })
            .transpose()?;

        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned())
            .trim_end_matches('/')
            .to_owned();
        let auth_callback_url = optional_non_empty_env("AUTH_CALLBACK_URL")
            .unwrap_or_else(|| format!("{frontend_url}/api/auth/callback"));

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let cookie_secure = flag_env("SESSION_COOKIE_SECURE");
        let auth_http_timeout = Duration::from_secs(
            env::var("AUTH_HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|seconds| *seconds > 0)
                .unwrap_or(10),
        );

        Ok(Self {
            migrate_only,
            database_url,
            supabase_url,
            supabase_anon_key,
            webhook_signing,
            webhook_client_id,
            frontend_url,
            auth_callback_url,
            api_host,
            api_port,
            cookie_secure,
            auth_http_timeout,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn webhook_signing_from(
    secret: Option<String>,
    allow_unsigned: bool,
) -> Result<WebhookSigningConfig, AppError> {
    match secret {
        Some(secret) => Ok(WebhookSigningConfig::Secret(secret)),
        None if allow_unsigned => Ok(WebhookSigningConfig::Unsigned),
        None => Err(AppError::Validation(
            "WEBHOOK_SECRET is required unless WEBHOOK_ALLOW_UNSIGNED=true".to_owned(),
        )),
    }
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn optional_non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn flag_env(name: &str) -> bool {
    env::var(name)
        .unwrap_or_else(|_| "false".to_owned())
        .trim()
        .eq_ignore_ascii_case("true")
}
