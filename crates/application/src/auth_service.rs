//! Sign-in flows delegated to the hosted auth provider.
//!
//! Inputs are validated locally so malformed credentials never reach the
//! provider; provider rejections surface as `AppError::Unauthorized`.

use std::sync::Arc;

use brandflow_core::{AppError, AppResult};
use brandflow_domain::{EmailAddress, validate_sign_in_password, validate_sign_up_password};

use crate::{AuthProvider, AuthSession, OAuthAuthorization, SignUpOutcome};

/// External identity provider used for social sign-in.
pub const OAUTH_PROVIDER_GOOGLE: &str = "google";

/// Application service for authentication.
#[derive(Clone)]
pub struct AuthService {
    auth_provider: Arc<dyn AuthProvider>,
    callback_url: String,
}

impl AuthService {
    /// Creates a new auth service redirecting OAuth flows to `callback_url`.
    #[must_use]
    pub fn new(auth_provider: Arc<dyn AuthProvider>, callback_url: impl Into<String>) -> Self {
        Self {
            auth_provider,
            callback_url: callback_url.into(),
        }
    }

    /// Starts Google sign-in.
    pub async fn begin_google_sign_in(&self) -> AppResult<OAuthAuthorization> {
        self.auth_provider
            .begin_oauth(OAUTH_PROVIDER_GOOGLE, self.callback_url.as_str())
            .await
    }

    /// Completes an OAuth sign-in from the callback query.
    ///
    /// A missing code is a validation error; a missing verifier means the
    /// flow was not started in this session.
    pub async fn complete_oauth(
        &self,
        code: Option<&str>,
        code_verifier: Option<&str>,
    ) -> AppResult<AuthSession> {
        let Some(code) = code.map(str::trim).filter(|code| !code.is_empty()) else {
            return Err(AppError::Validation("Missing code parameter".to_owned()));
        };

        let Some(code_verifier) = code_verifier else {
            return Err(AppError::Unauthorized(
                "sign-in was not started from this browser session".to_owned(),
            ));
        };

        self.auth_provider.exchange_code(code, code_verifier).await
    }

    /// Signs in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = EmailAddress::new(email)?;
        validate_sign_in_password(password)?;

        self.auth_provider
            .sign_in_with_password(email.as_str(), password)
            .await
    }

    /// Registers a new user.
    pub async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUpOutcome> {
        let email = EmailAddress::new(email)?;
        validate_sign_up_password(password)?;

        self.auth_provider.sign_up(email.as_str(), password).await
    }

    /// Revokes the provider session.
    pub async fn sign_out(&self, session: &AuthSession) -> AppResult<()> {
        self.auth_provider
            .sign_out(session.access_token.as_str())
            .await
    }
}
