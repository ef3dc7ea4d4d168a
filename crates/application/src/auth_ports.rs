use async_trait::async_trait;
use brandflow_core::{AppResult, UserIdentity};
use serde::{Deserialize, Serialize};

/// Authorization redirect produced when starting an OAuth sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthAuthorization {
    /// Provider URL the browser is sent to.
    pub authorize_url: String,
    /// PKCE verifier that must be presented when the code is exchanged.
    pub code_verifier: String,
}

/// Signed-in provider session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Identity of the signed-in user.
    pub identity: UserIdentity,
    /// Provider access token, used for sign-out.
    pub access_token: String,
    /// Provider refresh token.
    pub refresh_token: Option<String>,
}

/// Result of a sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    /// Identity created by the provider.
    pub identity: UserIdentity,
    /// Present when the provider signs the user in immediately.
    pub session: Option<AuthSession>,
}

impl SignUpOutcome {
    /// Returns whether the user still has to confirm their email address.
    #[must_use]
    pub fn confirmation_pending(&self) -> bool {
        self.session.is_none()
    }
}

/// Hosted authentication provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Builds the authorize redirect for an external identity provider.
    async fn begin_oauth(&self, provider: &str, redirect_to: &str)
    -> AppResult<OAuthAuthorization>;

    /// Exchanges an authorization code and its PKCE verifier for a session.
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> AppResult<AuthSession>;

    /// Signs in with email and password.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Registers a new email/password user.
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUpOutcome>;

    /// Revokes the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;
}
