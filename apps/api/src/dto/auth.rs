use brandflow_core::UserIdentity;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for email/password registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-register-request.ts"
)]
pub struct AuthRegisterRequest {
    pub email: String,
    pub password: String,
}

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-register-response.ts"
)]
pub struct AuthRegisterResponse {
    pub user: UserIdentityResponse,
    /// True until the user follows the emailed confirmation link.
    pub confirmation_pending: bool,
    pub message: String,
}

/// Query string the auth provider appends to the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub email: Option<String>,
}

impl From<&UserIdentity> for UserIdentityResponse {
    fn from(identity: &UserIdentity) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
        }
    }
}
