mod oauth;
mod password;
mod session;
mod session_helpers;

pub use oauth::{oauth_callback_handler, oauth_google_handler};
pub use password::{login_handler, register_handler};
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
/// Session creation timestamp for absolute timeout enforcement.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
/// Sessions end this long after sign-in regardless of activity.
pub const SESSION_ABSOLUTE_LIFETIME_SECONDS: i64 = 12 * 60 * 60;
pub(super) const SESSION_PROVIDER_SESSION_KEY: &str = "provider_session";
pub(super) const SESSION_PKCE_VERIFIER_KEY: &str = "oauth_pkce_verifier";

pub(super) const SIGN_UP_CONFIRMATION_MESSAGE: &str = "Check your email for the confirmation link!";
pub(super) const SIGN_UP_COMPLETE_MESSAGE: &str = "Account created and signed in.";
