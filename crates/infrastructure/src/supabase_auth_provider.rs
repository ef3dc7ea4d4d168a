use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use brandflow_application::{AuthProvider, AuthSession, OAuthAuthorization, SignUpOutcome};
use brandflow_core::{AppError, AppResult, UserIdentity};

/// Supabase GoTrue REST client.
#[derive(Clone)]
pub struct SupabaseAuthProvider {
    http_client: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: GoTrueUser,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GoTrueSignUpResponse {
    Session(GoTrueSession),
    User(GoTrueUser),
}

#[derive(Debug, Clone, Copy)]
enum Rejection {
    Unauthorized,
    Validation,
}

impl From<GoTrueUser> for UserIdentity {
    fn from(user: GoTrueUser) -> Self {
        UserIdentity::new(user.id, user.email)
    }
}

impl From<GoTrueSession> for AuthSession {
    fn from(session: GoTrueSession) -> Self {
        AuthSession {
            identity: session.user.into(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}

impl SupabaseAuthProvider {
    /// Creates a client for the project at `base_url` using its anonymous API key.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        anon_key: impl Into<String>,
    ) -> AppResult<Self> {
        let mut base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid auth provider url '{base_url}': {error}"))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(path.as_str());
        }

        Ok(Self {
            http_client,
            base_url,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(|error| {
            AppError::Internal(format!("failed to build auth provider url '{path}': {error}"))
        })
    }

    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> AppResult<Url> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "s256");
        Ok(url)
    }

    fn token_url(&self, grant_type: &str) -> AppResult<Url> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Value,
        rejection: Rejection,
    ) -> AppResult<T> {
        let response = self
            .http_client
            .post(url)
            .header("apikey", self.anon_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("auth provider transport error: {error}"))
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|error| {
                AppError::Internal(format!("auth provider returned malformed body: {error}"))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = provider_error_message(body.as_str())
            .unwrap_or_else(|| format!("auth provider rejected the request ({status})"));

        Err(if status.is_client_error() {
            match rejection {
                Rejection::Unauthorized => AppError::Unauthorized(message),
                Rejection::Validation => AppError::Validation(message),
            }
        } else {
            AppError::Internal(format!(
                "auth provider failed with status {status}: {message}"
            ))
        })
    }
}

/// Builds a fresh PKCE verifier and its S256 challenge.
fn pkce_pair() -> (String, String) {
    let verifier = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let challenge = pkce_challenge(verifier.as_str());
    (verifier, challenge)
}

fn pkce_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn provider_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(ToOwned::to_owned)
}

fn sign_up_outcome(response: GoTrueSignUpResponse) -> SignUpOutcome {
    match response {
        GoTrueSignUpResponse::Session(session) => {
            let session = AuthSession::from(session);
            SignUpOutcome {
                identity: session.identity.clone(),
                session: Some(session),
            }
        }
        GoTrueSignUpResponse::User(user) => SignUpOutcome {
            identity: user.into(),
            session: None,
        },
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthProvider {
    async fn begin_oauth(
        &self,
        provider: &str,
        redirect_to: &str,
    ) -> AppResult<OAuthAuthorization> {
        let (code_verifier, code_challenge) = pkce_pair();
        let authorize_url = self.authorize_url(provider, redirect_to, code_challenge.as_str())?;

        Ok(OAuthAuthorization {
            authorize_url: authorize_url.into(),
            code_verifier,
        })
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> AppResult<AuthSession> {
        let session: GoTrueSession = self
            .post_json(
                self.token_url("pkce")?,
                json!({ "auth_code": code, "code_verifier": code_verifier }),
                Rejection::Unauthorized,
            )
            .await?;

        Ok(session.into())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let session: GoTrueSession = self
            .post_json(
                self.token_url("password")?,
                json!({ "email": email, "password": password }),
                Rejection::Unauthorized,
            )
            .await?;

        Ok(session.into())
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUpOutcome> {
        let response: GoTrueSignUpResponse = self
            .post_json(
                self.endpoint("auth/v1/signup")?,
                json!({ "email": email, "password": password }),
                Rejection::Validation,
            )
            .await?;

        Ok(sign_up_outcome(response))
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.endpoint("auth/v1/logout")?)
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("auth provider transport error: {error}"))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            debug!("auth provider session was already expired at sign-out");
            return Ok(());
        }
        if status.is_success() {
            return Ok(());
        }

        Err(AppError::Internal(format!(
            "auth provider sign-out failed with status {status}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        GoTrueSignUpResponse, SupabaseAuthProvider, pkce_challenge, pkce_pair,
        provider_error_message, sign_up_outcome,
    };

    fn provider(base_url: &str) -> SupabaseAuthProvider {
        let Ok(provider) = SupabaseAuthProvider::new(reqwest::Client::new(), base_url, "anon")
        else {
            panic!("fixture url should parse");
        };
        provider
    }

    #[test]
    fn authorize_url_carries_pkce_parameters() {
        let provider = provider("https://project.supabase.co");
        let url = provider.authorize_url(
            "google",
            "http://localhost:3000/api/auth/callback",
            "challenge",
        );
        let Ok(url) = url else {
            panic!("authorize url should build");
        };

        assert_eq!(url.path(), "/auth/v1/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("provider".to_owned(), "google".to_owned())));
        assert!(pairs.contains(&(
            "redirect_to".to_owned(),
            "http://localhost:3000/api/auth/callback".to_owned()
        )));
        assert!(pairs.contains(&("code_challenge_method".to_owned(), "s256".to_owned())));
    }

    #[test]
    fn base_path_is_preserved() {
        let provider = provider("https://gateway.example.com/supabase");
        let Ok(url) = provider.token_url("pkce") else {
            panic!("token url should build");
        };

        assert_eq!(
            url.as_str(),
            "https://gateway.example.com/supabase/auth/v1/token?grant_type=pkce"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(SupabaseAuthProvider::new(reqwest::Client::new(), "not a url", "anon").is_err());
    }

    #[test]
    fn pkce_pair_is_fresh_and_url_safe() {
        let (verifier, challenge) = pkce_pair();
        let (other_verifier, _) = pkce_pair();

        assert_eq!(verifier.len(), 64);
        assert_ne!(verifier, other_verifier);
        assert_eq!(challenge.len(), 43);
        assert_eq!(challenge, pkce_challenge(verifier.as_str()));
        assert!(
            challenge
                .chars()
                .all(|character| character.is_ascii_alphanumeric()
                    || character == '-'
                    || character == '_')
        );
    }

    #[test]
    fn provider_errors_prefer_descriptive_fields() {
        assert_eq!(
            provider_error_message(
                r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
            )
            .as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(
            provider_error_message(r#"{"code":422,"msg":"User already registered"}"#).as_deref(),
            Some("User already registered")
        );
        assert_eq!(provider_error_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn sign_up_without_session_is_pending_confirmation() {
        let response: Result<GoTrueSignUpResponse, _> = serde_json::from_value(json!({
            "id": "3f0c",
            "email": "new@example.com",
            "confirmation_sent_at": "2025-01-01T00:00:00Z",
        }));
        let Ok(response) = response else {
            panic!("user body should parse");
        };

        let outcome = sign_up_outcome(response);
        assert!(outcome.confirmation_pending());
        assert_eq!(outcome.identity.email(), Some("new@example.com"));
    }

    #[test]
    fn sign_up_with_session_signs_the_user_in() {
        let response: Result<GoTrueSignUpResponse, _> = serde_json::from_value(json!({
            "access_token": "at",
            "refresh_token": "rt",
            "user": { "id": "3f0c", "email": "new@example.com" },
        }));
        let Ok(response) = response else {
            panic!("session body should parse");
        };

        let outcome = sign_up_outcome(response);
        assert!(!outcome.confirmation_pending());
        assert_eq!(
            outcome.session.map(|session| session.access_token),
            Some("at".to_owned())
        );
    }
}
