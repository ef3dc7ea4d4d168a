use std::sync::Arc;

/// Verifies that a webhook body was produced by a holder of the shared secret.
pub trait WebhookSignatureVerifier: Send + Sync {
    /// Returns whether `signature` authenticates `body`.
    ///
    /// Implementations must compare in constant time.
    fn verify(&self, body: &[u8], signature: &str) -> bool;
}

/// How inbound webhooks are authenticated.
#[derive(Clone)]
pub enum WebhookSignaturePolicy {
    /// No shared secret is configured; every request is accepted unverified.
    Open,
    /// Every request must carry a valid signature.
    Required(Arc<dyn WebhookSignatureVerifier>),
}

impl WebhookSignaturePolicy {
    /// Returns whether requests are accepted without verification.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Debug for WebhookSignaturePolicy {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => formatter.write_str("Open"),
            Self::Required(_) => formatter.write_str("Required"),
        }
    }
}
