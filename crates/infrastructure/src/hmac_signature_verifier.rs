use brandflow_application::WebhookSignatureVerifier;
use brandflow_core::{AppError, AppResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies hex-encoded HMAC-SHA256 signatures over the raw request body.
#[derive(Clone)]
pub struct HmacSha256SignatureVerifier {
    keyed_mac: HmacSha256,
}

impl HmacSha256SignatureVerifier {
    /// Creates a verifier for the shared secret.
    pub fn new(secret: impl AsRef<[u8]>) -> AppResult<Self> {
        let keyed_mac = HmacSha256::new_from_slice(secret.as_ref()).map_err(|error| {
            AppError::Validation(format!("invalid webhook signing secret: {error}"))
        })?;

        Ok(Self { keyed_mac })
    }

    /// Returns the lowercase hex signature for `body`.
    #[must_use]
    pub fn sign(&self, body: &[u8]) -> String {
        hex::encode(self.mac_for(body).finalize().into_bytes())
    }

    fn mac_for(&self, body: &[u8]) -> HmacSha256 {
        let mut mac = self.keyed_mac.clone();
        mac.update(body);
        mac
    }
}

impl std::fmt::Debug for HmacSha256SignatureVerifier {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HmacSha256SignatureVerifier")
            .field("keyed_mac", &"<redacted>")
            .finish()
    }
}

impl WebhookSignatureVerifier for HmacSha256SignatureVerifier {
    fn verify(&self, body: &[u8], signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature.trim()) else {
            return false;
        };

        self.mac_for(body).verify_slice(&expected).is_ok()
    }
}
