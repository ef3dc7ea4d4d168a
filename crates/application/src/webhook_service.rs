use std::sync::Arc;

use brandflow_core::{AppError, AppResult, ClientId};

use crate::{RecordStore, WebhookSignaturePolicy};

/// Result of handling one webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A row was appended to the named table.
    Inserted {
        /// Table that received the row.
        table: &'static str,
    },
    /// Automation counters were patched.
    Updated {
        /// Automation lookup key from the event.
        external_id: String,
        /// Rows changed; zero when no automation matched.
        matched_rows: u64,
    },
    /// An update named no counter field; nothing was written.
    Unchanged {
        /// Automation lookup key from the event.
        external_id: String,
    },
    /// The event type is not handled; nothing was written.
    Ignored {
        /// The unrecognized `type` value.
        event_type: String,
    },
}

/// Authenticates and applies inbound automation-platform webhooks.
#[derive(Clone)]
pub struct WebhookIntakeService {
    record_store: Arc<dyn RecordStore>,
    signature_policy: WebhookSignaturePolicy,
    bound_client_id: Option<ClientId>,
}

impl WebhookIntakeService {
    /// Creates a new intake service.
    #[must_use]
    pub fn new(
        record_store: Arc<dyn RecordStore>,
        signature_policy: WebhookSignaturePolicy,
    ) -> Self {
        Self {
            record_store,
            signature_policy,
            bound_client_id: None,
        }
    }

    /// Restricts every mutation to rows owned by `client_id`.
    #[must_use]
    pub fn with_bound_client(mut self, client_id: ClientId) -> Self {
        self.bound_client_id = Some(client_id);
        self
    }

    /// Returns the configured signature policy.
    #[must_use]
    pub fn signature_policy(&self) -> &WebhookSignaturePolicy {
        &self.signature_policy
    }

    /// Returns the client every mutation is bound to, if any.
    #[must_use]
    pub fn bound_client_id(&self) -> Option<ClientId> {
        self.bound_client_id
    }

    /// Checks the request signature against the raw body bytes.
    pub fn verify_signature(&self, body: &[u8], signature: Option<&str>) -> AppResult<()> {
        let WebhookSignaturePolicy::Required(verifier) = &self.signature_policy else {
            return Ok(());
        };

        match signature {
            Some(signature) if verifier.verify(body, signature) => Ok(()),
            _ => Err(AppError::Unauthorized("Invalid signature".to_owned())),
        }
    }
}

mod contacts;
mod dispatch;
