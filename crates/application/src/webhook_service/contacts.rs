use brandflow_core::AppResult;
use brandflow_domain::ContactSubmission;
use serde_json::Value;

use crate::StoreTable;

use super::WebhookIntakeService;

impl WebhookIntakeService {
    /// Inserts a contact and returns the stored row.
    pub async fn ingest_contact(&self, contact: ContactSubmission) -> AppResult<Value> {
        self.record_store
            .insert(StoreTable::Contacts, contact.into_row())
            .await
    }
}
