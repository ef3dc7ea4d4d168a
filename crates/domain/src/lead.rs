use brandflow_core::{AppError, AppResult, ClientId};
use serde_json::{Map, Value};

use crate::webhook::take_field;

/// Columns copied from event data into a `leads` row, besides `client_id` and `data`.
pub const LEAD_FIELDS: [&str; 4] = ["email", "name", "company", "source"];

/// Lead captured for a client; append-only, no deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadSubmission {
    client_id: ClientId,
    row: Map<String, Value>,
}

impl LeadSubmission {
    /// Builds a lead row. The full `data` object is kept in the `data` column.
    pub fn from_event_data(data: &Map<String, Value>) -> AppResult<Self> {
        let client_id = data
            .get("client_id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::Validation("new_lead requires string field 'client_id'".to_owned())
            })?
            .parse::<ClientId>()?;

        let mut row = Map::new();
        row.insert(
            "client_id".to_owned(),
            Value::String(client_id.to_string()),
        );
        for field in LEAD_FIELDS {
            row.insert(field.to_owned(), take_field(data, field));
        }
        row.insert("data".to_owned(), Value::Object(data.clone()));

        Ok(Self { client_id, row })
    }

    /// Returns the owning client.
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Consumes the submission into a store row.
    #[must_use]
    pub fn into_row(self) -> Map<String, Value> {
        self.row
    }
}

/// Contact pushed by the contact-intake webhook: `{ email, name }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    email: Value,
    name: Value,
}

impl ContactSubmission {
    /// Reads the contact fields from a request body object.
    pub fn from_body(body: &Value) -> AppResult<Self> {
        let body = body.as_object().ok_or_else(|| {
            AppError::Validation("contact body must be a JSON object".to_owned())
        })?;

        Ok(Self {
            email: take_field(body, "email"),
            name: take_field(body, "name"),
        })
    }

    /// Consumes the submission into a store row.
    #[must_use]
    pub fn into_row(self) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("email".to_owned(), self.email);
        row.insert("name".to_owned(), self.name);
        row
    }
}
