//! Inbound automation-platform webhook events.

use std::fmt::{Display, Formatter};

use brandflow_core::{AppError, AppResult};
use serde_json::{Map, Value};

/// Event kind carried in the `type` field of a webhook body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    /// An automation finished (or started) a run.
    AutomationRun,
    /// A form or funnel produced a new lead.
    NewLead,
    /// Aggregate counters for an automation changed.
    AutomationUpdate,
    /// Any other value; accepted and ignored.
    Unrecognized(String),
}

impl WebhookEventType {
    /// Parses the wire value. Never fails: unknown values are preserved.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "automation_run" => Self::AutomationRun,
            "new_lead" => Self::NewLead,
            "automation_update" => Self::AutomationUpdate,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AutomationRun => "automation_run",
            Self::NewLead => "new_lead",
            Self::AutomationUpdate => "automation_update",
            Self::Unrecognized(value) => value.as_str(),
        }
    }
}

impl Display for WebhookEventType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A decoded `{ type, data }` webhook body. Never persisted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    event_type: WebhookEventType,
    data: Value,
}

impl WebhookEvent {
    /// Creates an event from its wire parts.
    #[must_use]
    pub fn new(event_type: &str, data: Value) -> Self {
        Self {
            event_type: WebhookEventType::parse(event_type),
            data,
        }
    }

    /// Returns the event type.
    #[must_use]
    pub fn event_type(&self) -> &WebhookEventType {
        &self.event_type
    }

    /// Returns `data` as an object, rejecting any other JSON shape.
    pub fn data_object(&self) -> AppResult<&Map<String, Value>> {
        self.data.as_object().ok_or_else(|| {
            AppError::Validation(format!(
                "'{}' event requires 'data' to be an object",
                self.event_type
            ))
        })
    }
}

/// Copies `field` out of `data`, writing JSON null when it is absent.
pub(crate) fn take_field(data: &Map<String, Value>, field: &str) -> Value {
    data.get(field).cloned().unwrap_or(Value::Null)
}
