use brandflow_core::{AppError, AppResult, NonEmptyString};
use serde_json::{Map, Value};

use crate::webhook::take_field;

/// Columns written for one `automation_runs` row.
pub const AUTOMATION_RUN_FIELDS: [&str; 6] = [
    "automation_id",
    "status",
    "started_at",
    "completed_at",
    "logs",
    "results",
];

/// Columns patched on an `automations` row by a counters update.
pub const AUTOMATION_COUNTER_FIELDS: [&str; 4] =
    ["total_runs", "successful_runs", "last_run_at", "status"];

/// Append-only record of one automation execution reported by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationRun {
    row: Map<String, Value>,
}

impl AutomationRun {
    /// Maps every run field from event data verbatim.
    #[must_use]
    pub fn from_event_data(data: &Map<String, Value>) -> Self {
        let row = AUTOMATION_RUN_FIELDS
            .iter()
            .map(|field| ((*field).to_owned(), take_field(data, field)))
            .collect();

        Self { row }
    }

    /// Returns the referenced automation id, when it is a string.
    #[must_use]
    pub fn automation_id(&self) -> Option<&str> {
        self.row.get("automation_id").and_then(Value::as_str)
    }

    /// Consumes the record into a store row.
    #[must_use]
    pub fn into_row(self) -> Map<String, Value> {
        self.row
    }
}

/// Counter patch for the automation identified by `external_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationCountersUpdate {
    external_id: NonEmptyString,
    patch: Map<String, Value>,
}

impl AutomationCountersUpdate {
    /// Builds the patch from event data; `external_id` is the required lookup key.
    ///
    /// Only counters present in `data` are patched; absent ones keep their stored value.
    pub fn from_event_data(data: &Map<String, Value>) -> AppResult<Self> {
        let external_id = data
            .get("external_id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::Validation(
                    "automation_update requires string field 'external_id'".to_owned(),
                )
            })
            .and_then(NonEmptyString::new)?;

        let patch = AUTOMATION_COUNTER_FIELDS
            .iter()
            .filter_map(|field| {
                data.get(*field)
                    .map(|value| ((*field).to_owned(), value.clone()))
            })
            .collect();

        Ok(Self { external_id, patch })
    }

    /// Returns whether the event carried no counter field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patch.is_empty()
    }

    /// Returns the lookup key.
    #[must_use]
    pub fn external_id(&self) -> &str {
        self.external_id.as_str()
    }

    /// Consumes the update into its column patch.
    #[must_use]
    pub fn into_patch(self) -> Map<String, Value> {
        self.patch
    }
}
