use async_trait::async_trait;
use brandflow_core::{AppError, AppResult};
use serde_json::{Map, Value};

/// Tables the portal reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreTable {
    /// Execution history reported by the automation platform.
    AutomationRuns,
    /// Leads captured for a client.
    Leads,
    /// Automations configured for a client, keyed externally by `external_id`.
    Automations,
    /// Contacts pushed by the contact-intake webhook.
    Contacts,
    /// Client organisations.
    Clients,
    /// Link between auth users and client organisations.
    ClientUsers,
    /// Per-client metric values.
    Metrics,
}

impl StoreTable {
    /// Returns the table name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutomationRuns => "automation_runs",
            Self::Leads => "leads",
            Self::Automations => "automations",
            Self::Contacts => "contacts",
            Self::Clients => "clients",
            Self::ClientUsers => "client_users",
            Self::Metrics => "metrics",
        }
    }

    /// Returns the columns callers may write, filter or order on.
    #[must_use]
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::AutomationRuns => &[
                "id",
                "automation_id",
                "status",
                "started_at",
                "completed_at",
                "logs",
                "results",
                "created_at",
            ],
            Self::Leads => &[
                "id",
                "client_id",
                "email",
                "name",
                "company",
                "source",
                "status",
                "data",
                "created_at",
            ],
            Self::Automations => &[
                "id",
                "client_id",
                "external_id",
                "name",
                "status",
                "total_runs",
                "successful_runs",
                "last_run_at",
                "created_at",
            ],
            Self::Contacts => &["id", "email", "name", "created_at"],
            Self::Clients => &["id", "company_name", "created_at"],
            Self::ClientUsers => &["id", "user_id", "client_id", "created_at"],
            Self::Metrics => &["id", "client_id", "metric_type", "value", "recorded_at"],
        }
    }

    /// Fails when `column` is not part of this table's allow-list.
    pub fn ensure_column(&self, column: &str) -> AppResult<()> {
        if self.columns().contains(&column) {
            return Ok(());
        }

        Err(AppError::Validation(format!(
            "column '{column}' is not writable on table '{}'",
            self.as_str()
        )))
    }
}

/// Equality condition on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    /// Column name.
    pub column: &'static str,
    /// Value the column must equal.
    pub value: Value,
}

/// Conjunction of equality conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    conditions: Vec<FieldCondition>,
}

impl RecordFilter {
    /// Creates an empty filter matching every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column = value`.
    #[must_use]
    pub fn field_eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(FieldCondition {
            column,
            value: value.into(),
        });
        self
    }

    /// Returns the conditions in insertion order.
    #[must_use]
    pub fn conditions(&self) -> &[FieldCondition] {
        self.conditions.as_slice()
    }

    /// Returns whether a JSON row satisfies every condition.
    #[must_use]
    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        self.conditions.iter().all(|condition| {
            row.get(condition.column).unwrap_or(&Value::Null) == &condition.value
        })
    }
}

/// Ordering for a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOrder {
    /// Column to order on.
    pub column: &'static str,
    /// Newest/largest first when true.
    pub descending: bool,
}

/// Filter plus optional ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordQuery {
    /// Row filter.
    pub filter: RecordFilter,
    /// Optional ordering.
    pub order: Option<RecordOrder>,
}

impl RecordQuery {
    /// Creates a query from a filter without ordering.
    #[must_use]
    pub fn filtered(filter: RecordFilter) -> Self {
        Self {
            filter,
            order: None,
        }
    }

    /// Orders results by `column`, descending.
    #[must_use]
    pub fn newest_first(mut self, column: &'static str) -> Self {
        self.order = Some(RecordOrder {
            column,
            descending: true,
        });
        self
    }
}

/// Table-scoped access to the hosted relational store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts one row and returns it as stored, including generated columns.
    async fn insert(&self, table: StoreTable, row: Map<String, Value>) -> AppResult<Value>;

    /// Applies `patch` to every row matching `filter` and returns the number of rows changed.
    async fn update(
        &self,
        table: StoreTable,
        patch: Map<String, Value>,
        filter: RecordFilter,
    ) -> AppResult<u64>;

    /// Returns the rows matching `query` as JSON objects.
    async fn select(&self, table: StoreTable, query: RecordQuery) -> AppResult<Vec<Value>>;
}
