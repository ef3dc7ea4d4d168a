use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use brandflow_application::{RecordFilter, RecordQuery, RecordStore, StoreTable};
use brandflow_core::{AppError, AppResult};

/// In-memory record store implementation.
///
/// Fills `id` and the table's timestamp column when a row omits them.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<HashMap<StoreTable, Vec<Map<String, Value>>>>,
}

impl InMemoryRecordStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every row of `table` in insertion order.
    pub async fn rows(&self, table: StoreTable) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(&table)
            .into_iter()
            .flatten()
            .cloned()
            .map(Value::Object)
            .collect()
    }
}

fn ensure_columns(table: StoreTable, row: &Map<String, Value>) -> AppResult<()> {
    row.keys().try_for_each(|column| table.ensure_column(column))
}

fn timestamp_column(table: StoreTable) -> &'static str {
    match table {
        StoreTable::Metrics => "recorded_at",
        _ => "created_at",
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(left)), Some(Value::Number(right))) => left
            .as_f64()
            .partial_cmp(&right.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(left)), Some(Value::String(right))) => left.cmp(right),
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Less,
        (_, Some(Value::Null) | None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, table: StoreTable, mut row: Map<String, Value>) -> AppResult<Value> {
        ensure_columns(table, &row)?;

        row.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        row.entry(timestamp_column(table)).or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
        });

        self.tables
            .write()
            .await
            .entry(table)
            .or_default()
            .push(row.clone());

        Ok(Value::Object(row))
    }

    async fn update(
        &self,
        table: StoreTable,
        patch: Map<String, Value>,
        filter: RecordFilter,
    ) -> AppResult<u64> {
        ensure_columns(table, &patch)?;
        if patch.is_empty() {
            return Err(AppError::Validation(format!(
                "update on '{}' requires at least one column",
                table.as_str()
            )));
        }

        let mut tables = self.tables.write().await;
        let mut matched_rows = 0_u64;
        for row in tables.entry(table).or_default().iter_mut() {
            if !filter.matches(row) {
                continue;
            }

            for (column, value) in &patch {
                row.insert(column.clone(), value.clone());
            }
            matched_rows += 1;
        }

        Ok(matched_rows)
    }

    async fn select(&self, table: StoreTable, query: RecordQuery) -> AppResult<Vec<Value>> {
        for condition in query.filter.conditions() {
            table.ensure_column(condition.column)?;
        }

        let tables = self.tables.read().await;
        let mut rows: Vec<&Map<String, Value>> = tables
            .get(&table)
            .into_iter()
            .flatten()
            .filter(|row| query.filter.matches(row))
            .collect();

        if let Some(order) = query.order {
            table.ensure_column(order.column)?;
            rows.sort_by(|left, right| {
                let ordering = compare_values(left.get(order.column), right.get(order.column));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(rows.into_iter().cloned().map(Value::Object).collect())
    }
}
