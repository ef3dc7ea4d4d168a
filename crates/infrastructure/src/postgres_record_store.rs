use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use brandflow_application::{RecordFilter, RecordQuery, RecordStore, StoreTable};
use brandflow_core::{AppError, AppResult};

/// PostgreSQL-backed record store.
///
/// Rows travel as JSON objects and are mapped onto table columns with
/// `jsonb_populate_record`, so Postgres performs the type coercion. Column
/// names are checked against the table allow-list before they reach SQL.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn checked_columns(table: StoreTable, row: &Map<String, Value>) -> AppResult<Vec<&str>> {
    row.keys()
        .map(|column| {
            table.ensure_column(column)?;
            Ok(column.as_str())
        })
        .collect()
}

fn push_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    table: StoreTable,
    filter: &RecordFilter,
) -> AppResult<()> {
    builder.push(" WHERE TRUE");
    for condition in filter.conditions() {
        table.ensure_column(condition.column)?;
        builder.push(format!(" AND to_jsonb(t.{}) = ", condition.column));
        builder.push_bind(Json(condition.value.clone()));
    }

    Ok(())
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn insert(&self, table: StoreTable, row: Map<String, Value>) -> AppResult<Value> {
        let columns = checked_columns(table, &row)?.join(", ");
        let table_name = table.as_str();

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("INSERT INTO {table_name} AS t "));
        if columns.is_empty() {
            builder.push("DEFAULT VALUES");
        } else {
            builder.push(format!(
                "({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{table_name}, "
            ));
            builder.push_bind(Json(Value::Object(row)));
            builder.push(")");
        }
        builder.push(" RETURNING to_jsonb(t.*)");

        builder
            .build_query_scalar::<Value>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to insert into '{table_name}': {error}"))
            })
    }

    async fn update(
        &self,
        table: StoreTable,
        patch: Map<String, Value>,
        filter: RecordFilter,
    ) -> AppResult<u64> {
        let columns = checked_columns(table, &patch)?;
        if columns.is_empty() {
            return Err(AppError::Validation(format!(
                "update on '{}' requires at least one column",
                table.as_str()
            )));
        }

        let table_name = table.as_str();
        let assignments = columns
            .iter()
            .map(|column| format!("{column} = r.{column}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "UPDATE {table_name} AS t SET {assignments} FROM jsonb_populate_record(NULL::{table_name}, "
        ));
        builder.push_bind(Json(Value::Object(patch)));
        builder.push(") AS r");
        push_filter(&mut builder, table, &filter)?;

        let result = builder.build().execute(&self.pool).await.map_err(|error| {
            AppError::Internal(format!("failed to update '{table_name}': {error}"))
        })?;

        Ok(result.rows_affected())
    }

    async fn select(&self, table: StoreTable, query: RecordQuery) -> AppResult<Vec<Value>> {
        let table_name = table.as_str();
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT to_jsonb(t.*) FROM {table_name} AS t"));
        push_filter(&mut builder, table, &query.filter)?;

        if let Some(order) = query.order {
            table.ensure_column(order.column)?;
            let direction = if order.descending { "DESC" } else { "ASC" };
            builder.push(format!(" ORDER BY t.{} {direction}", order.column));
        }

        builder
            .build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to query '{table_name}': {error}"))
            })
    }
}
