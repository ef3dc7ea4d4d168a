use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{Map, Value, json};

use brandflow_core::{AppError, AppResult, ClientId, UserIdentity};

use crate::{PortalService, RecordFilter, RecordQuery, RecordStore, StoreTable};

#[derive(Default)]
struct FixtureStore {
    tables: HashMap<StoreTable, Vec<Value>>,
}

impl FixtureStore {
    fn with_rows(mut self, table: StoreTable, rows: Vec<Value>) -> Self {
        self.tables.insert(table, rows);
        self
    }
}

#[async_trait]
impl RecordStore for FixtureStore {
    async fn insert(&self, table: StoreTable, _row: Map<String, Value>) -> AppResult<Value> {
        Err(AppError::Internal(format!(
            "portal must not write to {}",
            table.as_str()
        )))
    }

    async fn update(
        &self,
        table: StoreTable,
        _patch: Map<String, Value>,
        _filter: RecordFilter,
    ) -> AppResult<u64> {
        Err(AppError::Internal(format!(
            "portal must not write to {}",
            table.as_str()
        )))
    }

    async fn select(&self, table: StoreTable, query: RecordQuery) -> AppResult<Vec<Value>> {
        Ok(self
            .tables
            .get(&table)
            .into_iter()
            .flatten()
            .filter(|row| row.as_object().is_some_and(|row| query.filter.matches(row)))
            .cloned()
            .collect())
    }
}

fn user() -> UserIdentity {
    UserIdentity::new("user-1", Some("owner@example.com".to_owned()))
}

#[tokio::test]
async fn user_without_client_link_is_not_found() {
    let service = PortalService::new(Arc::new(FixtureStore::default()));
    let result = service.dashboard(&user()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn dashboard_aggregates_only_the_linked_client() {
    let client_id = ClientId::new();
    let client = client_id.to_string();
    let other = ClientId::new().to_string();
    let now = Utc::now();
    let recent = (now - Duration::days(2)).to_rfc3339();
    let old = (now - Duration::days(30)).to_rfc3339();

    let store = FixtureStore::default()
        .with_rows(
            StoreTable::ClientUsers,
            vec![json!({ "user_id": "user-1", "client_id": client })],
        )
        .with_rows(
            StoreTable::Clients,
            vec![
                json!({ "id": client, "company_name": "Acme Roofing" }),
                json!({ "id": other, "company_name": "Someone Else" }),
            ],
        )
        .with_rows(
            StoreTable::Automations,
            vec![
                json!({ "client_id": client, "status": "active", "total_runs": 30, "successful_runs": 27 }),
                json!({ "client_id": client, "status": "paused", "total_runs": 10, "successful_runs": 10 }),
                json!({ "client_id": client, "status": "active", "total_runs": null }),
                json!({ "client_id": other, "status": "active", "total_runs": 500, "successful_runs": 0 }),
            ],
        )
        .with_rows(
            StoreTable::Leads,
            vec![
                json!({ "client_id": client, "status": "qualified", "created_at": recent }),
                json!({ "client_id": client, "status": "converted", "created_at": old }),
                json!({ "client_id": client, "status": "new", "created_at": recent }),
                json!({ "client_id": other, "status": "qualified", "created_at": recent }),
            ],
        )
        .with_rows(
            StoreTable::Metrics,
            vec![
                json!({ "client_id": client, "metric_type": "crm_contacts", "value": 1284 }),
                json!({ "client_id": other, "metric_type": "crm_contacts", "value": 9 }),
            ],
        );

    let service = PortalService::new(Arc::new(store));
    let dashboard = service.dashboard(&user()).await;
    let Ok(dashboard) = dashboard else {
        panic!("dashboard should load");
    };

    assert_eq!(dashboard.client_id, client_id);
    assert_eq!(dashboard.company_name.as_deref(), Some("Acme Roofing"));
    assert_eq!(dashboard.metrics.automations.active, 2);
    assert_eq!(dashboard.metrics.automations.total_runs, 40);
    assert!((dashboard.metrics.automations.success_rate - 92.5).abs() < f64::EPSILON);
    assert_eq!(dashboard.metrics.leads.total, 3);
    assert_eq!(dashboard.metrics.leads.this_week, 2);
    assert_eq!(dashboard.metrics.leads.qualified, 1);
    assert_eq!(dashboard.metrics.leads.converted, 1);
    assert_eq!(dashboard.metrics.crm.contacts, 1284);
}

#[tokio::test]
async fn empty_client_yields_zeroed_dashboard() {
    let client = ClientId::new().to_string();
    let store = FixtureStore::default().with_rows(
        StoreTable::ClientUsers,
        vec![json!({ "user_id": "user-1", "client_id": client })],
    );

    let service = PortalService::new(Arc::new(store));
    let dashboard = service.dashboard(&user()).await;
    let Ok(dashboard) = dashboard else {
        panic!("dashboard should load");
    };

    assert_eq!(dashboard.company_name, None);
    assert_eq!(dashboard.metrics.automations.total_runs, 0);
    assert!(dashboard.metrics.automations.success_rate.abs() < f64::EPSILON);
    assert_eq!(dashboard.metrics.leads.total, 0);
    assert_eq!(dashboard.metrics.crm.contacts, 0);
}

#[tokio::test]
async fn corrupt_client_link_is_internal() {
    let store = FixtureStore::default().with_rows(
        StoreTable::ClientUsers,
        vec![json!({ "user_id": "user-1", "client_id": "not-a-uuid" })],
    );

    let service = PortalService::new(Arc::new(store));
    let result = service.client_for_user(&user()).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}
