use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use brandflow_core::{AppError, AppResult, ClientId, UserIdentity};
use brandflow_domain::{AutomationSummary, DashboardMetrics, LeadSummary, MetricSummary};

use crate::{RecordFilter, RecordQuery, RecordStore, StoreTable};

/// Dashboard for the client organisation linked to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDashboard {
    /// Client organisation.
    pub client_id: ClientId,
    /// Display name of the organisation, when recorded.
    pub company_name: Option<String>,
    /// Aggregated tiles.
    pub metrics: DashboardMetrics,
}

/// Read-side service behind the client portal.
#[derive(Clone)]
pub struct PortalService {
    record_store: Arc<dyn RecordStore>,
}

impl PortalService {
    /// Creates a new portal service.
    #[must_use]
    pub fn new(record_store: Arc<dyn RecordStore>) -> Self {
        Self { record_store }
    }

    /// Resolves the client organisation a user belongs to.
    pub async fn client_for_user(&self, identity: &UserIdentity) -> AppResult<ClientId> {
        let links = self
            .record_store
            .select(
                StoreTable::ClientUsers,
                RecordQuery::filtered(RecordFilter::new().field_eq("user_id", identity.subject())),
            )
            .await?;

        let client_id = links
            .iter()
            .find_map(|link| link.get("client_id").and_then(Value::as_str))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no client organisation linked to user '{}'",
                    identity.subject()
                ))
            })?;

        Uuid::parse_str(client_id)
            .map(ClientId::from_uuid)
            .map_err(|error| {
                AppError::Internal(format!(
                    "client_users row holds invalid client id '{client_id}': {error}"
                ))
            })
    }

    /// Loads and aggregates the dashboard for a user's organisation.
    pub async fn dashboard(&self, identity: &UserIdentity) -> AppResult<ClientDashboard> {
        let client_id = self.client_for_user(identity).await?;
        let client_key = client_id.to_string();

        let clients = self
            .record_store
            .select(
                StoreTable::Clients,
                RecordQuery::filtered(RecordFilter::new().field_eq("id", client_key.as_str())),
            )
            .await?;
        let company_name = clients
            .first()
            .and_then(|client| client.get("company_name"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);

        let automations: Vec<AutomationSummary> = self
            .client_rows(StoreTable::Automations, client_key.as_str(), None)
            .await?
            .iter()
            .map(AutomationSummary::from_row)
            .collect();

        let leads: Vec<LeadSummary> = self
            .client_rows(StoreTable::Leads, client_key.as_str(), Some("created_at"))
            .await?
            .iter()
            .map(LeadSummary::from_row)
            .collect();

        let metrics: Vec<MetricSummary> = self
            .client_rows(StoreTable::Metrics, client_key.as_str(), Some("recorded_at"))
            .await?
            .iter()
            .filter_map(MetricSummary::from_row)
            .collect();

        Ok(ClientDashboard {
            client_id,
            company_name,
            metrics: DashboardMetrics::compute(&automations, &leads, &metrics, Utc::now()),
        })
    }

    async fn client_rows(
        &self,
        table: StoreTable,
        client_key: &str,
        newest_first_by: Option<&'static str>,
    ) -> AppResult<Vec<Value>> {
        let mut query = RecordQuery::filtered(RecordFilter::new().field_eq("client_id", client_key));
        if let Some(column) = newest_first_by {
            query = query.newest_first(column);
        }

        self.record_store.select(table, query).await
    }
}

#[cfg(test)]
mod tests;
