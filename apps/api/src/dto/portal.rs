use brandflow_application::ClientDashboard;
use brandflow_domain::DashboardMetrics;
use serde::Serialize;
use ts_rs::TS;

/// Dashboard for the signed-in user's organisation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-response.ts"
)]
pub struct DashboardResponse {
    pub client_id: String,
    pub company_name: Option<String>,
    pub metrics: DashboardMetricsResponse,
}

/// Dashboard tiles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-metrics-response.ts"
)]
pub struct DashboardMetricsResponse {
    pub automations: AutomationMetricsResponse,
    pub leads: LeadMetricsResponse,
    pub crm: CrmMetricsResponse,
}

/// Automation tiles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/automation-metrics-response.ts"
)]
pub struct AutomationMetricsResponse {
    #[ts(type = "number")]
    pub active: u64,
    #[ts(type = "number")]
    pub total_runs: u64,
    /// Percentage with one decimal.
    pub success_rate: f64,
}

/// Lead tiles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/lead-metrics-response.ts"
)]
pub struct LeadMetricsResponse {
    #[ts(type = "number")]
    pub total: u64,
    #[ts(type = "number")]
    pub this_week: u64,
    #[ts(type = "number")]
    pub qualified: u64,
    #[ts(type = "number")]
    pub converted: u64,
}

/// CRM tiles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/crm-metrics-response.ts"
)]
pub struct CrmMetricsResponse {
    #[ts(type = "number")]
    pub contacts: u64,
}

impl From<DashboardMetrics> for DashboardMetricsResponse {
    fn from(metrics: DashboardMetrics) -> Self {
        Self {
            automations: AutomationMetricsResponse {
                active: metrics.automations.active,
                total_runs: metrics.automations.total_runs,
                success_rate: metrics.automations.success_rate,
            },
            leads: LeadMetricsResponse {
                total: metrics.leads.total,
                this_week: metrics.leads.this_week,
                qualified: metrics.leads.qualified,
                converted: metrics.leads.converted,
            },
            crm: CrmMetricsResponse {
                contacts: metrics.crm.contacts,
            },
        }
    }
}

impl From<ClientDashboard> for DashboardResponse {
    fn from(dashboard: ClientDashboard) -> Self {
        Self {
            client_id: dashboard.client_id.to_string(),
            company_name: dashboard.company_name,
            metrics: dashboard.metrics.into(),
        }
    }
}
