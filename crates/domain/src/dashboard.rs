//! Portal dashboard aggregation over a client's automations, leads and metrics.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

/// Automation status counted as active.
pub const ACTIVE_AUTOMATION_STATUS: &str = "active";
/// Lead status counted as qualified.
pub const QUALIFIED_LEAD_STATUS: &str = "qualified";
/// Lead status counted as converted.
pub const CONVERTED_LEAD_STATUS: &str = "converted";
/// Metric type holding the CRM contact count.
pub const CRM_CONTACTS_METRIC: &str = "crm_contacts";

const LEADS_THIS_WEEK_DAYS: i64 = 7;

/// Fields of an `automations` row the dashboard reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomationSummary {
    /// Lifecycle status, e.g. `active` or `paused`.
    pub status: Option<String>,
    /// Runs reported by the platform.
    pub total_runs: Option<i64>,
    /// Successful runs reported by the platform.
    pub successful_runs: Option<i64>,
}

impl AutomationSummary {
    /// Reads an automation row field by field; a malformed field only blanks itself.
    #[must_use]
    pub fn from_row(row: &Value) -> Self {
        Self {
            status: row
                .get("status")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
            total_runs: counter(row.get("total_runs")),
            successful_runs: counter(row.get("successful_runs")),
        }
    }
}

fn counter(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Fields of a `leads` row the dashboard reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadSummary {
    /// Pipeline status, e.g. `qualified`.
    pub status: Option<String>,
    /// Insert timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

impl LeadSummary {
    /// Reads a lead row leniently; unparsable timestamps count as unknown.
    #[must_use]
    pub fn from_row(row: &Value) -> Self {
        let status = row
            .get("status")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);
        let created_at = row
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|value| value.with_timezone(&Utc));

        Self { status, created_at }
    }
}

/// Fields of a `metrics` row the dashboard reads.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
    /// Metric key.
    pub metric_type: String,
    /// Numeric value; string-encoded numbers are accepted.
    pub value: f64,
}

impl MetricSummary {
    /// Reads a metric row, skipping rows without a type or a numeric value.
    #[must_use]
    pub fn from_row(row: &Value) -> Option<Self> {
        let metric_type = row.get("metric_type")?.as_str()?.to_owned();
        let value = match row.get("value")? {
            Value::Number(number) => number.as_f64()?,
            Value::String(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };

        Some(Self { metric_type, value })
    }
}

/// Automation tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AutomationMetrics {
    /// Automations whose status is `active`.
    pub active: u64,
    /// Sum of reported runs.
    pub total_runs: u64,
    /// Successful runs as a percentage of all runs, one decimal.
    pub success_rate: f64,
}

/// Lead tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadMetrics {
    /// All leads for the client.
    pub total: u64,
    /// Leads created in the trailing seven days.
    pub this_week: u64,
    /// Leads with status `qualified`.
    pub qualified: u64,
    /// Leads with status `converted`.
    pub converted: u64,
}

/// CRM tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrmMetrics {
    /// Contacts reported by the `crm_contacts` metric.
    pub contacts: u64,
}

/// Aggregated dashboard for one client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardMetrics {
    /// Automation tiles.
    pub automations: AutomationMetrics,
    /// Lead tiles.
    pub leads: LeadMetrics,
    /// CRM tiles.
    pub crm: CrmMetrics,
}

impl DashboardMetrics {
    /// Aggregates the dashboard as of `now`.
    #[must_use]
    pub fn compute(
        automations: &[AutomationSummary],
        leads: &[LeadSummary],
        metrics: &[MetricSummary],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            automations: automation_metrics(automations),
            leads: lead_metrics(leads, now),
            crm: crm_metrics(metrics),
        }
    }
}

fn automation_metrics(automations: &[AutomationSummary]) -> AutomationMetrics {
    let active = count(automations, |automation| {
        automation.status.as_deref() == Some(ACTIVE_AUTOMATION_STATUS)
    });
    let total_runs = saturating_sum(automations, |automation| automation.total_runs);
    let successful_runs = saturating_sum(automations, |automation| automation.successful_runs);

    let success_rate = if total_runs == 0 {
        0.0
    } else {
        let rate = successful_runs as f64 / total_runs as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    };

    AutomationMetrics {
        active,
        total_runs,
        success_rate,
    }
}

fn lead_metrics(leads: &[LeadSummary], now: DateTime<Utc>) -> LeadMetrics {
    let week_ago = now - Duration::days(LEADS_THIS_WEEK_DAYS);

    LeadMetrics {
        total: leads.len() as u64,
        this_week: count(leads, |lead| {
            lead.created_at
                .is_some_and(|created_at| created_at > week_ago)
        }),
        qualified: count(leads, |lead| {
            lead.status.as_deref() == Some(QUALIFIED_LEAD_STATUS)
        }),
        converted: count(leads, |lead| {
            lead.status.as_deref() == Some(CONVERTED_LEAD_STATUS)
        }),
    }
}

fn crm_metrics(metrics: &[MetricSummary]) -> CrmMetrics {
    let contacts = metrics
        .iter()
        .find(|metric| metric.metric_type == CRM_CONTACTS_METRIC)
        .map(|metric| metric.value.max(0.0).round() as u64)
        .unwrap_or(0);

    CrmMetrics { contacts }
}

fn count<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> u64 {
    items.iter().filter(|item| predicate(item)).count() as u64
}

fn saturating_sum(
    automations: &[AutomationSummary],
    field: impl Fn(&AutomationSummary) -> Option<i64>,
) -> u64 {
    automations.iter().fold(0_u64, |sum, automation| {
        sum.saturating_add(non_negative(field(automation)))
    })
}

fn non_negative(value: Option<i64>) -> u64 {
    value.and_then(|value| u64::try_from(value).ok()).unwrap_or(0)
}
