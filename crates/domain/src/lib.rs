//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod automation;
mod dashboard;
mod lead;
mod user;
mod webhook;

pub use automation::{
    AUTOMATION_COUNTER_FIELDS, AUTOMATION_RUN_FIELDS, AutomationCountersUpdate, AutomationRun,
};
pub use dashboard::{
    ACTIVE_AUTOMATION_STATUS, AutomationMetrics, AutomationSummary, CONVERTED_LEAD_STATUS,
    CRM_CONTACTS_METRIC, CrmMetrics, DashboardMetrics, LeadMetrics, LeadSummary, MetricSummary,
    QUALIFIED_LEAD_STATUS,
};
pub use lead::{ContactSubmission, LEAD_FIELDS, LeadSubmission};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, validate_sign_in_password,
    validate_sign_up_password,
};
pub use webhook::{WebhookEvent, WebhookEventType};
