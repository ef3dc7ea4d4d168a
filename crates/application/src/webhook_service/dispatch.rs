use brandflow_core::{AppError, AppResult};
use brandflow_domain::{
    AutomationCountersUpdate, AutomationRun, LeadSubmission, WebhookEvent, WebhookEventType,
};

use crate::{RecordFilter, RecordQuery, StoreTable};

use super::{WebhookIntakeService, WebhookOutcome};

impl WebhookIntakeService {
    /// Applies one event: exactly one store operation for known types, none otherwise.
    pub async fn handle_event(&self, event: WebhookEvent) -> AppResult<WebhookOutcome> {
        match event.event_type() {
            WebhookEventType::AutomationRun => {
                let run = AutomationRun::from_event_data(event.data_object()?);
                self.record_automation_run(run).await
            }
            WebhookEventType::NewLead => {
                let lead = LeadSubmission::from_event_data(event.data_object()?)?;
                self.record_lead(lead).await
            }
            WebhookEventType::AutomationUpdate => {
                let update = AutomationCountersUpdate::from_event_data(event.data_object()?)?;
                self.apply_automation_update(update).await
            }
            WebhookEventType::Unrecognized(event_type) => Ok(WebhookOutcome::Ignored {
                event_type: event_type.clone(),
            }),
        }
    }

    async fn record_automation_run(&self, run: AutomationRun) -> AppResult<WebhookOutcome> {
        if let Some(client_id) = self.bound_client_id {
            let automation_id = run.automation_id().ok_or_else(|| {
                AppError::Validation(
                    "automation_run requires string field 'automation_id'".to_owned(),
                )
            })?;

            let owned = self
                .record_store
                .select(
                    StoreTable::Automations,
                    RecordQuery::filtered(
                        RecordFilter::new()
                            .field_eq("id", automation_id)
                            .field_eq("client_id", client_id.to_string()),
                    ),
                )
                .await?;

            if owned.is_empty() {
                return Err(AppError::Forbidden(format!(
                    "automation '{automation_id}' does not belong to the bound client"
                )));
            }
        }

        self.record_store
            .insert(StoreTable::AutomationRuns, run.into_row())
            .await?;

        Ok(WebhookOutcome::Inserted {
            table: StoreTable::AutomationRuns.as_str(),
        })
    }

    async fn record_lead(&self, lead: LeadSubmission) -> AppResult<WebhookOutcome> {
        if let Some(client_id) = self.bound_client_id
            && lead.client_id() != client_id
        {
            return Err(AppError::Forbidden(format!(
                "lead client '{}' does not match the bound client",
                lead.client_id()
            )));
        }

        self.record_store
            .insert(StoreTable::Leads, lead.into_row())
            .await?;

        Ok(WebhookOutcome::Inserted {
            table: StoreTable::Leads.as_str(),
        })
    }

    async fn apply_automation_update(
        &self,
        update: AutomationCountersUpdate,
    ) -> AppResult<WebhookOutcome> {
        let external_id = update.external_id().to_owned();
        if update.is_empty() {
            return Ok(WebhookOutcome::Unchanged { external_id });
        }

        let mut filter = RecordFilter::new().field_eq("external_id", external_id.as_str());
        if let Some(client_id) = self.bound_client_id {
            filter = filter.field_eq("client_id", client_id.to_string());
        }

        let matched_rows = self
            .record_store
            .update(StoreTable::Automations, update.into_patch(), filter)
            .await?;

        Ok(WebhookOutcome::Updated {
            external_id,
            matched_rows,
        })
    }
}
