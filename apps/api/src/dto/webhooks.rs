use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Event envelope posted by the automation platform.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/zapier-webhook-request.ts"
)]
pub struct ZapierWebhookRequest {
    /// Missing or non-string types are treated like any other unhandled type.
    #[serde(rename = "type", default)]
    #[ts(type = "unknown")]
    pub event_type: Option<Value>,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub data: Value,
}

/// Acknowledgement for an accepted webhook.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/webhook-accepted-response.ts"
)]
pub struct WebhookAcceptedResponse {
    pub success: bool,
}

/// Acknowledgement for the contact intake webhook, echoing the stored row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/contact-intake-response.ts"
)]
pub struct ContactIntakeResponse {
    pub success: bool,
    #[ts(type = "Record<string, unknown>")]
    pub data: Value,
}

impl ZapierWebhookRequest {
    /// Dispatch key for `type`; non-string values keep their JSON text.
    #[must_use]
    pub fn event_type_name(&self) -> String {
        match &self.event_type {
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ZapierWebhookRequest;

    #[test]
    fn non_string_types_are_kept_as_json_text() {
        let cases = [
            (json!({ "type": "new_lead" }), "new_lead"),
            (json!({ "type": null }), "null"),
            (json!({ "type": 7, "data": {} }), "7"),
            (json!({ "data": {} }), ""),
        ];

        for (body, expected) in cases {
            let Ok(request) = serde_json::from_value::<ZapierWebhookRequest>(body) else {
                panic!("envelope should parse");
            };
            assert_eq!(request.event_type_name(), expected);
        }
    }
}
