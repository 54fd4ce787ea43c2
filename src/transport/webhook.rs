// ==========================================
// Chem Procure - Outbound Automation Webhook
// ==========================================
// Forwards a user-authored chat message to the external automation
// endpoint as POST {"message": ...} and expects JSON back. Failures
// are caught at the call site, logged, and surfaced as a generic
// failure result. Never retried.
// ==========================================

use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::error;

/// What the chat-intake caller sees: either the endpoint's JSON reply
/// or a generic failure.
#[derive(Debug, Clone, Serialize)]
pub struct ForwardOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ForwardOutcome {
    fn success(result: JsonValue) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

pub struct AutomationWebhook {
    endpoint: String,
    agent: ureq::Agent,
}

impl AutomationWebhook {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(15))
                .build(),
        }
    }

    /// Forward one message. Any transport or decoding problem becomes
    /// a failure outcome, not an error the caller has to unwrap.
    pub fn forward(&self, message: &str) -> ForwardOutcome {
        let payload = json!({ "message": message });

        let response = match self.agent.post(&self.endpoint).send_json(payload) {
            Ok(resp) => resp,
            Err(e) => {
                error!(endpoint = self.endpoint, %e, "webhook call failed");
                return ForwardOutcome::failure(e.to_string());
            }
        };

        match response.into_json::<JsonValue>() {
            Ok(result) => ForwardOutcome::success(result),
            Err(e) => {
                error!(endpoint = self.endpoint, %e, "webhook reply was not JSON");
                ForwardOutcome::failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_endpoint_is_a_generic_failure() {
        // Nothing listens on this port; the call must come back as a
        // failure outcome, not a panic or a hard error.
        let webhook = AutomationWebhook::new("http://127.0.0.1:9/webhook");
        let outcome = webhook.forward("need 500 tons of caustic soda");
        assert!(!outcome.success);
        assert!(outcome.result.is_none());
        assert!(outcome.error.is_some());
    }

    #[test]
    fn outcome_serializes_without_empty_fields() {
        let outcome = ForwardOutcome::failure("boom");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "boom");
        assert!(value.get("result").is_none());
    }
}
