// ==========================================
// Chem Procure - Workflow Log Domain Model
// ==========================================
// Red line: every stage completion is recorded here.
// Append-only audit sink; the engine writes it and never reads it back
// (reads exist on the repository for diagnostics and tests only).
// ==========================================

use crate::domain::types::AgentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowLog {
    pub log_id: String,
    pub tender_id: String,
    pub agent: AgentType,
    /// Action name, e.g. "shortlist_vendors"
    pub action: String,
    /// Snapshot of the stage's input
    pub input_json: JsonValue,
    /// Snapshot of the stage's output
    pub output_json: JsonValue,
    pub logged_at: DateTime<Utc>,
}

impl WorkflowLog {
    pub fn entry(
        tender_id: impl Into<String>,
        agent: AgentType,
        action: impl Into<String>,
        input_json: JsonValue,
        output_json: JsonValue,
    ) -> Self {
        Self {
            log_id: Uuid::new_v4().to_string(),
            tender_id: tender_id.into(),
            agent,
            action: action.into(),
            input_json,
            output_json,
            logged_at: Utc::now(),
        }
    }
}
