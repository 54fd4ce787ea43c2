// ==========================================
// Chem Procure - Tender Domain Model
// ==========================================
// A tender is a buyer's request for a chemical good and the unit of
// work flowing through the lifecycle. status/current_agent must stay
// mutually consistent with the stage that last wrote them; only the
// stage transition controller mutates them.
// ==========================================

use crate::domain::types::{AgentType, TenderStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use uuid::Uuid;

// ==========================================
// Specifications - typed intake key/value map
// ==========================================
// The source system kept this as an open JSON blob; here it is a
// validated string-to-string map so malformed intake payloads are
// rejected at the boundary instead of surfacing mid-stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifications(BTreeMap<String, String>);

impl Specifications {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Validate a raw intake JSON object. Every value must be a plain
    /// string; anything else is a malformed-input rejection.
    pub fn from_json(value: &JsonValue) -> Result<Self, String> {
        let obj = value
            .as_object()
            .ok_or_else(|| "specifications must be a JSON object".to_string())?;
        let mut map = BTreeMap::new();
        for (key, val) in obj {
            match val.as_str() {
                Some(s) => {
                    map.insert(key.clone(), s.to_string());
                }
                None => {
                    return Err(format!(
                        "specification '{}' must be a string, got {}",
                        key, val
                    ));
                }
            }
        }
        Ok(Self(map))
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(&self.0).unwrap_or(JsonValue::Null)
    }
}

// ==========================================
// Tender - main lifecycle entity
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tender {
    pub tender_id: String,
    pub company_id: String,
    pub title: String,
    pub chemical_name: String,
    pub quantity: f64,
    pub unit: String,
    pub delivery_location: String,
    pub deadline: NaiveDate,
    pub budget_range: String,
    pub specifications: Specifications,
    pub status: TenderStatus,
    pub current_agent: AgentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tender {
    /// Intake constructor: a fresh draft owned by the chatbot agent.
    #[allow(clippy::too_many_arguments)]
    pub fn draft(
        company_id: impl Into<String>,
        title: impl Into<String>,
        chemical_name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        delivery_location: impl Into<String>,
        deadline: NaiveDate,
        budget_range: impl Into<String>,
        specifications: Specifications,
    ) -> Self {
        let now = Utc::now();
        Self {
            tender_id: Uuid::new_v4().to_string(),
            company_id: company_id.into(),
            title: title.into(),
            chemical_name: chemical_name.into(),
            quantity,
            unit: unit.into(),
            delivery_location: delivery_location.into(),
            deadline,
            budget_range: budget_range.into(),
            specifications,
            status: TenderStatus::Draft,
            current_agent: AgentType::Chatbot,
            created_at: now,
            updated_at: now,
        }
    }
}
