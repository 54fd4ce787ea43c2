// ==========================================
// Chem Procure - Evaluation Domain Model
// ==========================================
// Final multi-criteria scores for the top auction participants.
// Created once per tender, never mutated afterwards. Consumers display
// them ordered by overall_score descending; the lowest bidder is not
// guaranteed the top overall score (price is not the sole criterion).
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub evaluation_id: String,
    pub tender_id: String,
    pub vendor_id: String,
    pub overall_score: i64,
    pub price_score: i64,
    pub quality_score: i64,
    pub delivery_score: i64,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}

impl Evaluation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tender_id: impl Into<String>,
        vendor_id: impl Into<String>,
        overall_score: i64,
        price_score: i64,
        quality_score: i64,
        delivery_score: i64,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            evaluation_id: Uuid::new_v4().to_string(),
            tender_id: tender_id.into(),
            vendor_id: vendor_id.into(),
            overall_score,
            price_score,
            quality_score,
            delivery_score,
            recommendation: recommendation.into(),
            created_at: Utc::now(),
        }
    }
}
