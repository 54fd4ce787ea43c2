// ==========================================
// Chem Procure - Bid Domain Model
// ==========================================
// Negotiation-phase bids. initial_price is immutable once set;
// current_price and status are mutated only by the negotiation
// engine's concession protocol.
// ==========================================

use crate::domain::types::BidStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// BidTerms - typed replacement for the free-form terms blob
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidTerms {
    #[serde(default)]
    pub notes: Option<String>,
}

impl BidTerms {
    pub fn with_notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub bid_id: String,
    pub tender_id: String,
    pub vendor_id: String,
    /// Immutable once set; the vendor's opening price.
    pub initial_price: f64,
    /// Moves downward under the concession protocol.
    pub current_price: f64,
    pub delivery_time_days: i64,
    pub terms: BidTerms,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bid {
    pub fn submitted(
        tender_id: impl Into<String>,
        vendor_id: impl Into<String>,
        price: f64,
        delivery_time_days: i64,
        terms: BidTerms,
    ) -> Self {
        let now = Utc::now();
        Self {
            bid_id: Uuid::new_v4().to_string(),
            tender_id: tender_id.into(),
            vendor_id: vendor_id.into(),
            initial_price: price,
            current_price: price,
            delivery_time_days,
            terms,
            status: BidStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }
}
