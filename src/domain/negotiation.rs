// ==========================================
// Chem Procure - Negotiation Domain Model
// ==========================================
// One negotiation thread per Tender × Vendor pair, eventually linked to
// that vendor's bid. Messages are append-only and time-ordered;
// ongoing → completed is one-way.
// ==========================================

use crate::domain::types::{MessageSender, NegotiationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// NegotiationMessage - one thread entry
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationMessage {
    pub sender: MessageSender,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl NegotiationMessage {
    pub fn now(sender: MessageSender, message: impl Into<String>) -> Self {
        Self {
            sender,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

// ==========================================
// FinalTerms - agreed outcome of a completed negotiation
// ==========================================
// Typed replacement for the source's untyped final_terms JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalTerms {
    pub agreed_price: f64,
    pub delivery_time_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Negotiation {
    pub negotiation_id: String,
    pub tender_id: String,
    pub vendor_id: String,
    /// Linked once the vendor submits a bid.
    pub bid_id: Option<String>,
    pub messages: Vec<NegotiationMessage>,
    pub status: NegotiationStatus,
    pub final_terms: Option<FinalTerms>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Negotiation {
    /// Open a thread with the agent's seed invitation message.
    pub fn opened(
        tender_id: impl Into<String>,
        vendor_id: impl Into<String>,
        seed_message: NegotiationMessage,
    ) -> Self {
        let now = Utc::now();
        Self {
            negotiation_id: Uuid::new_v4().to_string(),
            tender_id: tender_id.into(),
            vendor_id: vendor_id.into(),
            bid_id: None,
            messages: vec![seed_message],
            status: NegotiationStatus::Ongoing,
            final_terms: None,
            created_at: now,
            updated_at: now,
        }
    }
}
