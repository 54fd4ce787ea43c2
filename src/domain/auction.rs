// ==========================================
// Chem Procure - Auction Domain Model
// ==========================================
// Descending-price reverse auction, 1:1 with a tender.
// Invariants: current_lowest_price ≤ starting_price for the whole
// lifetime; once completed no further bids are accepted.
// ==========================================

use crate::domain::types::AuctionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auction {
    pub auction_id: String,
    pub tender_id: String,
    pub starting_price: f64,
    /// Monotonically non-increasing while live.
    pub current_lowest_price: f64,
    /// Vendor holding the current lowest accepted bid.
    pub current_leader_id: Option<String>,
    pub start_time: DateTime<Utc>,
    /// Bookkeeping only: the auction does NOT auto-complete when this
    /// passes. Closing is an external trigger (AuctionEngine::close).
    pub end_time: DateTime<Utc>,
    pub status: AuctionStatus,
    pub created_at: DateTime<Utc>,
}

impl Auction {
    /// Open a live auction seeded with the lowest negotiated price.
    pub fn live(
        tender_id: impl Into<String>,
        starting_price: f64,
        duration: chrono::Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            auction_id: Uuid::new_v4().to_string(),
            tender_id: tender_id.into(),
            starting_price,
            current_lowest_price: starting_price,
            current_leader_id: None,
            start_time: now,
            end_time: now + duration,
            status: AuctionStatus::Live,
            created_at: now,
        }
    }
}

// ==========================================
// AuctionBid - append-only competitive bid record
// ==========================================
// Never mutated or deleted. Every accepted record's amount was strictly
// below the auction's current_lowest_price at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionBid {
    pub auction_bid_id: String,
    pub auction_id: String,
    pub vendor_id: String,
    pub bid_amount: f64,
    pub bid_ts: DateTime<Utc>,
}

impl AuctionBid {
    pub fn now(
        auction_id: impl Into<String>,
        vendor_id: impl Into<String>,
        bid_amount: f64,
    ) -> Self {
        Self {
            auction_bid_id: Uuid::new_v4().to_string(),
            auction_id: auction_id.into(),
            vendor_id: vendor_id.into(),
            bid_amount,
            bid_ts: Utc::now(),
        }
    }
}
