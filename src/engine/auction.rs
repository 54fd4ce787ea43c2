// ==========================================
// Chem Procure - Reverse Auction Stage
// ==========================================
// Opens a timed descending-price auction seeded with the lowest
// negotiated price, accepts only strictly-improving bids, and tracks
// the current leader. The end_time passing does not close the auction;
// close() is the external trigger (preserved source behavior).
// ==========================================

use crate::config::EngineConfig;
use crate::domain::auction::{Auction, AuctionBid};
use crate::domain::types::{AgentType, AuctionStatus, BidStatus, TenderStatus};
use crate::domain::workflow_log::WorkflowLog;
use crate::engine::repositories::StageRepositories;
use crate::engine::transition::StageTransitionController;
use crate::repository::{RepositoryError, RepositoryResult};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AuctionEngine {
    repos: StageRepositories,
    transition: Arc<StageTransitionController>,
    config: EngineConfig,
}

impl AuctionEngine {
    pub fn new(
        repos: StageRepositories,
        transition: Arc<StageTransitionController>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repos,
            transition,
            config,
        }
    }

    /// Open the tender's auction, seeded from its accepted bids.
    /// No accepted bids means no auction and no error.
    pub fn start(&self, tender_id: &str) -> RepositoryResult<Option<Auction>> {
        let accepted = self
            .repos
            .bids
            .list_by_tender_and_status(tender_id, BidStatus::Accepted)?;
        if accepted.is_empty() {
            warn!(tender_id, "auction not started: no accepted bids");
            return Ok(None);
        }

        let starting_price = accepted
            .iter()
            .map(|b| b.current_price)
            .fold(f64::INFINITY, f64::min);

        let auction = Auction::live(tender_id, starting_price, self.config.auction_duration());
        self.repos.auctions.insert(&auction)?;

        self.repos.workflow_logs.insert(&WorkflowLog::entry(
            tender_id,
            AgentType::Auction,
            "start_auction",
            json!({ "starting_price": starting_price }),
            json!({}),
        ))?;

        self.transition
            .advance(tender_id, TenderStatus::Auction, AgentType::Auction)?;

        info!(
            tender_id,
            auction_id = auction.auction_id,
            starting_price,
            seeded_from = accepted.len(),
            "auction opened"
        );
        Ok(Some(auction))
    }

    /// Accept a competitive bid. The amount must strictly improve on
    /// the current lowest price; anything else is an explicit rejection
    /// the caller can surface, with no state written.
    ///
    /// Accepted bids append an immutable AuctionBid record and
    /// overwrite the running low/leader (last-write-wins; two
    /// near-simultaneous bids race without a guard).
    pub fn place_bid(
        &self,
        auction_id: &str,
        vendor_id: &str,
        amount: f64,
    ) -> RepositoryResult<Auction> {
        let Some(auction) = self.repos.auctions.find_by_id(auction_id)? else {
            return Err(RepositoryError::NotFound {
                entity: "Auction".to_string(),
                id: auction_id.to_string(),
            });
        };

        if auction.status != AuctionStatus::Live {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "auction {} is {}, not accepting bids",
                auction_id,
                auction.status.as_str()
            )));
        }

        if !amount.is_finite() || amount <= 0.0 {
            return Err(RepositoryError::FieldValueError {
                field: "amount".to_string(),
                message: format!("must be a positive number, got {amount}"),
            });
        }

        if amount >= auction.current_lowest_price {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "bid {} must be strictly lower than the current lowest price {}",
                amount, auction.current_lowest_price
            )));
        }

        self.repos
            .auction_bids
            .insert(&AuctionBid::now(auction_id, vendor_id, amount))?;
        self.repos
            .auctions
            .record_leading_bid(auction_id, amount, vendor_id)?;

        info!(auction_id, vendor_id, amount, "auction bid accepted");

        // Re-read so the caller sees the row as stored, including any
        // concurrent overwrite that won the race.
        self.repos
            .auctions
            .find_by_id(auction_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Auction".to_string(),
                id: auction_id.to_string(),
            })
    }

    /// External close trigger: live → completed. No bid is accepted
    /// afterwards.
    pub fn close(&self, auction_id: &str) -> RepositoryResult<Auction> {
        let Some(auction) = self.repos.auctions.find_by_id(auction_id)? else {
            return Err(RepositoryError::NotFound {
                entity: "Auction".to_string(),
                id: auction_id.to_string(),
            });
        };

        if !auction.status.can_transition_to(AuctionStatus::Completed) {
            return Err(RepositoryError::InvalidStateTransition {
                entity: "Auction".to_string(),
                from: auction.status.as_str().to_string(),
                to: AuctionStatus::Completed.as_str().to_string(),
            });
        }

        self.repos
            .auctions
            .set_status(auction_id, AuctionStatus::Completed)?;

        info!(
            auction_id,
            final_price = auction.current_lowest_price,
            leader = auction.current_leader_id.as_deref().unwrap_or("none"),
            "auction closed"
        );

        self.repos
            .auctions
            .find_by_id(auction_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Auction".to_string(),
                id: auction_id.to_string(),
            })
    }
}
