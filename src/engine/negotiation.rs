// ==========================================
// Chem Procure - Negotiation Stage
// ==========================================
// Opens one thread per approved shortlisted vendor, then runs the
// fixed concession protocol against vendor activity:
// - bid submitted → paced agent counter-offer asking for 5% more
// - message containing accept/agree → 5% concession applied, bid
//   accepted, paced agent confirmation closes the thread
// Any other message is recorded and changes nothing; threads have no
// timeout and stay ongoing indefinitely (preserved source behavior).
//
// The paced replies go through DelayRunner and return a cancellable
// handle, so a follow-up can be dropped if the tender moves on.
// ==========================================

use crate::config::EngineConfig;
use crate::domain::bid::{Bid, BidTerms};
use crate::domain::negotiation::{FinalTerms, Negotiation, NegotiationMessage};
use crate::domain::types::{
    AgentType, BidStatus, MessageSender, NegotiationStatus, TenderStatus,
};
use crate::domain::workflow_log::WorkflowLog;
use crate::engine::delay::{DelayHandle, DelayRunner};
use crate::engine::repositories::StageRepositories;
use crate::engine::transition::StageTransitionController;
use crate::repository::{RepositoryError, RepositoryResult};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of a bid submission: the stored bid plus the handle for the
/// paced counter-offer (None when the vendor has no open thread).
pub struct BidSubmission {
    pub bid: Bid,
    pub counter_offer: Option<DelayHandle>,
}

/// What a vendor message did to the negotiation.
pub enum VendorMessageOutcome {
    /// Acceptance keywords found: concession applied, bid accepted,
    /// confirmation scheduled.
    Accepted {
        agreed_price: f64,
        confirmation: DelayHandle,
    },
    /// Message recorded, nothing else changed.
    Noted,
    /// No thread (or no bid) to act on; nothing written.
    Ignored,
}

pub struct NegotiationEngine {
    repos: StageRepositories,
    transition: Arc<StageTransitionController>,
    delay: Arc<dyn DelayRunner>,
    config: EngineConfig,
}

impl NegotiationEngine {
    pub fn new(
        repos: StageRepositories,
        transition: Arc<StageTransitionController>,
        delay: Arc<dyn DelayRunner>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repos,
            transition,
            delay,
            config,
        }
    }

    // ==========================================
    // initiate - open threads for approved vendors
    // ==========================================

    /// Open one ongoing negotiation per approved shortlisted vendor,
    /// each seeded with the agent's invitation. Zero approved vendors
    /// means nothing happens: no threads, no log, no advance.
    pub fn initiate(&self, tender_id: &str) -> RepositoryResult<usize> {
        let approved = self.repos.shortlist.list_approved(tender_id)?;
        if approved.is_empty() {
            info!(tender_id, "negotiation initiation skipped: nothing approved");
            return Ok(0);
        }

        let mut opened = 0;
        for entry in &approved {
            let Some(vendor) = self.repos.vendors.find_by_id(&entry.vendor_id)? else {
                warn!(
                    tender_id,
                    vendor_id = entry.vendor_id,
                    "approved vendor missing from registry, thread not opened"
                );
                continue;
            };

            let seed = NegotiationMessage::now(
                MessageSender::Agent,
                format!(
                    "Hello {}, we invite you to participate in our tender. \
                     Please submit your best bid for this opportunity.",
                    vendor.name
                ),
            );
            self.repos
                .negotiations
                .insert(&Negotiation::opened(tender_id, &vendor.vendor_id, seed))?;
            opened += 1;
        }

        self.repos.workflow_logs.insert(&WorkflowLog::entry(
            tender_id,
            AgentType::Negotiation,
            "initiate_negotiations",
            json!({ "vendor_count": approved.len() }),
            json!({}),
        ))?;

        self.transition
            .advance(tender_id, TenderStatus::Negotiating, AgentType::Negotiation)?;

        info!(tender_id, opened, "negotiations initiated");
        Ok(opened)
    }

    // ==========================================
    // submit_bid - vendor opening offer
    // ==========================================

    /// Record the vendor's opening bid, note it in their thread, and
    /// schedule the agent's counter-offer reply.
    pub fn submit_bid(
        &self,
        tender_id: &str,
        vendor_id: &str,
        price: f64,
        delivery_time_days: i64,
        terms: BidTerms,
    ) -> RepositoryResult<BidSubmission> {
        if !price.is_finite() || price <= 0.0 {
            return Err(RepositoryError::FieldValueError {
                field: "price".to_string(),
                message: format!("must be a positive number, got {price}"),
            });
        }

        let bid = Bid::submitted(tender_id, vendor_id, price, delivery_time_days, terms);
        self.repos.bids.insert(&bid)?;

        let Some(negotiation) = self
            .repos
            .negotiations
            .find_by_tender_vendor(tender_id, vendor_id)?
        else {
            warn!(
                tender_id,
                vendor_id, "bid stored but vendor has no negotiation thread"
            );
            return Ok(BidSubmission {
                bid,
                counter_offer: None,
            });
        };

        self.repos.negotiations.append_message(
            &negotiation.negotiation_id,
            &NegotiationMessage::now(
                MessageSender::Vendor,
                format!(
                    "Initial bid submitted: ₹{:.0}. Delivery time: {} days.",
                    price, delivery_time_days
                ),
            ),
        )?;
        self.repos
            .negotiations
            .link_bid(&negotiation.negotiation_id, &bid.bid_id)?;

        let counter_offer = self.schedule_counter_offer(
            negotiation.negotiation_id.clone(),
            bid.bid_id.clone(),
        );

        info!(
            tender_id,
            vendor_id,
            bid_id = bid.bid_id,
            price,
            "bid submitted, counter-offer scheduled"
        );
        Ok(BidSubmission {
            bid,
            counter_offer: Some(counter_offer),
        })
    }

    /// Phase two of the bid reply: after the pacing pause, ask for a 5%
    /// improvement and move the bid under negotiation.
    fn schedule_counter_offer(&self, negotiation_id: String, bid_id: String) -> DelayHandle {
        let negotiations = self.repos.negotiations.clone();
        let bids = self.repos.bids.clone();

        self.delay.schedule(
            self.config.counter_delay(),
            Box::new(move || {
                let reply = NegotiationMessage::now(
                    MessageSender::Agent,
                    "Thank you for your bid. We're reviewing your offer. \
                     Can you improve the price by 5% to be more competitive?",
                );
                if let Err(e) = negotiations.append_message(&negotiation_id, &reply) {
                    error!(negotiation_id, %e, "counter-offer message write failed");
                    return;
                }

                match bids.find_by_id(&bid_id) {
                    Ok(Some(bid)) if bid.status.can_transition_to(BidStatus::UnderNegotiation) => {
                        if let Err(e) = bids.update_status(
                            &bid_id,
                            BidStatus::UnderNegotiation,
                            Utc::now(),
                        ) {
                            error!(bid_id, %e, "bid status update failed");
                        }
                    }
                    Ok(Some(bid)) => {
                        // The vendor accepted before the counter landed.
                        warn!(
                            bid_id,
                            status = bid.status.as_str(),
                            "counter-offer skipped: bid already settled"
                        );
                    }
                    Ok(None) => warn!(bid_id, "counter-offer skipped: bid vanished"),
                    Err(e) => error!(bid_id, %e, "bid lookup failed"),
                }
            }),
        )
    }

    // ==========================================
    // on_vendor_message - concession protocol
    // ==========================================

    /// Record a vendor-authored message. Acceptance keywords trigger
    /// the concession: price drops 5% (rounded), the bid is accepted,
    /// and the paced confirmation closes the thread with final terms.
    pub fn on_vendor_message(
        &self,
        negotiation_id: &str,
        text: &str,
    ) -> RepositoryResult<VendorMessageOutcome> {
        let Some(negotiation) = self.repos.negotiations.find_by_id(negotiation_id)? else {
            warn!(negotiation_id, "vendor message dropped: no such thread");
            return Ok(VendorMessageOutcome::Ignored);
        };

        // Closed threads take no further input; a repeat acceptance
        // must not re-apply the concession or rewrite final terms.
        if negotiation.status != NegotiationStatus::Ongoing {
            warn!(
                negotiation_id,
                status = negotiation.status.as_str(),
                "vendor message dropped: thread is closed"
            );
            return Ok(VendorMessageOutcome::Ignored);
        }

        self.repos.negotiations.append_message(
            negotiation_id,
            &NegotiationMessage::now(MessageSender::Vendor, text),
        )?;

        let lowered = text.to_lowercase();
        if !(lowered.contains("accept") || lowered.contains("agree")) {
            return Ok(VendorMessageOutcome::Noted);
        }

        let Some(bid_id) = negotiation.bid_id.as_deref() else {
            warn!(negotiation_id, "acceptance without a linked bid, ignored");
            return Ok(VendorMessageOutcome::Ignored);
        };
        let Some(bid) = self.repos.bids.find_by_id(bid_id)? else {
            warn!(negotiation_id, bid_id, "acceptance for a missing bid, ignored");
            return Ok(VendorMessageOutcome::Ignored);
        };

        if !bid.status.can_transition_to(BidStatus::Accepted) {
            return Err(RepositoryError::InvalidStateTransition {
                entity: "Bid".to_string(),
                from: bid.status.as_str().to_string(),
                to: BidStatus::Accepted.as_str().to_string(),
            });
        }

        let agreed_price = (bid.current_price * (1.0 - self.config.concession_pct)).round();
        self.repos.bids.update_price_and_status(
            bid_id,
            agreed_price,
            BidStatus::Accepted,
            Utc::now(),
        )?;

        let confirmation = self.schedule_confirmation(
            negotiation_id.to_string(),
            agreed_price,
            bid.delivery_time_days,
        );

        info!(
            negotiation_id,
            bid_id, agreed_price, "vendor accepted, confirmation scheduled"
        );
        Ok(VendorMessageOutcome::Accepted {
            agreed_price,
            confirmation,
        })
    }

    /// Phase two of acceptance: confirm and complete the thread.
    fn schedule_confirmation(
        &self,
        negotiation_id: String,
        agreed_price: f64,
        delivery_time_days: i64,
    ) -> DelayHandle {
        let negotiations = self.repos.negotiations.clone();

        self.delay.schedule(
            self.config.confirm_delay(),
            Box::new(move || {
                let current = match negotiations.find_by_id(&negotiation_id) {
                    Ok(Some(n)) => n,
                    Ok(None) => {
                        warn!(negotiation_id, "confirmation skipped: thread vanished");
                        return;
                    }
                    Err(e) => {
                        error!(negotiation_id, %e, "confirmation lookup failed");
                        return;
                    }
                };
                if !current
                    .status
                    .can_transition_to(NegotiationStatus::Completed)
                {
                    warn!(
                        negotiation_id,
                        status = current.status.as_str(),
                        "confirmation skipped: thread already closed"
                    );
                    return;
                }

                let message = NegotiationMessage::now(
                    MessageSender::Agent,
                    format!(
                        "Excellent! We've updated your bid to ₹{:.0}. \
                         Your bid has been accepted for the auction phase.",
                        agreed_price
                    ),
                );
                if let Err(e) = negotiations.append_message(&negotiation_id, &message) {
                    error!(negotiation_id, %e, "confirmation message write failed");
                    return;
                }
                if let Err(e) = negotiations.complete(
                    &negotiation_id,
                    &FinalTerms {
                        agreed_price,
                        delivery_time_days,
                    },
                ) {
                    error!(negotiation_id, %e, "negotiation completion write failed");
                }
            }),
        )
    }
}
