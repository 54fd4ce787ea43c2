// ==========================================
// Chem Procure - Core Status Types
// ==========================================
// Responsibility: status enums for every lifecycle entity, plus the
// explicit state machines that are the only legal way to move them.
// Red line: status strings are never compared or written raw outside
// this module; storage goes through as_str()/parse().
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// AgentType - which stage owns a tender
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Chatbot,
    VendorShortlisting,
    Manager,
    Negotiation,
    Auction,
    Evaluation,
    VendorPortal,
}

impl AgentType {
    /// String form used in the database and workflow log
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Chatbot => "chatbot",
            AgentType::VendorShortlisting => "vendor_shortlisting",
            AgentType::Manager => "manager",
            AgentType::Negotiation => "negotiation",
            AgentType::Auction => "auction",
            AgentType::Evaluation => "evaluation",
            AgentType::VendorPortal => "vendor_portal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "chatbot" => Some(AgentType::Chatbot),
            "vendor_shortlisting" => Some(AgentType::VendorShortlisting),
            "manager" => Some(AgentType::Manager),
            "negotiation" => Some(AgentType::Negotiation),
            "auction" => Some(AgentType::Auction),
            "evaluation" => Some(AgentType::Evaluation),
            "vendor_portal" => Some(AgentType::VendorPortal),
            _ => None,
        }
    }
}

// ==========================================
// TenderStatus - tender lifecycle state machine
// ==========================================
// Chain: draft → collecting_info → shortlisting → awaiting_approval
//        → negotiating → auction → evaluating → completed
// cancelled is reachable from any non-terminal state (external trigger).
//
// Stages may skip intermediate states (e.g. evaluation moves a tender
// from `auction` straight to `completed`), so legality is "forward along
// the chain", not "adjacent step only". Backward moves are illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenderStatus {
    Draft,
    CollectingInfo,
    Shortlisting,
    AwaitingApproval,
    Negotiating,
    Auction,
    Evaluating,
    Completed,
    Cancelled,
}

impl TenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenderStatus::Draft => "draft",
            TenderStatus::CollectingInfo => "collecting_info",
            TenderStatus::Shortlisting => "shortlisting",
            TenderStatus::AwaitingApproval => "awaiting_approval",
            TenderStatus::Negotiating => "negotiating",
            TenderStatus::Auction => "auction",
            TenderStatus::Evaluating => "evaluating",
            TenderStatus::Completed => "completed",
            TenderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(TenderStatus::Draft),
            "collecting_info" => Some(TenderStatus::CollectingInfo),
            "shortlisting" => Some(TenderStatus::Shortlisting),
            "awaiting_approval" => Some(TenderStatus::AwaitingApproval),
            "negotiating" => Some(TenderStatus::Negotiating),
            "auction" => Some(TenderStatus::Auction),
            "evaluating" => Some(TenderStatus::Evaluating),
            "completed" => Some(TenderStatus::Completed),
            "cancelled" => Some(TenderStatus::Cancelled),
            _ => None,
        }
    }

    /// Position along the forward chain. Cancelled sits outside the chain.
    fn order(&self) -> Option<u8> {
        match self {
            TenderStatus::Draft => Some(0),
            TenderStatus::CollectingInfo => Some(1),
            TenderStatus::Shortlisting => Some(2),
            TenderStatus::AwaitingApproval => Some(3),
            TenderStatus::Negotiating => Some(4),
            TenderStatus::Auction => Some(5),
            TenderStatus::Evaluating => Some(6),
            TenderStatus::Completed => Some(7),
            TenderStatus::Cancelled => None,
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TenderStatus::Completed | TenderStatus::Cancelled)
    }

    /// Legality of a status move.
    ///
    /// - same state: allowed (idempotent repeat, no-op in effect)
    /// - cancelled: allowed from any non-terminal state
    /// - otherwise: strictly forward along the chain
    pub fn can_transition_to(&self, next: TenderStatus) -> bool {
        if *self == next {
            return true;
        }
        if next == TenderStatus::Cancelled {
            return !self.is_terminal();
        }
        match (self.order(), next.order()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

// ==========================================
// BidStatus - negotiation-phase bid state machine
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Submitted,
    UnderNegotiation,
    Accepted,
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Submitted => "submitted",
            BidStatus::UnderNegotiation => "under_negotiation",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(BidStatus::Submitted),
            "under_negotiation" => Some(BidStatus::UnderNegotiation),
            "accepted" => Some(BidStatus::Accepted),
            "rejected" => Some(BidStatus::Rejected),
            _ => None,
        }
    }

    /// A vendor can accept straight from `submitted` (before the agent's
    /// counter-offer lands), so both pre-terminal states may close out.
    pub fn can_transition_to(&self, next: BidStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (BidStatus::Submitted, BidStatus::UnderNegotiation)
                | (BidStatus::Submitted, BidStatus::Accepted)
                | (BidStatus::Submitted, BidStatus::Rejected)
                | (BidStatus::UnderNegotiation, BidStatus::Accepted)
                | (BidStatus::UnderNegotiation, BidStatus::Rejected)
        )
    }
}

// ==========================================
// NegotiationStatus
// ==========================================
// ongoing → completed | failed, one-way. There is no timeout: a
// negotiation that never sees an acceptance stays ongoing indefinitely
// (preserved source behavior, flagged for product clarification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    Ongoing,
    Completed,
    Failed,
}

impl NegotiationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NegotiationStatus::Ongoing => "ongoing",
            NegotiationStatus::Completed => "completed",
            NegotiationStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ongoing" => Some(NegotiationStatus::Ongoing),
            "completed" => Some(NegotiationStatus::Completed),
            "failed" => Some(NegotiationStatus::Failed),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: NegotiationStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (NegotiationStatus::Ongoing, NegotiationStatus::Completed)
                | (NegotiationStatus::Ongoing, NegotiationStatus::Failed)
        )
    }
}

// ==========================================
// AuctionStatus
// ==========================================
// scheduled → live → completed; cancelled from any non-terminal state.
// end_time passing does NOT auto-complete a live auction — closing is an
// external trigger (preserved source behavior, see AuctionEngine::close).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Scheduled => "scheduled",
            AuctionStatus::Live => "live",
            AuctionStatus::Completed => "completed",
            AuctionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(AuctionStatus::Scheduled),
            "live" => Some(AuctionStatus::Live),
            "completed" => Some(AuctionStatus::Completed),
            "cancelled" => Some(AuctionStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AuctionStatus::Completed | AuctionStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: AuctionStatus) -> bool {
        if *self == next {
            return true;
        }
        if next == AuctionStatus::Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (AuctionStatus::Scheduled, AuctionStatus::Live)
                | (AuctionStatus::Live, AuctionStatus::Completed)
        )
    }
}

// ==========================================
// ApprovalStatus - shortlist approval
// ==========================================
// pending → approved, set by an external manager action only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            _ => None,
        }
    }
}

// ==========================================
// MessageSender - negotiation thread author
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    System,
    Vendor,
    Agent,
}

impl MessageSender {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSender::System => "system",
            MessageSender::Vendor => "vendor",
            MessageSender::Agent => "agent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(MessageSender::System),
            "vendor" => Some(MessageSender::Vendor),
            "agent" => Some(MessageSender::Agent),
            _ => None,
        }
    }
}

// ==========================================
// Unit tests - transition legality boundaries
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tender_forward_moves_allowed() {
        assert!(TenderStatus::Draft.can_transition_to(TenderStatus::CollectingInfo));
        assert!(TenderStatus::Shortlisting.can_transition_to(TenderStatus::AwaitingApproval));
        // Stage skip: evaluation finishes straight to completed
        assert!(TenderStatus::Auction.can_transition_to(TenderStatus::Completed));
    }

    #[test]
    fn tender_backward_moves_rejected() {
        assert!(!TenderStatus::Negotiating.can_transition_to(TenderStatus::Shortlisting));
        assert!(!TenderStatus::Completed.can_transition_to(TenderStatus::Auction));
    }

    #[test]
    fn tender_same_state_is_idempotent() {
        assert!(TenderStatus::Auction.can_transition_to(TenderStatus::Auction));
        assert!(TenderStatus::Completed.can_transition_to(TenderStatus::Completed));
    }

    #[test]
    fn tender_cancel_only_from_non_terminal() {
        assert!(TenderStatus::Draft.can_transition_to(TenderStatus::Cancelled));
        assert!(TenderStatus::Negotiating.can_transition_to(TenderStatus::Cancelled));
        assert!(!TenderStatus::Completed.can_transition_to(TenderStatus::Cancelled));
    }

    #[test]
    fn cancelled_accepts_nothing_forward() {
        assert!(!TenderStatus::Cancelled.can_transition_to(TenderStatus::Completed));
        assert!(!TenderStatus::Cancelled.can_transition_to(TenderStatus::Draft));
    }

    #[test]
    fn bid_acceptance_paths() {
        assert!(BidStatus::Submitted.can_transition_to(BidStatus::UnderNegotiation));
        assert!(BidStatus::Submitted.can_transition_to(BidStatus::Accepted));
        assert!(BidStatus::UnderNegotiation.can_transition_to(BidStatus::Accepted));
        assert!(!BidStatus::Accepted.can_transition_to(BidStatus::UnderNegotiation));
        assert!(!BidStatus::Rejected.can_transition_to(BidStatus::Accepted));
    }

    #[test]
    fn negotiation_completion_is_one_way() {
        assert!(NegotiationStatus::Ongoing.can_transition_to(NegotiationStatus::Completed));
        assert!(!NegotiationStatus::Completed.can_transition_to(NegotiationStatus::Ongoing));
        assert!(!NegotiationStatus::Failed.can_transition_to(NegotiationStatus::Completed));
    }

    #[test]
    fn auction_lifecycle() {
        assert!(AuctionStatus::Scheduled.can_transition_to(AuctionStatus::Live));
        assert!(AuctionStatus::Live.can_transition_to(AuctionStatus::Completed));
        assert!(AuctionStatus::Live.can_transition_to(AuctionStatus::Cancelled));
        assert!(!AuctionStatus::Completed.can_transition_to(AuctionStatus::Live));
        assert!(!AuctionStatus::Scheduled.can_transition_to(AuctionStatus::Completed));
    }

    #[test]
    fn status_strings_round_trip() {
        for s in [
            TenderStatus::Draft,
            TenderStatus::CollectingInfo,
            TenderStatus::Shortlisting,
            TenderStatus::AwaitingApproval,
            TenderStatus::Negotiating,
            TenderStatus::Auction,
            TenderStatus::Evaluating,
            TenderStatus::Completed,
            TenderStatus::Cancelled,
        ] {
            assert_eq!(TenderStatus::parse(s.as_str()), Some(s));
        }
        for a in [
            AgentType::Chatbot,
            AgentType::VendorShortlisting,
            AgentType::Manager,
            AgentType::Negotiation,
            AgentType::Auction,
            AgentType::Evaluation,
            AgentType::VendorPortal,
        ] {
            assert_eq!(AgentType::parse(a.as_str()), Some(a));
        }
    }
}
