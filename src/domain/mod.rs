// ==========================================
// Chem Procure - Domain Layer
// ==========================================
// Responsibility: entities, status types, typed value objects.
// Red line: no data access logic, no engine logic.
// ==========================================

pub mod auction;
pub mod bid;
pub mod evaluation;
pub mod negotiation;
pub mod tender;
pub mod types;
pub mod vendor;
pub mod workflow_log;

// Re-export core types
pub use auction::{Auction, AuctionBid};
pub use bid::{Bid, BidTerms};
pub use evaluation::Evaluation;
pub use negotiation::{FinalTerms, Negotiation, NegotiationMessage};
pub use tender::{Specifications, Tender};
pub use types::{
    AgentType, ApprovalStatus, AuctionStatus, BidStatus, MessageSender, NegotiationStatus,
    TenderStatus,
};
pub use vendor::{ShortlistedVendor, Vendor};
pub use workflow_log::WorkflowLog;
