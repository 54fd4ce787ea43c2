// ==========================================
// Chem Procure - Data Repository Layer
// ==========================================
// Responsibility: data access interfaces over SQLite.
// Red line: repositories contain no business logic; all queries are
// parameterized.
// ==========================================

pub mod auction_repo;
pub mod bid_repo;
pub mod error;
pub mod evaluation_repo;
pub mod negotiation_repo;
pub mod shortlist_repo;
pub mod tender_repo;
mod util;
pub mod vendor_repo;
pub mod workflow_log_repo;

// Re-export core repositories
pub use auction_repo::{AuctionBidRepository, AuctionRepository};
pub use bid_repo::BidRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use evaluation_repo::EvaluationRepository;
pub use negotiation_repo::NegotiationRepository;
pub use shortlist_repo::ShortlistRepository;
pub use tender_repo::TenderRepository;
pub use vendor_repo::VendorRepository;
pub use workflow_log_repo::WorkflowLogRepository;
