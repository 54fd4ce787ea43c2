// ==========================================
// Chem Procure - Core Library
// ==========================================
// Tender lifecycle engine for chemical procurement: vendor
// fit-scoring, staged workflow progression, negotiation concession
// protocol, reverse auction, multi-criteria evaluation.
// Invoked by request handlers; no process surface of its own.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Data repository layer - SQLite access
pub mod repository;

// Engine layer - lifecycle rules
pub mod engine;

// Configuration layer - engine tuning
pub mod config;

// Database infrastructure (connection init / PRAGMA unification)
pub mod db;

// Logging
pub mod logging;

// Transport layer - chat hub and automation webhook
pub mod transport;

// ==========================================
// Re-export core types
// ==========================================

// Domain types
pub use domain::{
    AgentType, ApprovalStatus, AuctionStatus, BidStatus, MessageSender, NegotiationStatus,
    TenderStatus,
};

// Domain entities
pub use domain::{
    Auction, AuctionBid, Bid, BidTerms, Evaluation, FinalTerms, Negotiation, NegotiationMessage,
    ShortlistedVendor, Specifications, Tender, Vendor, WorkflowLog,
};

// Engines
pub use engine::{
    AuctionEngine, DeliverySampler, EvaluationEngine, NegotiationEngine, ShortlistingEngine,
    StageRepositories, StageTransitionController,
};

// Configuration
pub use config::EngineConfig;

// ==========================================
// Constants
// ==========================================

// System version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Chem Procure";
