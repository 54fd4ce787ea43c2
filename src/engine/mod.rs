// ==========================================
// Chem Procure - Engine Layer
// ==========================================
// Responsibility: the tender lifecycle rules — scoring, stage
// progression, concession protocol, auction mechanics, evaluation.
// Red line: engines never touch SQL directly; every rule outputs a
// reason (reasoning text, log entry, or explicit rejection).
// ==========================================

pub mod auction;
pub mod delay;
pub mod evaluation;
pub mod negotiation;
pub mod repositories;
pub mod scoring;
pub mod shortlisting;
pub mod transition;

// Re-export core engines
pub use auction::AuctionEngine;
pub use delay::{DelayHandle, DelayRunner, InlineDelayRunner, TokioDelayRunner};
pub use evaluation::EvaluationEngine;
pub use negotiation::{BidSubmission, NegotiationEngine, VendorMessageOutcome};
pub use repositories::StageRepositories;
pub use scoring::{DeliverySampler, EvaluationScores};
pub use shortlisting::ShortlistingEngine;
pub use transition::StageTransitionController;
