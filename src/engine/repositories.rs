// ==========================================
// Chem Procure - Engine Repository Bundle
// ==========================================
// Aggregates every repository the stage engines need, so engine
// constructors take one parameter instead of nine and tests can build
// the whole set from a single connection.
// ==========================================

use crate::repository::{
    AuctionBidRepository, AuctionRepository, BidRepository, EvaluationRepository,
    NegotiationRepository, RepositoryResult, ShortlistRepository, TenderRepository,
    VendorRepository, WorkflowLogRepository,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Repository set shared by the stage engines.
#[derive(Clone)]
pub struct StageRepositories {
    pub tenders: Arc<TenderRepository>,
    pub vendors: Arc<VendorRepository>,
    pub shortlist: Arc<ShortlistRepository>,
    pub bids: Arc<BidRepository>,
    pub negotiations: Arc<NegotiationRepository>,
    pub auctions: Arc<AuctionRepository>,
    pub auction_bids: Arc<AuctionBidRepository>,
    pub evaluations: Arc<EvaluationRepository>,
    pub workflow_logs: Arc<WorkflowLogRepository>,
}

impl StageRepositories {
    /// Build the full set over one shared connection.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            tenders: Arc::new(TenderRepository::from_connection(conn.clone())),
            vendors: Arc::new(VendorRepository::from_connection(conn.clone())),
            shortlist: Arc::new(ShortlistRepository::from_connection(conn.clone())),
            bids: Arc::new(BidRepository::from_connection(conn.clone())),
            negotiations: Arc::new(NegotiationRepository::from_connection(conn.clone())),
            auctions: Arc::new(AuctionRepository::from_connection(conn.clone())),
            auction_bids: Arc::new(AuctionBidRepository::from_connection(conn.clone())),
            evaluations: Arc::new(EvaluationRepository::from_connection(conn.clone())),
            workflow_logs: Arc::new(WorkflowLogRepository::from_connection(conn)),
        }
    }

    /// Open the database at `db_path` and build the set over it.
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }
}
