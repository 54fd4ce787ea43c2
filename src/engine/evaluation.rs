// ==========================================
// Chem Procure - Evaluation Stage
// ==========================================
// Takes the tender's auction bids sorted ascending, evaluates the
// lowest N on price/quality/delivery, persists the breakdowns, and
// completes the tender. The lowest bidder does not automatically win
// overall: quality and delivery factor in by design.
// ==========================================

use crate::config::EngineConfig;
use crate::domain::evaluation::Evaluation;
use crate::domain::types::{AgentType, TenderStatus};
use crate::domain::workflow_log::WorkflowLog;
use crate::engine::repositories::StageRepositories;
use crate::engine::scoring::{self, DeliverySampler};
use crate::engine::transition::StageTransitionController;
use crate::repository::RepositoryResult;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct EvaluationEngine {
    repos: StageRepositories,
    transition: Arc<StageTransitionController>,
    sampler: Mutex<DeliverySampler>,
    config: EngineConfig,
}

impl EvaluationEngine {
    pub fn new(
        repos: StageRepositories,
        transition: Arc<StageTransitionController>,
        sampler: DeliverySampler,
        config: EngineConfig,
    ) -> Self {
        Self {
            repos,
            transition,
            sampler: Mutex::new(sampler),
            config,
        }
    }

    /// Evaluate the tender's auction outcome. Missing auction or zero
    /// bids is a silent no-op. Returns the number of evaluations
    /// written.
    pub fn evaluate(&self, tender_id: &str) -> RepositoryResult<usize> {
        let Some(auction) = self.repos.auctions.find_by_tender(tender_id)? else {
            warn!(tender_id, "evaluation skipped: no auction");
            return Ok(0);
        };

        let auction_bids = self
            .repos
            .auction_bids
            .list_by_auction_ascending(&auction.auction_id)?;
        if auction_bids.is_empty() {
            warn!(tender_id, "evaluation skipped: no auction bids");
            return Ok(0);
        }

        let mut evaluations: Vec<Evaluation> = Vec::new();
        for (rank_index, auction_bid) in auction_bids
            .iter()
            .take(self.config.evaluation_top_n)
            .enumerate()
        {
            let Some(vendor) = self.repos.vendors.find_by_id(&auction_bid.vendor_id)? else {
                warn!(
                    tender_id,
                    vendor_id = auction_bid.vendor_id,
                    "evaluation skipped for vendor missing from registry"
                );
                continue;
            };

            let delivery = self
                .sampler
                .lock()
                .map_err(|e| crate::repository::RepositoryError::LockError(e.to_string()))?
                .sample();
            let scores = scoring::evaluation_scores(rank_index, vendor.rating, delivery);

            evaluations.push(Evaluation::new(
                tender_id,
                &vendor.vendor_id,
                scores.overall_score,
                scores.price_score,
                scores.quality_score,
                scores.delivery_score,
                scoring::recommendation_for_rank(rank_index),
            ));
        }

        self.repos.evaluations.insert_many(&evaluations)?;

        self.repos.workflow_logs.insert(&WorkflowLog::entry(
            tender_id,
            AgentType::Evaluation,
            "evaluate_vendors",
            json!({ "bid_count": auction_bids.len() }),
            json!({ "evaluation_count": evaluations.len() }),
        ))?;

        self.transition
            .advance(tender_id, TenderStatus::Completed, AgentType::Manager)?;

        info!(
            tender_id,
            evaluated = evaluations.len(),
            "evaluation completed"
        );
        Ok(evaluations.len())
    }
}
