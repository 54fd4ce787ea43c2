// ==========================================
// Chem Procure - Vendor Shortlisting Stage
// ==========================================
// Scores the whole vendor registry against one tender, keeps everyone
// at or above the score floor, ranks them (stable: equal scores keep
// registry order), and persists the top N as pending shortlist rows.
// Completion always logs and always advances the tender to
// awaiting_approval, even when nobody qualified.
// ==========================================

use crate::config::EngineConfig;
use crate::domain::types::{AgentType, TenderStatus};
use crate::domain::vendor::ShortlistedVendor;
use crate::engine::repositories::StageRepositories;
use crate::engine::scoring;
use crate::engine::transition::StageTransitionController;
use crate::repository::RepositoryResult;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ShortlistingEngine {
    repos: StageRepositories,
    transition: Arc<StageTransitionController>,
    config: EngineConfig,
}

impl ShortlistingEngine {
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

    /// Run the stage for one tender. Returns the number of shortlist
    /// rows written (0 when the tender is missing or nobody qualified).
    pub fn run(&self, tender_id: &str) -> RepositoryResult<usize> {
        let Some(tender) = self.repos.tenders.find_by_id(tender_id)? else {
            warn!(tender_id, "shortlisting skipped: tender not found");
            return Ok(0);
        };

        let vendors = self.repos.vendors.list_all()?;

        let mut shortlisted: Vec<ShortlistedVendor> = Vec::new();
        for vendor in &vendors {
            let score = scoring::fit_score(&tender, vendor);
            if score >= self.config.shortlist_score_floor {
                let reasoning = scoring::shortlist_reasoning(&tender, vendor, score);
                shortlisted.push(ShortlistedVendor::pending(
                    tender_id,
                    &vendor.vendor_id,
                    score,
                    reasoning,
                ));
            }
        }

        // Stable sort: equal fit scores keep registry order.
        shortlisted.sort_by(|a, b| b.fit_score.cmp(&a.fit_score));
        shortlisted.truncate(self.config.shortlist_top_n);

        if !shortlisted.is_empty() {
            self.repos.shortlist.insert_many(&shortlisted)?;
        }

        self.repos
            .workflow_logs
            .insert(&crate::domain::workflow_log::WorkflowLog::entry(
                tender_id,
                AgentType::VendorShortlisting,
                "shortlist_vendors",
                json!({ "tender": tender }),
                json!({ "count": shortlisted.len() }),
            ))?;

        self.transition
            .advance(tender_id, TenderStatus::AwaitingApproval, AgentType::Manager)?;

        info!(
            tender_id,
            vendors_scored = vendors.len(),
            shortlisted = shortlisted.len(),
            "shortlisting completed"
        );
        Ok(shortlisted.len())
    }
}
