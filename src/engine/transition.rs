// ==========================================
// Chem Procure - Stage Transition Controller
// ==========================================
// The only writer of tender.status / tender.current_agent. Legality is
// centralized here through the TenderStatus state machine: forward
// moves and cancellation pass, backward moves are rejected, repeating
// the current state is a no-op in effect.
// ==========================================

use crate::domain::types::{AgentType, TenderStatus};
use crate::engine::repositories::StageRepositories;
use crate::repository::{RepositoryError, RepositoryResult};
use chrono::Utc;
use tracing::{info, warn};

pub struct StageTransitionController {
    repos: StageRepositories,
}

impl StageTransitionController {
    pub fn new(repos: StageRepositories) -> Self {
        Self { repos }
    }

    /// Move a tender to `new_status` under `new_agent`, bumping
    /// updated_at.
    ///
    /// - missing tender: silent no-op (stage functions treat absent
    ///   records as nothing-to-do)
    /// - illegal move: `InvalidStateTransition`
    /// - repeat of the current state: updated_at bump only
    pub fn advance(
        &self,
        tender_id: &str,
        new_status: TenderStatus,
        new_agent: AgentType,
    ) -> RepositoryResult<()> {
        let Some(tender) = self.repos.tenders.find_by_id(tender_id)? else {
            warn!(tender_id, "advance skipped: tender not found");
            return Ok(());
        };

        if !tender.status.can_transition_to(new_status) {
            return Err(RepositoryError::InvalidStateTransition {
                entity: "Tender".to_string(),
                from: tender.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
            });
        }

        self.repos
            .tenders
            .update_status(tender_id, new_status, new_agent, Utc::now())?;

        info!(
            tender_id,
            from = tender.status.as_str(),
            to = new_status.as_str(),
            agent = new_agent.as_str(),
            "tender advanced"
        );
        Ok(())
    }

    /// External cancellation pathway; legal from any non-terminal state.
    pub fn cancel(&self, tender_id: &str, agent: AgentType) -> RepositoryResult<()> {
        self.advance(tender_id, TenderStatus::Cancelled, agent)
    }
}
