// ==========================================
// Chem Procure - Engine Configuration
// ==========================================
// Tuning parameters for the stage engines. Defaults reproduce the
// production rules; overrides come in as JSON with every field
// optional.
// ==========================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stage engine tuning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum fit score a vendor needs to enter the shortlist.
    #[serde(default = "default_shortlist_score_floor")]
    pub shortlist_score_floor: i64,

    /// Maximum number of shortlist entries per tender.
    #[serde(default = "default_shortlist_top_n")]
    pub shortlist_top_n: usize,

    /// Concession applied when a vendor accepts the counter-offer
    /// (0.05 = the agreed price is 95% of the current price).
    #[serde(default = "default_concession_pct")]
    pub concession_pct: f64,

    /// Auction window length in minutes (bookkeeping only; the auction
    /// is closed by an external trigger, not by this timer).
    #[serde(default = "default_auction_duration_mins")]
    pub auction_duration_mins: i64,

    /// How many of the lowest auction bids get evaluated.
    #[serde(default = "default_evaluation_top_n")]
    pub evaluation_top_n: usize,

    /// Pause before the agent's counter-offer reply (UX pacing, no
    /// correctness role).
    #[serde(default = "default_counter_delay_ms")]
    pub counter_delay_ms: u64,

    /// Pause before the agent's acceptance confirmation.
    #[serde(default = "default_confirm_delay_ms")]
    pub confirm_delay_ms: u64,
}

fn default_shortlist_score_floor() -> i64 {
    60
}

fn default_shortlist_top_n() -> usize {
    5
}

fn default_concession_pct() -> f64 {
    0.05
}

fn default_auction_duration_mins() -> i64 {
    30
}

fn default_evaluation_top_n() -> usize {
    3
}

fn default_counter_delay_ms() -> u64 {
    2_000
}

fn default_confirm_delay_ms() -> u64 {
    1_500
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shortlist_score_floor: default_shortlist_score_floor(),
            shortlist_top_n: default_shortlist_top_n(),
            concession_pct: default_concession_pct(),
            auction_duration_mins: default_auction_duration_mins(),
            evaluation_top_n: default_evaluation_top_n(),
            counter_delay_ms: default_counter_delay_ms(),
            confirm_delay_ms: default_confirm_delay_ms(),
        }
    }
}

impl EngineConfig {
    /// Parse an overrides document; absent fields keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn counter_delay(&self) -> Duration {
        Duration::from_millis(self.counter_delay_ms)
    }

    pub fn confirm_delay(&self) -> Duration {
        Duration::from_millis(self.confirm_delay_ms)
    }

    pub fn auction_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.auction_duration_mins)
    }
}
