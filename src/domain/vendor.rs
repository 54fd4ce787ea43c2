// ==========================================
// Chem Procure - Vendor Domain Model
// ==========================================
// Read-only from the engine's perspective: vendors are owned by the
// external vendor registry and only consumed for scoring and lookups.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub vendor_id: String,
    pub name: String,
    /// Free-text product/category tags, e.g. "Sulfuric Acid Products"
    pub specializations: Vec<String>,
    /// Certification tags, e.g. "ISO9001"
    pub certifications: Vec<String>,
    /// 0.0 - 5.0 scale
    pub rating: f64,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(
        name: impl Into<String>,
        specializations: Vec<String>,
        certifications: Vec<String>,
        rating: f64,
        location: impl Into<String>,
    ) -> Self {
        Self {
            vendor_id: Uuid::new_v4().to_string(),
            name: name.into(),
            specializations,
            certifications,
            rating,
            location: location.into(),
            created_at: Utc::now(),
        }
    }
}

// ==========================================
// ShortlistedVendor - Tender × Vendor link
// ==========================================
// Written once by the shortlisting stage; the pending→approved flip is
// an external manager action, never the engine's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortlistedVendor {
    pub shortlist_id: String,
    pub tender_id: String,
    pub vendor_id: String,
    /// Invariant: 0..=100
    pub fit_score: i64,
    pub reasoning: String,
    pub status: crate::domain::types::ApprovalStatus,
    pub created_at: DateTime<Utc>,
}

impl ShortlistedVendor {
    pub fn pending(
        tender_id: impl Into<String>,
        vendor_id: impl Into<String>,
        fit_score: i64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            shortlist_id: Uuid::new_v4().to_string(),
            tender_id: tender_id.into(),
            vendor_id: vendor_id.into(),
            fit_score,
            reasoning: reasoning.into(),
            status: crate::domain::types::ApprovalStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
