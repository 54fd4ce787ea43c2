// ==========================================
// Chem Procure - Scoring Module
// ==========================================
// Pure, deterministic fit-score and evaluation sub-score rules.
// Red line: no I/O, no repository access; every score comes with a
// reproducible rule.
// ==========================================

use crate::domain::tender::Tender;
use crate::domain::vendor::Vendor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ==========================================
// Fit score - vendor vs tender compatibility, 0..=100
// ==========================================
// Weights:
// +40 specialization first-word substring match on the chemical name
// +20 at least two certifications
// +rating×8 (0..=40 on the 0-5 scale)
// +20 vendor location contains the delivery location's first segment
// Sum is rounded, then clamped at 100. All terms are non-negative, so
// no floor is needed.

/// Does any specialization's first word occur in the chemical name?
/// Comparison is lower-cased on both sides.
fn specialization_match(tender: &Tender, vendor: &Vendor) -> bool {
    let chemical = tender.chemical_name.to_lowercase();
    vendor.specializations.iter().any(|spec| {
        let lowered = spec.to_lowercase();
        let first_word = lowered.split(' ').next().unwrap_or("");
        chemical.contains(first_word)
    })
}

/// Does the vendor's location contain the first comma-delimited segment
/// of the delivery location? ("Mumbai, Maharashtra" matches "Mumbai")
fn location_match(tender: &Tender, vendor: &Vendor) -> bool {
    let delivery = tender.delivery_location.to_lowercase();
    let first_segment = delivery.split(',').next().unwrap_or("");
    vendor.location.to_lowercase().contains(first_segment)
}

/// Deterministic 0-100 compatibility measure between vendor and tender.
pub fn fit_score(tender: &Tender, vendor: &Vendor) -> i64 {
    let mut score = 0.0;

    if specialization_match(tender, vendor) {
        score += 40.0;
    }

    if vendor.certifications.len() >= 2 {
        score += 20.0;
    }

    score += vendor.rating * 8.0;

    if location_match(tender, vendor) {
        score += 20.0;
    }

    (score.round() as i64).min(100)
}

/// Human-readable clauses for every contributing condition that held,
/// joined into sentences. A vendor matching nothing still gets the
/// trailing period.
pub fn shortlist_reasoning(tender: &Tender, vendor: &Vendor, _score: i64) -> String {
    let mut reasons: Vec<String> = Vec::new();

    if specialization_match(tender, vendor) {
        reasons.push(format!(
            "Specializes in {} or related chemicals",
            tender.chemical_name
        ));
    }

    if vendor.certifications.len() >= 2 {
        reasons.push(format!(
            "Holds {} relevant certifications",
            vendor.certifications.len()
        ));
    }

    if vendor.rating >= 4.5 {
        reasons.push(format!("High vendor rating of {}/5.0", vendor.rating));
    }

    if location_match(tender, vendor) {
        reasons.push("Located near delivery location".to_string());
    }

    reasons.join(". ") + "."
}

// ==========================================
// Evaluation sub-scores
// ==========================================

/// Multi-criteria scores for one auction participant.
///
/// Sub-scores are stored rounded; overall_score is blended from the
/// unrounded values first and rounded once, matching the production
/// rule exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationScores {
    pub price_score: i64,
    pub quality_score: i64,
    pub delivery_score: i64,
    pub overall_score: i64,
}

/// Compute the evaluation breakdown for the bid at `rank_index`
/// (0-based, bids sorted ascending by amount).
///
/// price_score = 100 − 15×rank_index with no floor: from rank 7 on it
/// goes negative. That is the production rule as shipped, preserved
/// rather than clamped.
pub fn evaluation_scores(
    rank_index: usize,
    vendor_rating: f64,
    delivery_score: f64,
) -> EvaluationScores {
    let price = 100.0 - 15.0 * rank_index as f64;
    let quality = (vendor_rating / 5.0) * 100.0;
    let overall = price * 0.5 + quality * 0.3 + delivery_score * 0.2;

    EvaluationScores {
        price_score: price.round() as i64,
        quality_score: quality.round() as i64,
        delivery_score: delivery_score.round() as i64,
        overall_score: overall.round() as i64,
    }
}

/// Recommendation text keyed on rank.
pub fn recommendation_for_rank(rank_index: usize) -> &'static str {
    match rank_index {
        0 => "Highly recommended - best overall value",
        1 => "Good alternative option",
        _ => "Acceptable fallback choice",
    }
}

// ==========================================
// DeliverySampler - seedable delivery score source
// ==========================================
// The delivery score is drawn uniformly from [85, 95): unpredictable
// in production, reproducible under a fixed seed in tests.
pub struct DeliverySampler {
    rng: StdRng,
}

impl DeliverySampler {
    /// Production sampler: OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sampler for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw from [85, 95).
    pub fn sample(&mut self) -> f64 {
        85.0 + self.rng.gen::<f64>() * 10.0
    }
}

impl Default for DeliverySampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ==========================================
// Unit tests
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tender::Specifications;
    use chrono::NaiveDate;

    fn tender(chemical_name: &str, delivery_location: &str) -> Tender {
        Tender::draft(
            "company-1",
            "Test tender",
            chemical_name,
            100.0,
            "tons",
            delivery_location,
            NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            "open",
            Specifications::new(),
        )
    }

    fn vendor(
        specializations: &[&str],
        certifications: &[&str],
        rating: f64,
        location: &str,
    ) -> Vendor {
        Vendor::new(
            "Test Vendor",
            specializations.iter().map(|s| s.to_string()).collect(),
            certifications.iter().map(|s| s.to_string()).collect(),
            rating,
            location,
        )
    }

    #[test]
    fn perfect_vendor_clamps_to_100() {
        let t = tender("Sulfuric Acid", "Mumbai, Maharashtra");
        let v = vendor(
            &["Sulfuric Acid Products"],
            &["ISO9001", "ISO14001"],
            4.8,
            "Mumbai",
        );
        // 40 + 20 + 38.4 + 20 = 118.4 → clamp
        assert_eq!(fit_score(&t, &v), 100);

        let reasoning = shortlist_reasoning(&t, &v, 100);
        assert_eq!(reasoning.matches(". ").count(), 3); // four clauses
        assert!(reasoning.contains("Specializes in Sulfuric Acid"));
        assert!(reasoning.contains("Holds 2 relevant certifications"));
        assert!(reasoning.contains("High vendor rating of 4.8/5.0"));
        assert!(reasoning.contains("Located near delivery location"));
        assert!(reasoning.ends_with('.'));
    }

    #[test]
    fn no_match_vendor_scores_zero() {
        let t = tender("Sulfuric Acid", "Mumbai, Maharashtra");
        let v = vendor(&["Polymer Resins"], &["ISO9001"], 0.0, "Chennai");
        assert_eq!(fit_score(&t, &v), 0);
        assert_eq!(shortlist_reasoning(&t, &v, 0), ".");
    }

    #[test]
    fn rating_contributes_eight_per_point() {
        let t = tender("Sulfuric Acid", "Mumbai, Maharashtra");
        let v = vendor(&["Polymer Resins"], &[], 3.0, "Chennai");
        assert_eq!(fit_score(&t, &v), 24);
    }

    #[test]
    fn fractional_rating_rounds() {
        let t = tender("Sulfuric Acid", "Mumbai, Maharashtra");
        // 4.3 × 8 = 34.4 → 34
        let v = vendor(&[], &[], 4.3, "Chennai");
        assert_eq!(fit_score(&t, &v), 34);
    }

    #[test]
    fn specialization_matches_on_first_word_only() {
        let t = tender("Sulfuric Acid", "Delhi");
        // First word "sulfuric" is a substring of the chemical name
        let hit = vendor(&["Sulfuric Compounds Wholesale"], &[], 0.0, "Chennai");
        assert_eq!(fit_score(&t, &hit), 40);
        // First word "industrial" is not
        let miss = vendor(&["Industrial Sulfuric Acid"], &[], 0.0, "Chennai");
        assert_eq!(fit_score(&t, &miss), 0);
    }

    #[test]
    fn location_matches_first_comma_segment() {
        let t = tender("Caustic Soda", "Pune, Maharashtra");
        let near = vendor(&[], &[], 0.0, "Pune Industrial Estate");
        assert_eq!(fit_score(&t, &near), 20);
        let far = vendor(&[], &[], 0.0, "Maharashtra"); // state only, no "pune"
        assert_eq!(fit_score(&t, &far), 0);
    }

    #[test]
    fn single_certification_earns_nothing() {
        let t = tender("Caustic Soda", "Pune, Maharashtra");
        let v = vendor(&[], &["ISO9001"], 0.0, "Delhi");
        assert_eq!(fit_score(&t, &v), 0);
        let v2 = vendor(&[], &["ISO9001", "ISO14001", "GMP"], 0.0, "Delhi");
        assert_eq!(fit_score(&t, &v2), 20);
        assert!(shortlist_reasoning(&t, &v2, 20).contains("Holds 3 relevant certifications"));
    }

    #[test]
    fn rating_clause_only_from_4_5_up() {
        let t = tender("Caustic Soda", "Pune, Maharashtra");
        let v = vendor(&[], &[], 4.4, "Delhi");
        assert!(!shortlist_reasoning(&t, &v, 35).contains("High vendor rating"));
        let v2 = vendor(&[], &[], 4.5, "Delhi");
        assert!(shortlist_reasoning(&t, &v2, 36).contains("High vendor rating of 4.5/5.0"));
    }

    #[test]
    fn evaluation_price_scores_by_rank() {
        for (rank, expected) in [(0usize, 100), (1, 85), (2, 70)] {
            let scores = evaluation_scores(rank, 5.0, 90.0);
            assert_eq!(scores.price_score, expected);
        }
    }

    #[test]
    fn evaluation_price_score_goes_negative_past_rank_six() {
        assert_eq!(evaluation_scores(7, 5.0, 90.0).price_score, -5);
        assert_eq!(evaluation_scores(10, 5.0, 90.0).price_score, -50);
    }

    #[test]
    fn overall_score_blends_unrounded_inputs() {
        // price 100, quality 96 (4.8/5), delivery pinned at 90
        // 0.5×100 + 0.3×96 + 0.2×90 = 96.8 → 97
        let scores = evaluation_scores(0, 4.8, 90.0);
        assert_eq!(scores.quality_score, 96);
        assert_eq!(scores.delivery_score, 90);
        assert_eq!(scores.overall_score, 97);
    }

    #[test]
    fn recommendation_by_rank() {
        assert_eq!(
            recommendation_for_rank(0),
            "Highly recommended - best overall value"
        );
        assert_eq!(recommendation_for_rank(1), "Good alternative option");
        assert_eq!(recommendation_for_rank(2), "Acceptable fallback choice");
        assert_eq!(recommendation_for_rank(9), "Acceptable fallback choice");
    }

    #[test]
    fn delivery_sampler_stays_in_range() {
        let mut sampler = DeliverySampler::seeded(7);
        for _ in 0..1000 {
            let v = sampler.sample();
            assert!((85.0..95.0).contains(&v));
        }
    }

    #[test]
    fn delivery_sampler_is_reproducible_under_seed() {
        let mut a = DeliverySampler::seeded(42);
        let mut b = DeliverySampler::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }
}
