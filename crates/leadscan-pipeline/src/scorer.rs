//! Listing-only heuristic score.
//!
//! The scale is inverted: a lower score means a weaker online presence,
//! which makes the business a better sales lead.

use leadscan_core::{Candidate, LeadStrength};

const LOW_RATING_PENALTY: i32 = 20;
const FEW_PHOTOS_PENALTY: i32 = 15;
const NO_WEBSITE_PENALTY: i32 = 30;
const FEW_REVIEWS_PENALTY: i32 = 10;

/// Scores a candidate from listing data alone, in `0..=100`.
#[must_use]
pub fn initial_score(candidate: &Candidate) -> u8 {
    let mut score: i32 = 100;
    if candidate.rating.is_some_and(|r| r < 4.0) {
        score -= LOW_RATING_PENALTY;
    }
    if candidate.photo_count < 10 {
        score -= FEW_PHOTOS_PENALTY;
    }
    if !candidate.has_website() {
        score -= NO_WEBSITE_PENALTY;
    }
    if candidate.review_count < 20 {
        score -= FEW_REVIEWS_PENALTY;
    }
    u8::try_from(score.clamp(0, 100)).unwrap_or(0)
}

/// Strong requires both a low score and a website to pitch improvements for.
#[must_use]
pub fn lead_strength(score: u8, has_website: bool) -> LeadStrength {
    if score < 50 && has_website {
        LeadStrength::Strong
    } else if score < 70 {
        LeadStrength::Medium
    } else {
        LeadStrength::Weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_clear() -> Candidate {
        Candidate {
            external_id: "p1".to_string(),
            name: "Tip Top".to_string(),
            address: None,
            phone: None,
            website: Some("https://tiptop.example".to_string()),
            rating: Some(4.5),
            review_count: 120,
            photo_count: 40,
            price_tier: None,
            business_status: None,
            category: None,
        }
    }

    #[test]
    fn all_clear_baseline_is_100() {
        assert_eq!(initial_score(&all_clear()), 100);
    }

    #[test]
    fn each_condition_deducts_its_penalty() {
        let low_rating = Candidate {
            rating: Some(3.9),
            ..all_clear()
        };
        let few_photos = Candidate {
            photo_count: 9,
            ..all_clear()
        };
        let no_website = Candidate {
            website: None,
            ..all_clear()
        };
        let few_reviews = Candidate {
            review_count: 19,
            ..all_clear()
        };
        assert_eq!(initial_score(&low_rating), 80);
        assert_eq!(initial_score(&few_photos), 85);
        assert_eq!(initial_score(&no_website), 70);
        assert_eq!(initial_score(&few_reviews), 90);
    }

    #[test]
    fn unrated_listing_is_not_penalized_for_rating() {
        let c = Candidate {
            rating: None,
            ..all_clear()
        };
        assert_eq!(initial_score(&c), 100);
    }

    #[test]
    fn all_penalties_stay_in_range() {
        let c = Candidate {
            rating: Some(1.0),
            photo_count: 0,
            website: None,
            review_count: 0,
            ..all_clear()
        };
        assert_eq!(initial_score(&c), 25);
    }

    #[test]
    fn strength_thresholds() {
        assert_eq!(lead_strength(49, true), LeadStrength::Strong);
        assert_eq!(lead_strength(49, false), LeadStrength::Medium);
        assert_eq!(lead_strength(50, true), LeadStrength::Medium);
        assert_eq!(lead_strength(69, true), LeadStrength::Medium);
        assert_eq!(lead_strength(70, true), LeadStrength::Weak);
        assert_eq!(lead_strength(70, false), LeadStrength::Weak);
    }
}
