//! "Sniper Mode" candidate filter.

use std::fmt;

use leadscan_core::{Candidate, FilterCriteria, WebsiteRequirement};

/// The individual checks, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCheck {
    RatingCeiling,
    ReviewFloor,
    PriceTier,
    PhoneRequired,
    PhotoCeiling,
    Website,
    Operational,
}

impl fmt::Display for FilterCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterCheck::RatingCeiling => "rating_ceiling",
            FilterCheck::ReviewFloor => "review_floor",
            FilterCheck::PriceTier => "price_tier",
            FilterCheck::PhoneRequired => "phone_required",
            FilterCheck::PhotoCeiling => "photo_ceiling",
            FilterCheck::Website => "website",
            FilterCheck::Operational => "operational",
        };
        f.write_str(name)
    }
}

/// Returns `true` when `candidate` satisfies every active check in
/// `criteria`. Rejections are logged at debug level with the failing check.
#[must_use]
pub fn passes(candidate: &Candidate, criteria: &FilterCriteria) -> bool {
    match first_failure(candidate, criteria) {
        None => true,
        Some(check) => {
            tracing::debug!(
                external_id = %candidate.external_id,
                name = %candidate.name,
                check = %check,
                "candidate rejected by filter"
            );
            false
        }
    }
}

/// The first check `candidate` fails, or `None` if it passes.
///
/// A field missing on the candidate never fails its check, except for the
/// explicit phone and website requirements.
#[must_use]
pub fn first_failure(candidate: &Candidate, criteria: &FilterCriteria) -> Option<FilterCheck> {
    if let (Some(ceiling), Some(rating)) = (criteria.max_rating, candidate.rating) {
        if rating > ceiling {
            return Some(FilterCheck::RatingCeiling);
        }
    }

    if let Some(floor) = criteria.min_reviews.filter(|f| *f > 0) {
        if candidate.review_count < floor {
            return Some(FilterCheck::ReviewFloor);
        }
    }

    if let (Some(allowed), Some(tier)) = (criteria.allowed_price_tiers(), candidate.price_tier) {
        if !allowed.contains(&tier) {
            return Some(FilterCheck::PriceTier);
        }
    }

    if criteria.must_have_phone && !candidate.has_phone() {
        return Some(FilterCheck::PhoneRequired);
    }

    if let Some(ceiling) = criteria.max_photos {
        if candidate.photo_count > ceiling {
            return Some(FilterCheck::PhotoCeiling);
        }
    }

    match criteria.website {
        WebsiteRequirement::Required if !candidate.has_website() => {
            return Some(FilterCheck::Website);
        }
        WebsiteRequirement::Excluded if candidate.has_website() => {
            return Some(FilterCheck::Website);
        }
        _ => {}
    }

    if candidate.is_operational() == Some(false) {
        return Some(FilterCheck::Operational);
    }

    None
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use leadscan_core::PriceTier;

    use super::*;

    fn bare() -> Candidate {
        Candidate {
            external_id: "p1".to_string(),
            name: "Kiosk".to_string(),
            address: None,
            phone: None,
            website: None,
            rating: None,
            review_count: 0,
            photo_count: 0,
            price_tier: None,
            business_status: None,
            category: None,
        }
    }

    fn populated() -> Candidate {
        Candidate {
            phone: Some("+41 44 000 00 00".to_string()),
            website: Some("https://kiosk.example".to_string()),
            rating: Some(4.2),
            review_count: 35,
            photo_count: 12,
            price_tier: Some(PriceTier::Two),
            business_status: Some("OPEN".to_string()),
            ..bare()
        }
    }

    #[test]
    fn wildcard_criteria_accept_bare_candidate() {
        assert!(passes(&bare(), &FilterCriteria::any()));
        assert!(passes(&populated(), &FilterCriteria::any()));
    }

    #[test]
    fn rating_ceiling_is_strictly_greater() {
        let criteria = FilterCriteria {
            max_rating: Some(4.2),
            ..FilterCriteria::any()
        };
        assert!(passes(&populated(), &criteria));
        let criteria = FilterCriteria {
            max_rating: Some(4.1),
            ..FilterCriteria::any()
        };
        assert_eq!(
            first_failure(&populated(), &criteria),
            Some(FilterCheck::RatingCeiling)
        );
        // Unrated listings are never rejected by the rating check.
        assert!(passes(&bare(), &criteria));
    }

    #[test]
    fn review_floor_rejects_fewer_and_zero_disables() {
        let criteria = FilterCriteria {
            min_reviews: Some(35),
            ..FilterCriteria::any()
        };
        assert!(passes(&populated(), &criteria));
        let criteria = FilterCriteria {
            min_reviews: Some(36),
            ..FilterCriteria::any()
        };
        assert_eq!(
            first_failure(&populated(), &criteria),
            Some(FilterCheck::ReviewFloor)
        );
        let criteria = FilterCriteria {
            min_reviews: Some(0),
            ..FilterCriteria::any()
        };
        assert!(passes(&bare(), &criteria));
    }

    #[test]
    fn price_tier_membership() {
        let criteria = FilterCriteria {
            price_tiers: Some(BTreeSet::from([PriceTier::One, PriceTier::Three])),
            ..FilterCriteria::any()
        };
        assert_eq!(
            first_failure(&populated(), &criteria),
            Some(FilterCheck::PriceTier)
        );
        assert!(passes(&bare(), &criteria), "missing tier never rejects");

        let empty = FilterCriteria {
            price_tiers: Some(BTreeSet::new()),
            ..FilterCriteria::any()
        };
        assert!(passes(&populated(), &empty));
    }

    #[test]
    fn phone_and_photo_checks() {
        let criteria = FilterCriteria {
            must_have_phone: true,
            ..FilterCriteria::any()
        };
        assert_eq!(
            first_failure(&bare(), &criteria),
            Some(FilterCheck::PhoneRequired)
        );
        assert!(passes(&populated(), &criteria));

        let criteria = FilterCriteria {
            max_photos: Some(12),
            ..FilterCriteria::any()
        };
        assert!(passes(&populated(), &criteria));
        let criteria = FilterCriteria {
            max_photos: Some(11),
            ..FilterCriteria::any()
        };
        assert_eq!(
            first_failure(&populated(), &criteria),
            Some(FilterCheck::PhotoCeiling)
        );
    }

    #[test]
    fn website_requirement() {
        let required = FilterCriteria {
            website: WebsiteRequirement::Required,
            ..FilterCriteria::any()
        };
        let excluded = FilterCriteria {
            website: WebsiteRequirement::Excluded,
            ..FilterCriteria::any()
        };
        assert!(passes(&populated(), &required));
        assert!(!passes(&bare(), &required));
        assert!(passes(&bare(), &excluded));
        assert!(!passes(&populated(), &excluded));

        let blank = Candidate {
            website: Some("   ".to_string()),
            ..bare()
        };
        assert!(passes(&blank, &excluded));
    }

    #[test]
    fn operational_status_rejects_only_explicit_closure() {
        let closed = Candidate {
            business_status: Some("CLOSED_PERMANENTLY".to_string()),
            ..populated()
        };
        assert_eq!(
            first_failure(&closed, &FilterCriteria::any()),
            Some(FilterCheck::Operational)
        );
        let operational = Candidate {
            business_status: Some("operational".to_string()),
            ..populated()
        };
        assert!(passes(&operational, &FilterCriteria::any()));
        assert!(passes(&bare(), &FilterCriteria::any()));
    }

    #[test]
    fn checks_short_circuit_in_fixed_order() {
        let criteria = FilterCriteria {
            max_rating: Some(1.0),
            must_have_phone: true,
            website: WebsiteRequirement::Required,
            ..FilterCriteria::any()
        };
        let c = Candidate {
            rating: Some(4.9),
            ..bare()
        };
        assert_eq!(first_failure(&c, &criteria), Some(FilterCheck::RatingCeiling));
    }

    #[test]
    fn tightening_a_threshold_never_turns_fail_into_pass() {
        let candidates = [bare(), populated()];
        let loosened = FilterCriteria {
            max_rating: Some(5.0),
            min_reviews: Some(1),
            max_photos: Some(100),
            ..FilterCriteria::any()
        };
        let tightenings = [
            FilterCriteria {
                max_rating: Some(3.0),
                ..loosened.clone()
            },
            FilterCriteria {
                min_reviews: Some(500),
                ..loosened.clone()
            },
            FilterCriteria {
                max_photos: Some(0),
                ..loosened.clone()
            },
            FilterCriteria {
                must_have_phone: true,
                ..loosened.clone()
            },
        ];
        for c in &candidates {
            let before = passes(c, &loosened);
            for tight in &tightenings {
                if !before {
                    assert!(!passes(c, tight), "{tight:?} turned a fail into a pass");
                }
                if passes(c, tight) {
                    assert!(before);
                }
            }
        }
    }

    #[test]
    fn shrinking_a_non_empty_tier_set_never_turns_fail_into_pass() {
        let candidate = populated();
        let mut tiers = BTreeSet::from([
            PriceTier::One,
            PriceTier::Two,
            PriceTier::Three,
            PriceTier::Four,
        ]);
        let mut before = passes(
            &candidate,
            &FilterCriteria {
                price_tiers: Some(tiers.clone()),
                ..FilterCriteria::any()
            },
        );
        assert!(before, "all four tiers admit any tier");

        // Shrink one tier at a time down to a singleton; the empty set is
        // the wildcard and sits outside this ordering.
        while tiers.len() > 1 {
            let largest = *tiers.iter().next_back().unwrap();
            tiers.remove(&largest);
            let now = passes(
                &candidate,
                &FilterCriteria {
                    price_tiers: Some(tiers.clone()),
                    ..FilterCriteria::any()
                },
            );
            assert!(before || !now, "removing {largest:?} turned a fail into a pass");
            before = now;
        }
        assert!(!before, "populated candidate is not tier one");
    }
}
