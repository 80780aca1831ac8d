//! "Sniper Mode" filter configuration.
//!
//! Every threshold has an "any" state (`None`, or [`WebsiteRequirement::Any`])
//! that disables the corresponding check entirely.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::candidate::PriceTier;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WebsiteRequirement {
    #[default]
    Any,
    /// Only listings that publish a website (`has-website`).
    #[serde(alias = "has-website")]
    Required,
    /// Only listings without a website (`no-website`).
    #[serde(alias = "no-website")]
    Excluded,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Reject listings rated strictly above this value.
    pub max_rating: Option<f64>,
    /// Reject listings with fewer reviews. `None` or `0` disables the check.
    pub min_reviews: Option<u32>,
    /// Allowed price tiers. `None` or an empty set means any tier.
    pub price_tiers: Option<BTreeSet<PriceTier>>,
    pub must_have_phone: bool,
    /// Reject listings with strictly more photos than this.
    pub max_photos: Option<u32>,
    pub website: WebsiteRequirement,
}

impl FilterCriteria {
    /// Criteria that accept every listing.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// The restricting tier set, or `None` when every tier is allowed.
    ///
    /// An empty set is the "any" wildcard, the same as `None`; it is never
    /// read as "no tier allowed".
    #[must_use]
    pub fn allowed_price_tiers(&self) -> Option<&BTreeSet<PriceTier>> {
        self.price_tiers.as_ref().filter(|tiers| !tiers.is_empty())
    }
}
