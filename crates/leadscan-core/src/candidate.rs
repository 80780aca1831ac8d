//! Listing entries as returned by the business-search API, after
//! normalization.

use serde::{Deserialize, Serialize};

/// Price band reported by the listing source (`$` through `$$$$`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PriceTier {
    One,
    Two,
    Three,
    Four,
}

impl PriceTier {
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            PriceTier::One => 1,
            PriceTier::Two => 2,
            PriceTier::Three => 3,
            PriceTier::Four => 4,
        }
    }

    /// Parses either a numeric level (`"2"`) or a dollar-sign band (`"$$"`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c == '$' || c == '€') {
            let count = u8::try_from(trimmed.chars().count()).ok()?;
            return Self::try_from(count).ok();
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(|n| Self::try_from(n).ok())
    }
}

impl TryFrom<u8> for PriceTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PriceTier::One),
            2 => Ok(PriceTier::Two),
            3 => Ok(PriceTier::Three),
            4 => Ok(PriceTier::Four),
            other => Err(format!("price tier must be 1-4, got {other}")),
        }
    }
}

impl From<PriceTier> for u8 {
    fn from(tier: PriceTier) -> Self {
        tier.level()
    }
}

/// A single business returned by the listing source. Never mutated after
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Listing-provider place identifier; the upsert key for stored leads.
    pub external_id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Average star rating in `[0.0, 5.0]`, absent when unrated.
    pub rating: Option<f64>,
    pub review_count: u32,
    pub photo_count: u32,
    pub price_tier: Option<PriceTier>,
    /// Raw operating-status tag, e.g. `"OPEN"` or `"CLOSED_PERMANENTLY"`.
    pub business_status: Option<String>,
    /// Listing category, e.g. `"Cafe"`. Only used for prompt context.
    pub category: Option<String>,
}

impl Candidate {
    #[must_use]
    pub fn has_website(&self) -> bool {
        self.website.as_deref().is_some_and(|w| !w.trim().is_empty())
    }

    #[must_use]
    pub fn has_phone(&self) -> bool {
        self.phone.as_deref().is_some_and(|p| !p.trim().is_empty())
    }

    /// `Some(false)` only when a status tag is present and is not an open
    /// state. Missing status is treated as unknown, not closed.
    #[must_use]
    pub fn is_operational(&self) -> Option<bool> {
        self.business_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let upper = s.to_ascii_uppercase();
                upper == "OPEN" || upper == "OPERATIONAL"
            })
    }
}
