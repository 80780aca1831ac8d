use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidate::PriceTier;

/// Value of [`LeadRecord::source`] for leads discovered through the listing API.
pub const LEAD_SOURCE: &str = "Google Maps";

/// Sales-lead classification. A "strong" lead is a business whose online
/// presence has the most room for improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStrength {
    Strong,
    Medium,
    Weak,
}

impl LeadStrength {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStrength::Strong => "strong",
            LeadStrength::Medium => "medium",
            LeadStrength::Weak => "weak",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "strong" => Some(LeadStrength::Strong),
            "medium" => Some(LeadStrength::Medium),
            "weak" => Some(LeadStrength::Weak),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Completed,
    Analyzing,
    Failed,
}

impl LeadStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::Completed => "completed",
            LeadStatus::Analyzing => "analyzing",
            LeadStatus::Failed => "failed",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "completed" => Some(LeadStatus::Completed),
            "analyzing" => Some(LeadStatus::Analyzing),
            "failed" => Some(LeadStatus::Failed),
            _ => None,
        }
    }
}

/// A qualifying listing merged with its enrichment results.
///
/// Built once per candidate and never mutated afterwards. Stores upsert it
/// keyed by [`LeadRecord::external_id`]; the latest write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: Uuid,
    /// The bulk search that produced this lead.
    pub run_id: Uuid,
    pub external_id: String,
    pub company_name: String,
    /// Real website, or `no-website-<external_id>` when the listing has none.
    pub website: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: String,
    pub source: String,

    pub rating: Option<f64>,
    pub review_count: u32,
    pub photo_count: u32,
    pub price_tier: Option<PriceTier>,

    pub ui_score: Option<u8>,
    pub seo_score: Option<u8>,
    pub tech_score: Option<u8>,
    pub performance_score: Option<u8>,
    pub security_score: Option<u8>,
    pub total_score: Option<u8>,
    /// Composite speed score: the measured performance score, or an estimate
    /// derived from `total_score` when no measurement exists.
    pub speed_score: Option<u8>,
    pub loading_time: Option<String>,

    pub lead_strength: LeadStrength,
    pub status: LeadStatus,
    /// Deduplicated, first-seen order, at most ten entries.
    pub issues: Vec<String>,
    pub tech_stack: Vec<String>,
    pub executive_summary: Option<String>,
    pub recommendations: Vec<String>,
    pub pitch_subject: Option<String>,
    pub pitch_body: Option<String>,

    pub last_checked: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
