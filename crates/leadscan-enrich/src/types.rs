use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceProbe {
    /// Page-speed performance category score, `0..=100`.
    pub score: u8,
    /// Human-readable loading time, e.g. `"3.4 s"`.
    pub loading_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityProbe {
    /// `None` when the website could not be fetched.
    pub score: Option<u8>,
    /// Findings, most severe first. Never empty.
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadQuality {
    High,
    Medium,
    Low,
}

impl LeadQuality {
    /// Case-insensitive parse of `"High"`, `"Medium"`, or `"Low"`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(LeadQuality::High),
            "medium" => Some(LeadQuality::Medium),
            "low" => Some(LeadQuality::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiScores {
    pub ui: u8,
    pub seo: u8,
    pub tech: u8,
    pub total: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachPitch {
    pub subject: String,
    pub body: String,
}

/// Structured lead assessment, either parsed from the model response or
/// produced by [`crate::fallback_analysis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub lead_quality: LeadQuality,
    pub tech_stack: Vec<String>,
    pub scores: AiScores,
    pub executive_summary: String,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub pitch: OutreachPitch,
    /// `true` when this analysis came from the deterministic fallback.
    pub from_fallback: bool,
}

/// Output of all probes for one candidate. Each part is independently
/// optional; an absent part means the probe was skipped or failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentResult {
    pub performance: Option<PerformanceProbe>,
    pub security: Option<SecurityProbe>,
    pub ai: Option<AiAnalysis>,
}
