//! Enrichment probes for qualifying listings.
//!
//! Three independent probes run per candidate:
//!
//! - [`PageSpeedClient`]: page-speed score and loading time.
//! - [`SecurityScanner`]: HTTP security-header audit.
//! - [`AiProbe`]: generative-text lead assessment with a deterministic
//!   fallback.
//!
//! No probe ever returns an error to the caller. Failures degrade to an
//! absent result (performance), a null-score result (security), or the
//! fallback analysis (AI).

pub mod ai;
pub mod enricher;
pub mod error;
pub mod performance;
pub mod security;
pub mod types;

mod retry;
mod website;

pub use ai::{fallback_analysis, parse_ai_response, sanitize_ai_json, AiProbe, GeminiClient};
pub use enricher::{EnrichOptions, Enricher};
pub use error::EnrichError;
pub use performance::PageSpeedClient;
pub use security::{evaluate_security_headers, SecurityScanner};
pub use types::{
    AiAnalysis, AiScores, EnrichmentResult, LeadQuality, OutreachPitch, PerformanceProbe,
    SecurityProbe,
};
