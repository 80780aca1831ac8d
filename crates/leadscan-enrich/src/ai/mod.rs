//! Generative-text lead assessment.

mod client;
mod fallback;
mod prompt;
mod response;
mod sanitize;

use leadscan_core::Candidate;

use crate::types::{AiAnalysis, PerformanceProbe, SecurityProbe};

pub use client::GeminiClient;
pub use fallback::fallback_analysis;
pub use response::parse_ai_response;
pub use sanitize::sanitize_ai_json;

/// AI probe: prompt, call, sanitize, validate. Any failure along the way
/// resolves to [`fallback_analysis`].
pub struct AiProbe {
    client: GeminiClient,
}

impl AiProbe {
    #[must_use]
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub async fn analyze(
        &self,
        candidate: &Candidate,
        performance: Option<&PerformanceProbe>,
        security: Option<&SecurityProbe>,
    ) -> AiAnalysis {
        let prompt = prompt::build_prompt(candidate, performance, security);

        let text = match self.client.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    external_id = %candidate.external_id,
                    error = %e,
                    "generative-text call failed; using fallback analysis"
                );
                return fallback_analysis(candidate);
            }
        };

        match parse_ai_response(&text) {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(
                    external_id = %candidate.external_id,
                    error = %e,
                    "generative-text response unusable; using fallback analysis"
                );
                fallback_analysis(candidate)
            }
        }
    }
}
