//! Runs the three probes for one candidate.

use leadscan_core::{AppConfig, Candidate};

use crate::ai::{AiProbe, GeminiClient};
use crate::error::EnrichError;
use crate::performance::PageSpeedClient;
use crate::security::SecurityScanner;
use crate::types::EnrichmentResult;

/// Per-probe switches. All probes are enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    pub performance: bool,
    pub security: bool,
    pub ai: bool,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            performance: true,
            security: true,
            ai: true,
        }
    }
}

pub struct Enricher {
    performance: PageSpeedClient,
    security: SecurityScanner,
    ai: AiProbe,
    options: EnrichOptions,
}

impl Enricher {
    #[must_use]
    pub fn new(
        performance: PageSpeedClient,
        security: SecurityScanner,
        ai: AiProbe,
        options: EnrichOptions,
    ) -> Self {
        Self {
            performance,
            security,
            ai,
            options,
        }
    }

    /// Builds all three probe clients from application config.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError`] if any HTTP client cannot be constructed or a
    /// configured endpoint is not a valid URL.
    pub fn from_app_config(config: &AppConfig, options: EnrichOptions) -> Result<Self, EnrichError> {
        let performance = PageSpeedClient::new(
            &config.pagespeed_endpoint,
            config.pagespeed_api_key.clone(),
            config.pagespeed_timeout_secs,
            &config.user_agent,
        )?;
        let security = SecurityScanner::new(config.security_timeout_secs, &config.user_agent)?;
        let gemini = GeminiClient::new(
            &config.gemini_api_key,
            &config.gemini_model,
            &config.gemini_base_url,
            config.gemini_timeout_secs,
            config.gemini_max_retries,
            &config.user_agent,
        )?;
        Ok(Self::new(performance, security, AiProbe::new(gemini), options))
    }

    #[must_use]
    pub fn options(&self) -> EnrichOptions {
        self.options
    }

    /// Runs the enabled probes for `candidate`.
    ///
    /// Performance and security run concurrently; the AI probe runs after
    /// both so their results can be embedded in its prompt. Website probes
    /// are skipped for a candidate without a website.
    pub async fn enrich(&self, candidate: &Candidate) -> EnrichmentResult {
        let website = candidate.website.as_deref().filter(|_| candidate.has_website());

        let performance_fut = async {
            match website {
                Some(site) if self.options.performance => self.performance.analyze(site).await,
                _ => None,
            }
        };
        let security_fut = async {
            match website {
                Some(site) if self.options.security => Some(self.security.scan(site).await),
                _ => None,
            }
        };
        let (performance, security) = tokio::join!(performance_fut, security_fut);

        let ai = if self.options.ai {
            Some(
                self.ai
                    .analyze(candidate, performance.as_ref(), security.as_ref())
                    .await,
            )
        } else {
            None
        };

        tracing::debug!(
            external_id = %candidate.external_id,
            performance = performance.as_ref().map(|p| p.score),
            security = security.as_ref().and_then(|s| s.score),
            ai_fallback = ai.as_ref().map(|a| a.from_fallback),
            "enrichment finished"
        );

        EnrichmentResult {
            performance,
            security,
            ai,
        }
    }
}
