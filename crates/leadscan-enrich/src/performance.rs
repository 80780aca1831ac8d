//! Page-speed performance probe.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::EnrichError;
use crate::types::PerformanceProbe;
use crate::website::parse_website;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageSpeedResponse {
    lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    #[serde(default)]
    categories: Categories,
    #[serde(default)]
    audits: HashMap<String, Audit>,
}

#[derive(Debug, Default, Deserialize)]
struct Categories {
    performance: Option<Category>,
}

#[derive(Debug, Deserialize)]
struct Category {
    /// Lighthouse reports `0.0..=1.0`, or `null` when the run errored.
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Audit {
    display_value: Option<String>,
}

/// Client for the page-speed analysis API (`runPagespeed`).
pub struct PageSpeedClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PageSpeedClient {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`EnrichError::InvalidUrl`] if `endpoint` does not parse.
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, EnrichError> {
        Url::parse(endpoint).map_err(|e| EnrichError::InvalidUrl {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Measures `website` on the mobile strategy.
    ///
    /// Returns `None` on timeout, transport error, non-2xx status, or a
    /// response without a performance score. Absent means "not measured",
    /// which callers must keep distinct from a low score.
    pub async fn analyze(&self, website: &str) -> Option<PerformanceProbe> {
        let url = parse_website(website)?;
        match self.fetch(&url).await {
            Ok(probe) => probe,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "page-speed probe failed");
                None
            }
        }
    }

    async fn fetch(&self, target: &Url) -> Result<Option<PerformanceProbe>, EnrichError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("url", target.as_str()),
            ("strategy", "mobile"),
            ("category", "performance"),
        ];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("key", key));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichError::RateLimited {
                service: "pagespeed",
            });
        }
        if !status.is_success() {
            return Err(EnrichError::UnexpectedStatus {
                status: status.as_u16(),
                service: "pagespeed",
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<PageSpeedResponse>(&body).map_err(|e| {
            EnrichError::Deserialize {
                context: format!("page-speed result for {target}"),
                source: e,
            }
        })?;

        Ok(parsed.lighthouse_result.and_then(to_probe))
    }
}

fn to_probe(result: LighthouseResult) -> Option<PerformanceProbe> {
    let raw = result.categories.performance?.score?;
    if !raw.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = (raw.clamp(0.0, 1.0) * 100.0).round() as u8;

    let loading_time = ["speed-index", "interactive"]
        .iter()
        .filter_map(|key| result.audits.get(*key))
        .filter_map(|a| a.display_value.as_deref())
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map_or_else(|| "N/A".to_string(), str::to_owned);

    Some(PerformanceProbe {
        score,
        loading_time,
    })
}
