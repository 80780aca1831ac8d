//! HTTP client for the business-search API.

use std::time::Duration;

use leadscan_core::{AppConfig, Candidate};
use reqwest::{Client, Url};

use crate::error::ListingError;
use crate::normalize::normalize_business;
use crate::types::BusinessSearchResponse;

/// Fixed request parameters for the listing API.
#[derive(Debug, Clone)]
pub struct ListingSettings {
    pub api_key: String,
    pub api_host: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
    pub language: String,
    pub region: String,
    pub user_agent: String,
}

impl ListingSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.rapidapi_key.clone(),
            api_host: config.rapidapi_host.clone(),
            base_url: config.listing_base_url.clone(),
            timeout_secs: config.listing_timeout_secs,
            page_size: config.listing_page_size,
            language: config.listing_language.clone(),
            region: config.listing_region.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// One page of normalized listings plus the token for the next page.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub candidates: Vec<Candidate>,
    /// Entries the API returned, including ones dropped during
    /// normalization. Zero means the source is exhausted.
    pub raw_count: usize,
    /// `None` when the source has no further pages.
    pub next_token: Option<String>,
}

impl ListingPage {
    /// An empty page with no continuation, i.e. natural exhaustion.
    #[must_use]
    pub fn exhausted() -> Self {
        Self::default()
    }
}

/// Client for the paginated `GET /search` endpoint.
///
/// Each page is requested exactly once. A request timeout is reported as an
/// exhausted page; every other failure is returned to the caller.
pub struct ListingClient {
    client: Client,
    search_url: Url,
    api_key: String,
    api_host: String,
    page_size: u32,
    language: String,
    region: String,
}

impl ListingClient {
    /// Builds a client from fixed listing settings.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ListingError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(settings: &ListingSettings) -> Result<Self, ListingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&settings.user_agent)
            .build()?;

        let normalised = format!("{}/", settings.base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join("search"))
            .map_err(|e| ListingError::InvalidBaseUrl {
                base_url: settings.base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            search_url,
            api_key: settings.api_key.clone(),
            api_host: settings.api_host.clone(),
            page_size: settings.page_size,
            language: settings.language.clone(),
            region: settings.region.clone(),
        })
    }

    /// Fetches one page of listings for `query`.
    ///
    /// `page_token` is the `next_token` of the previous page, or `None` for
    /// the first page. Entries without a place identifier are dropped but
    /// still counted in [`ListingPage::raw_count`].
    ///
    /// # Errors
    ///
    /// - [`ListingError::UnexpectedStatus`] on any non-2xx response.
    /// - [`ListingError::Http`] on connection or body-read failure (timeouts
    ///   excluded, see above).
    /// - [`ListingError::Deserialize`] if the body is not the expected shape.
    pub async fn fetch_page(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<ListingPage, ListingError> {
        match self.request_page(query, page_token).await {
            Err(ListingError::Http(e)) if e.is_timeout() => {
                tracing::warn!(
                    query,
                    error = %e,
                    "listing request timed out; treating as end of results"
                );
                Ok(ListingPage::exhausted())
            }
            other => other,
        }
    }

    async fn request_page(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<ListingPage, ListingError> {
        let page_size = self.page_size.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("query", query),
            ("limit", page_size.as_str()),
            ("language", self.language.as_str()),
            ("region", self.region.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("next_page_token", token));
        }

        let response = self
            .client
            .get(self.search_url.clone())
            .query(&params)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.search_url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<BusinessSearchResponse>(&body).map_err(|e| {
            ListingError::Deserialize {
                context: format!("search page for \"{query}\""),
                source: e,
            }
        })?;

        let raw_count = parsed.data.len();
        let candidates: Vec<Candidate> = parsed.data.iter().filter_map(normalize_business).collect();
        if candidates.len() < raw_count {
            tracing::debug!(
                dropped = raw_count - candidates.len(),
                "listing entries without a place id were dropped"
            );
        }

        let next_token = parsed
            .next_page_token
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty());

        Ok(ListingPage {
            candidates,
            raw_count,
            next_token,
        })
    }
}
