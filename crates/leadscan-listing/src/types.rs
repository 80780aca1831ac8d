//! Response types for the business-search `GET /search` endpoint.
//!
//! ## Observed shape
//!
//! - `data` is an array of businesses; it is absent (not `[]`) on some
//!   empty responses, so it defaults to empty.
//! - The place identifier is spread over `google_id`, `place_id`, and
//!   `business_id`; any of them may be missing.
//! - `price_level` arrives either as a dollar band (`"$$"`) or a number.
//! - `photo_count` is often missing; `photos_sample` is then the only hint.
//! - `next_page_token` is `null`, absent, or an empty string on the last page.

use serde::Deserialize;

/// Top-level response from `GET /search`.
#[derive(Debug, Deserialize)]
pub struct BusinessSearchResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Vec<RawBusiness>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One business entry as returned by the API, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBusiness {
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub business_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u64>,
    #[serde(default)]
    pub photo_count: Option<u64>,
    #[serde(default)]
    pub photos_sample: Vec<serde_json::Value>,

    /// `"$$"` or `2`; kept untyped and parsed during normalization.
    #[serde(default)]
    pub price_level: Option<serde_json::Value>,
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(default, rename = "type")]
    pub category: Option<String>,
}
