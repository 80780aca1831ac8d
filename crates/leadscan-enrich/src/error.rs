use thiserror::Error;

/// Failures inside a probe. These are logged and converted into a degraded
/// probe result; they never leave this crate through a probe entry point.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {service}")]
    UnexpectedStatus { status: u16, service: &'static str },

    #[error("rate limited by {service}")]
    RateLimited { service: &'static str },

    #[error("generative-text response contained no text")]
    EmptyCompletion,

    #[error("generative-text response failed validation: {0}")]
    InvalidResponse(String),

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
