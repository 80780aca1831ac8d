use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request was rejected before any listing page was fetched.
    #[error("invalid bulk search request: {0}")]
    InvalidRequest(String),
}
