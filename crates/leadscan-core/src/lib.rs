//! Shared domain types and configuration for the lead-discovery workspace.

pub mod app_config;
pub mod candidate;
pub mod config;
pub mod filters;
pub mod lead;
pub mod store;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use candidate::{Candidate, PriceTier};
pub use config::{load_app_config, load_app_config_from_env};
pub use filters::{FilterCriteria, WebsiteRequirement};
pub use lead::{LeadRecord, LeadStatus, LeadStrength, LEAD_SOURCE};
pub use store::{LeadStore, StoreError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
