#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, read once at startup.
///
/// Credentials are only ever handed to the clients built from this struct;
/// the `Debug` impl redacts them.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub user_agent: String,

    pub rapidapi_key: String,
    pub rapidapi_host: String,
    pub listing_base_url: String,
    pub listing_timeout_secs: u64,
    pub listing_page_size: u32,
    pub listing_language: String,
    pub listing_region: String,

    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_secs: u64,
    pub gemini_max_retries: u32,

    pub pagespeed_api_key: Option<String>,
    pub pagespeed_endpoint: String,
    pub pagespeed_timeout_secs: u64,

    pub security_timeout_secs: u64,

    /// Upper bound on listings scanned per bulk search, across all pages.
    pub max_scan_limit: usize,
    pub keepalive_secs: u64,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("database_url", &"[redacted]")
            .field("rapidapi_key", &"[redacted]")
            .field("rapidapi_host", &self.rapidapi_host)
            .field("listing_base_url", &self.listing_base_url)
            .field("listing_timeout_secs", &self.listing_timeout_secs)
            .field("listing_page_size", &self.listing_page_size)
            .field("listing_language", &self.listing_language)
            .field("listing_region", &self.listing_region)
            .field("gemini_api_key", &"[redacted]")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_timeout_secs", &self.gemini_timeout_secs)
            .field("gemini_max_retries", &self.gemini_max_retries)
            .field(
                "pagespeed_api_key",
                &self.pagespeed_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("pagespeed_endpoint", &self.pagespeed_endpoint)
            .field("pagespeed_timeout_secs", &self.pagespeed_timeout_secs)
            .field("security_timeout_secs", &self.security_timeout_secs)
            .field("max_scan_limit", &self.max_scan_limit)
            .field("keepalive_secs", &self.keepalive_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
