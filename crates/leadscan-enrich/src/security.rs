//! HTTP security-header audit.
//!
//! Scoring starts at 100 and subtracts a fixed penalty per finding:
//!
//! | Finding                                              | Penalty |
//! |------------------------------------------------------|---------|
//! | no `Strict-Transport-Security`                       | 20      |
//! | no `X-Frame-Options` and no CSP `frame-ancestors`    | 20      |
//! | no `X-Content-Type-Options`                          | 10      |
//! | `X-Content-Type-Options` other than `nosniff`        | 5       |
//! | `X-Powered-By` present                               | 10      |
//! | `Server` header discloses a version (contains digit) | 10      |
//! | no `Content-Security-Policy`                         | 10      |
//! | no `Referrer-Policy`                                 | 5       |
//! | no `Permissions-Policy` / `Feature-Policy`           | 5       |
//!
//! A non-HTTPS site scores 0 with a single critical finding and no other
//! checks.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Url};

use crate::error::EnrichError;
use crate::types::SecurityProbe;
use crate::website::parse_website;

pub(crate) const NO_HTTPS_ISSUE: &str =
    "CRITICAL: Website is not served over HTTPS; visitor data is transmitted unencrypted";
pub(crate) const EXCELLENT_ISSUE: &str = "Excellent security header configuration";

/// Scores the security headers of a response served from `url`.
#[must_use]
pub fn evaluate_security_headers(url: &Url, headers: &HeaderMap) -> SecurityProbe {
    if url.scheme() != "https" {
        return SecurityProbe {
            score: Some(0),
            issues: vec![NO_HTTPS_ISSUE.to_string()],
        };
    }

    let header = |name: &str| -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_owned())
    };

    let mut score: i32 = 100;
    let mut issues = Vec::new();
    let mut deduct = |points: i32, issue: &str| {
        score -= points;
        issues.push(issue.to_string());
    };

    if header("strict-transport-security").is_none() {
        deduct(
            20,
            "Missing HSTS header (Strict-Transport-Security); browsers may fall back to HTTP",
        );
    }

    let csp = header("content-security-policy");
    let csp_frame_ancestors = csp
        .as_deref()
        .is_some_and(|p| p.to_ascii_lowercase().contains("frame-ancestors"));
    if header("x-frame-options").is_none() && !csp_frame_ancestors {
        deduct(
            20,
            "No clickjacking protection (X-Frame-Options or CSP frame-ancestors)",
        );
    }

    match header("x-content-type-options") {
        None => deduct(10, "Missing X-Content-Type-Options header (MIME sniffing possible)"),
        Some(v) if !v.eq_ignore_ascii_case("nosniff") => deduct(
            5,
            "X-Content-Type-Options is set but not to 'nosniff'",
        ),
        Some(_) => {}
    }

    if let Some(powered_by) = header("x-powered-by") {
        deduct(
            10,
            &format!("X-Powered-By header discloses the technology stack ({powered_by})"),
        );
    }

    if let Some(server) = header("server") {
        if server.chars().any(|c| c.is_ascii_digit()) {
            deduct(
                10,
                &format!("Server header discloses a software version ({server})"),
            );
        }
    }

    if csp.is_none() {
        deduct(10, "Missing Content-Security-Policy header (XSS mitigation)");
    }

    if header("referrer-policy").is_none() {
        deduct(5, "Missing Referrer-Policy header");
    }

    if header("permissions-policy").is_none() && header("feature-policy").is_none() {
        deduct(5, "Missing Permissions-Policy header");
    }

    if issues.is_empty() {
        issues.push(EXCELLENT_ISSUE.to_string());
    }

    SecurityProbe {
        score: Some(u8::try_from(score.clamp(0, 100)).unwrap_or(0)),
        issues,
    }
}

/// Fetches a website once and audits its response headers.
pub struct SecurityScanner {
    client: Client,
}

impl SecurityScanner {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Audits `website`. Never fails: an unreachable site yields a result
    /// with a null score and one descriptive issue.
    pub async fn scan(&self, website: &str) -> SecurityProbe {
        let Some(url) = parse_website(website) else {
            return unreachable_probe(format!(
                "Security check skipped: '{website}' is not a valid website URL"
            ));
        };

        if url.scheme() != "https" {
            return evaluate_security_headers(&url, &HeaderMap::new());
        }

        match self.client.get(url.clone()).send().await {
            Ok(response) => evaluate_security_headers(&url, response.headers()),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "security header fetch failed");
                let reason = if e.is_timeout() {
                    "the request timed out"
                } else {
                    "the website could not be reached"
                };
                unreachable_probe(format!("Security check failed: {reason}"))
            }
        }
    }
}

fn unreachable_probe(issue: String) -> SecurityProbe {
    SecurityProbe {
        score: None,
        issues: vec![issue],
    }
}
