//! Integration tests for the page-speed, security and generative-text probes
//! against wiremock servers.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leadscan_core::Candidate;
use leadscan_enrich::{
    AiProbe, EnrichOptions, Enricher, GeminiClient, LeadQuality, PageSpeedClient, SecurityScanner,
};

const MODEL: &str = "gemini-test";
const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn candidate(website: Option<&str>, rating: Option<f64>) -> Candidate {
    Candidate {
        external_id: "place-1".to_string(),
        name: "Cafe Sonnenschein".to_string(),
        address: Some("Oranienstrasse 1, Berlin".to_string()),
        phone: Some("+49 30 000000".to_string()),
        website: website.map(str::to_owned),
        rating,
        review_count: 14,
        photo_count: 3,
        price_tier: None,
        business_status: Some("OPEN".to_string()),
        category: Some("Cafe".to_string()),
    }
}

fn pagespeed_client(server: &MockServer, api_key: Option<&str>) -> PageSpeedClient {
    PageSpeedClient::new(
        &format!("{}/runPagespeed", server.uri()),
        api_key.map(str::to_owned),
        5,
        "leadscan-test/0.1",
    )
    .expect("client construction should not fail")
}

fn gemini_client(server: &MockServer, max_retries: u32) -> GeminiClient {
    GeminiClient::new("gemini-key", MODEL, &server.uri(), 5, max_retries, "leadscan-test/0.1")
        .expect("client construction should not fail")
        .with_backoff_base_ms(1)
}

fn completion(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

fn report_json() -> String {
    json!({
        "lead_quality": "Low",
        "tech_stack": ["Wix"],
        "scores": { "ui": 81, "seo": 77, "tech": 90, "total": 83 },
        "report_card": {
            "executive_summary": "Modern site with minor SEO gaps.",
            "issues_found": ["Missing meta description"],
            "recommendations": ["Add meta descriptions"]
        },
        "email_pitch": { "subject": "Hello", "body_text": "Hi there" }
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// page speed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pagespeed_sends_mobile_strategy_and_parses_score() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", "https://sonnenschein.example/"))
        .and(query_param("strategy", "mobile"))
        .and(query_param("category", "performance"))
        .and(query_param("key", "psi-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lighthouseResult": {
                "categories": { "performance": { "score": 0.31 } },
                "audits": { "speed-index": { "displayValue": "8.4 s" } }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let probe = pagespeed_client(&server, Some("psi-key"))
        .analyze("sonnenschein.example")
        .await
        .expect("probe should be present");
    assert_eq!(probe.score, 31);
    assert_eq!(probe.loading_time, "8.4 s");
}

#[tokio::test]
async fn pagespeed_omits_key_when_not_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param_is_missing("key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lighthouseResult": { "categories": { "performance": { "score": 0.9 } } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let probe = pagespeed_client(&server, None)
        .analyze("https://sonnenschein.example")
        .await;
    assert_eq!(probe.map(|p| p.score), Some(90));
}

#[tokio::test]
async fn pagespeed_error_status_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let probe = pagespeed_client(&server, None)
        .analyze("https://sonnenschein.example")
        .await;
    assert!(probe.is_none());
}

#[tokio::test]
async fn pagespeed_timeout_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(3))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let client = PageSpeedClient::new(
        &format!("{}/runPagespeed", server.uri()),
        None,
        1,
        "leadscan-test/0.1",
    )
    .unwrap();
    assert!(client.analyze("https://slow.example").await.is_none());
}

// ---------------------------------------------------------------------------
// security
// ---------------------------------------------------------------------------

#[tokio::test]
async fn security_scan_of_plain_http_site_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scanner = SecurityScanner::new(5, "leadscan-test/0.1").unwrap();
    let probe = scanner.scan(&server.uri()).await;
    assert_eq!(probe.score, Some(0));
    assert_eq!(probe.issues.len(), 1);
}

#[tokio::test]
async fn security_scan_of_unreachable_site_has_null_score() {
    // Port 9 (discard) is closed on test hosts, so the TLS connect fails.
    let scanner = SecurityScanner::new(2, "leadscan-test/0.1").unwrap();
    let probe = scanner.scan("https://127.0.0.1:9").await;
    assert_eq!(probe.score, None);
    assert_eq!(probe.issues.len(), 1);
    assert!(probe.issues[0].starts_with("Security check failed"));
}

// ---------------------------------------------------------------------------
// generative text
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ai_probe_parses_fenced_model_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "gemini-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(&format!("```json\n{}\n```", report_json()))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let probe = AiProbe::new(gemini_client(&server, 0));
    let analysis = probe
        .analyze(&candidate(Some("https://sonnenschein.example"), Some(4.6)), None, None)
        .await;
    assert!(!analysis.from_fallback);
    assert_eq!(analysis.lead_quality, LeadQuality::Low);
    assert_eq!(analysis.scores.total, 83);
    assert_eq!(analysis.tech_stack, vec!["Wix"]);
}

#[tokio::test]
async fn ai_probe_retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&report_json())))
        .mount(&server)
        .await;

    let probe = AiProbe::new(gemini_client(&server, 2));
    let analysis = probe
        .analyze(&candidate(Some("https://sonnenschein.example"), None), None, None)
        .await;
    assert!(!analysis.from_fallback);
}

#[tokio::test]
async fn ai_probe_falls_back_when_retries_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let probe = AiProbe::new(gemini_client(&server, 2));
    let analysis = probe
        .analyze(&candidate(Some("https://sonnenschein.example"), Some(3.2)), None, None)
        .await;
    assert!(analysis.from_fallback);
    assert_eq!(analysis.lead_quality, LeadQuality::High);
    assert_eq!(analysis.scores.ui, 50);
}

#[tokio::test]
async fn ai_probe_falls_back_on_schema_violation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"lead_quality": "High", "scores": 12}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let probe = AiProbe::new(gemini_client(&server, 2));
    let analysis = probe
        .analyze(&candidate(Some("https://sonnenschein.example"), Some(4.7)), None, None)
        .await;
    assert!(analysis.from_fallback);
    assert_eq!(analysis.lead_quality, LeadQuality::Medium);
}

#[tokio::test]
async fn ai_probe_falls_back_on_empty_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let probe = AiProbe::new(gemini_client(&server, 0));
    let analysis = probe.analyze(&candidate(None, None), None, None).await;
    assert!(analysis.from_fallback);
    assert_eq!(analysis.lead_quality, LeadQuality::High);
}

// ---------------------------------------------------------------------------
// enricher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enricher_skips_website_probes_without_website() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&report_json())))
        .expect(1)
        .mount(&server)
        .await;

    let enricher = Enricher::new(
        pagespeed_client(&server, None),
        SecurityScanner::new(5, "leadscan-test/0.1").unwrap(),
        AiProbe::new(gemini_client(&server, 0)),
        EnrichOptions::default(),
    );
    let result = enricher.enrich(&candidate(None, Some(4.1))).await;
    assert!(result.performance.is_none());
    assert!(result.security.is_none());
    assert!(result.ai.is_some());
}

#[tokio::test]
async fn enricher_runs_all_enabled_probes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lighthouseResult": { "categories": { "performance": { "score": 0.5 } } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&report_json())))
        .expect(0)
        .mount(&server)
        .await;

    let enricher = Enricher::new(
        pagespeed_client(&server, None),
        SecurityScanner::new(5, "leadscan-test/0.1").unwrap(),
        AiProbe::new(gemini_client(&server, 0)),
        EnrichOptions {
            ai: false,
            ..EnrichOptions::default()
        },
    );
    let result = enricher
        .enrich(&candidate(Some("http://sonnenschein.example"), Some(4.1)))
        .await;
    assert_eq!(result.performance.map(|p| p.score), Some(50));
    assert_eq!(result.security.and_then(|s| s.score), Some(0));
    assert!(result.ai.is_none());
}
