//! Validation of the model's JSON report.

use serde_json::{Map, Value};

use crate::error::EnrichError;
use crate::types::{AiAnalysis, AiScores, LeadQuality, OutreachPitch};

use super::sanitize::sanitize_ai_json;

const REQUIRED_KEYS: [&str; 4] = ["lead_quality", "scores", "report_card", "email_pitch"];
const NESTED_KEYS: [&str; 3] = ["scores", "report_card", "email_pitch"];
const DEFAULT_SUB_SCORE: u8 = 50;

/// Sanitizes and validates a raw model response.
///
/// # Errors
///
/// - [`EnrichError::Deserialize`] if the sanitized text is not JSON.
/// - [`EnrichError::InvalidResponse`] if the top level is not an object,
///   a required key is missing, `scores`/`report_card`/`email_pitch` is not
///   an object, or `lead_quality` is not High/Medium/Low.
pub fn parse_ai_response(raw: &str) -> Result<AiAnalysis, EnrichError> {
    let cleaned = sanitize_ai_json(raw);
    let value: Value =
        serde_json::from_str(&cleaned).map_err(|e| EnrichError::Deserialize {
            context: "generative-text report".to_string(),
            source: e,
        })?;

    let Value::Object(root) = value else {
        return Err(EnrichError::InvalidResponse(
            "top-level value is not an object".to_string(),
        ));
    };

    if let Some(missing) = REQUIRED_KEYS.iter().find(|k| !root.contains_key(**k)) {
        return Err(EnrichError::InvalidResponse(format!(
            "missing required key '{missing}'"
        )));
    }
    for key in NESTED_KEYS {
        if !root.get(key).is_some_and(Value::is_object) {
            return Err(EnrichError::InvalidResponse(format!(
                "'{key}' is not an object"
            )));
        }
    }

    let lead_quality = root
        .get("lead_quality")
        .and_then(Value::as_str)
        .and_then(LeadQuality::parse)
        .ok_or_else(|| EnrichError::InvalidResponse("unrecognized lead_quality".to_string()))?;

    let empty = Map::new();
    let object = |key: &str| root.get(key).and_then(Value::as_object).unwrap_or(&empty);
    let scores = object("scores");
    let report = object("report_card");
    let pitch = object("email_pitch");

    Ok(AiAnalysis {
        lead_quality,
        tech_stack: string_list(root.get("tech_stack")),
        scores: AiScores {
            ui: sub_score(scores.get("ui")),
            seo: sub_score(scores.get("seo")),
            tech: sub_score(scores.get("tech")),
            total: sub_score(scores.get("total")),
        },
        executive_summary: string_field(report, &["executive_summary"]),
        issues: string_list(report.get("issues_found")),
        recommendations: string_list(report.get("recommendations")),
        pitch: OutreachPitch {
            subject: string_field(pitch, &["subject"]),
            body: string_field(pitch, &["body_text", "body"]),
        },
        from_fallback: false,
    })
}

/// Integer, float, or numeric string, clamped to `0..=100`. Anything else
/// falls back to the neutral default.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sub_score(value: Option<&Value>) -> u8 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number.filter(|n| n.is_finite()) {
        Some(n) => n.round().clamp(0.0, 100.0) as u8,
        None => DEFAULT_SUB_SCORE,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_owned()],
        _ => Vec::new(),
    }
}

fn string_field(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| map.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_owned()
}
