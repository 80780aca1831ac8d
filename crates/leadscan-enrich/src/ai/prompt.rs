use std::fmt::Write as _;

use leadscan_core::Candidate;

use crate::types::{PerformanceProbe, SecurityProbe};

const RESPONSE_SCHEMA: &str = r#"{
  "lead_quality": "High" | "Medium" | "Low",
  "tech_stack": ["string"],
  "scores": { "ui": 0-100, "seo": 0-100, "tech": 0-100, "total": 0-100 },
  "report_card": {
    "executive_summary": "string",
    "issues_found": ["string"],
    "recommendations": ["string"]
  },
  "email_pitch": { "subject": "string", "body_text": "string" }
}"#;

/// Builds the lead-assessment prompt for one candidate.
///
/// Missing probe results are stated explicitly so the model does not
/// invent measurements.
#[must_use]
pub(crate) fn build_prompt(
    candidate: &Candidate,
    performance: Option<&PerformanceProbe>,
    security: Option<&SecurityProbe>,
) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(
        "You are a web consultant qualifying local businesses as sales leads for a web \
         agency. Lower scores mean a weaker online presence and therefore a better lead.\n\n",
    );

    prompt.push_str("BUSINESS\n");
    let _ = writeln!(prompt, "- Name: {}", candidate.name);
    if let Some(category) = candidate.category.as_deref() {
        let _ = writeln!(prompt, "- Category: {category}");
    }
    if let Some(address) = candidate.address.as_deref() {
        let _ = writeln!(prompt, "- Address: {address}");
    }
    let _ = writeln!(
        prompt,
        "- Website: {}",
        candidate.website.as_deref().unwrap_or("none")
    );
    match candidate.rating {
        Some(rating) => {
            let _ = writeln!(
                prompt,
                "- Rating: {rating:.1} ({} reviews)",
                candidate.review_count
            );
        }
        None => {
            let _ = writeln!(prompt, "- Rating: unrated ({} reviews)", candidate.review_count);
        }
    }
    let _ = writeln!(prompt, "- Photos on listing: {}", candidate.photo_count);

    prompt.push_str("\nPERFORMANCE (mobile)\n");
    match performance {
        Some(p) => {
            let _ = writeln!(prompt, "- Score: {}/100", p.score);
            let _ = writeln!(prompt, "- Loading time: {}", p.loading_time);
        }
        None => prompt.push_str("- Not measured\n"),
    }

    prompt.push_str("\nSECURITY HEADERS\n");
    match security {
        Some(s) => {
            match s.score {
                Some(score) => {
                    let _ = writeln!(prompt, "- Score: {score}/100");
                }
                None => prompt.push_str("- Score: unavailable\n"),
            }
            for issue in &s.issues {
                let _ = writeln!(prompt, "- {issue}");
            }
        }
        None => prompt.push_str("- Not checked\n"),
    }

    prompt.push_str(
        "\nReturn ONLY a JSON object, without markdown, matching exactly this schema:\n",
    );
    prompt.push_str(RESPONSE_SCHEMA);
    prompt.push_str(
        "\n\nWrite the email pitch as a short, friendly first contact addressed to the \
         business owner, referencing at most two concrete findings.",
    );
    prompt
}
