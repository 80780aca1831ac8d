use leadscan_core::Candidate;

use crate::types::{AiAnalysis, AiScores, LeadQuality, OutreachPitch};

const NEUTRAL_SCORE: u8 = 50;

/// Deterministic stand-in for the model report.
///
/// A listing without a website, or rated below 4.0, is a `High` quality
/// lead; every other listing is `Medium`. All sub-scores are neutral.
#[must_use]
pub fn fallback_analysis(candidate: &Candidate) -> AiAnalysis {
    let has_website = candidate.has_website();
    let low_rating = candidate.rating.is_some_and(|r| r < 4.0);
    let lead_quality = if !has_website || low_rating {
        LeadQuality::High
    } else {
        LeadQuality::Medium
    };

    let name = candidate.name.as_str();
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    if has_website {
        issues.push("Automated website review unavailable; manual review recommended".to_string());
        recommendations.push("Run a full audit of design and page speed".to_string());
    } else {
        issues.push("No website listed on the business profile".to_string());
        recommendations.push("Launch a mobile-friendly website with contact details".to_string());
    }
    if let Some(rating) = candidate.rating.filter(|r| *r < 4.0) {
        issues.push(format!("Average rating of {rating:.1} stars is below 4.0"));
        recommendations.push("Respond to reviews and encourage satisfied customers to rate".to_string());
    }

    let executive_summary = if has_website {
        format!(
            "{name} has an online presence, but it could not be analyzed automatically. \
             A manual review is likely to surface quick improvements."
        )
    } else {
        format!(
            "{name} has no website, so potential customers searching online cannot find \
             opening hours or offers beyond the listing."
        )
    };

    AiAnalysis {
        lead_quality,
        tech_stack: Vec::new(),
        scores: AiScores {
            ui: NEUTRAL_SCORE,
            seo: NEUTRAL_SCORE,
            tech: NEUTRAL_SCORE,
            total: NEUTRAL_SCORE,
        },
        executive_summary,
        issues,
        recommendations,
        pitch: OutreachPitch {
            subject: format!("A stronger online presence for {name}"),
            body: format!(
                "Hello {name} team,\n\n\
                 while looking at local businesses we came across your listing and see room \
                 to win more customers online. We would be glad to share a short, free \
                 assessment with concrete suggestions.\n\n\
                 Best regards"
            ),
        },
        from_fallback: true,
    }
}
