//! Combines a candidate and its probe results into a [`LeadRecord`].

use chrono::{DateTime, Utc};
use leadscan_core::{Candidate, LeadRecord, LeadStatus, LeadStrength, LEAD_SOURCE};
use leadscan_enrich::{fallback_analysis, EnrichmentResult, LeadQuality};
use uuid::Uuid;

use crate::scorer::{initial_score, lead_strength};

/// Maximum number of issues kept on a record.
pub const MAX_ISSUES: usize = 10;

/// Security findings prepended ahead of the AI-reported issues.
const SECURITY_ISSUES_PREPENDED: usize = 2;

/// Penalty applied to the total score when estimating speed without a
/// page-speed measurement.
const SPEED_ESTIMATE_PENALTY: u8 = 20;

/// Values shared by every record produced in one run.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    pub run_id: Uuid,
    pub industry: &'a str,
    pub now: DateTime<Utc>,
}

/// Website value for a listing that has none. Embeds the external id so the
/// record stays uniquely addressable.
#[must_use]
pub fn placeholder_website(external_id: &str) -> String {
    format!("no-website-{external_id}")
}

#[must_use]
pub fn strength_for_quality(quality: LeadQuality) -> LeadStrength {
    match quality {
        LeadQuality::High => LeadStrength::Strong,
        LeadQuality::Medium => LeadStrength::Medium,
        LeadQuality::Low => LeadStrength::Weak,
    }
}

/// Exact-match deduplication preserving first-seen order, capped at
/// [`MAX_ISSUES`].
#[must_use]
pub fn dedup_issues<I>(issues: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for issue in issues {
        if out.len() == MAX_ISSUES {
            break;
        }
        if !out.contains(&issue) {
            out.push(issue);
        }
    }
    out
}

/// Merges probe output into a finished record.
///
/// AI sub-scores become the record's ui/seo/tech/total scores. When the AI
/// probe was disabled, the fallback analysis supplies them.
#[must_use]
pub fn merge(candidate: &Candidate, enrichment: EnrichmentResult, ctx: RunContext<'_>) -> LeadRecord {
    let EnrichmentResult {
        performance,
        security,
        ai,
    } = enrichment;
    let ai = ai.unwrap_or_else(|| fallback_analysis(candidate));

    let speed_score = performance.as_ref().map_or_else(
        || ai.scores.total.saturating_sub(SPEED_ESTIMATE_PENALTY),
        |p| p.score,
    );

    // A perfect header score carries only the positive summary line, which
    // is not an issue.
    let security_issues: Vec<String> = security
        .as_ref()
        .filter(|s| s.score != Some(100))
        .map(|s| {
            s.issues
                .iter()
                .take(SECURITY_ISSUES_PREPENDED)
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    let issues = dedup_issues(security_issues.into_iter().chain(ai.issues));

    LeadRecord {
        id: Uuid::new_v4(),
        run_id: ctx.run_id,
        external_id: candidate.external_id.clone(),
        company_name: candidate.name.clone(),
        website: website_or_placeholder(candidate),
        phone: candidate.phone.clone(),
        address: candidate.address.clone(),
        industry: ctx.industry.to_string(),
        source: LEAD_SOURCE.to_string(),
        rating: candidate.rating,
        review_count: candidate.review_count,
        photo_count: candidate.photo_count,
        price_tier: candidate.price_tier,
        ui_score: Some(ai.scores.ui),
        seo_score: Some(ai.scores.seo),
        tech_score: Some(ai.scores.tech),
        performance_score: performance.as_ref().map(|p| p.score),
        security_score: security.as_ref().and_then(|s| s.score),
        total_score: Some(ai.scores.total),
        speed_score: Some(speed_score),
        loading_time: performance.map(|p| p.loading_time),
        lead_strength: strength_for_quality(ai.lead_quality),
        status: LeadStatus::Completed,
        issues,
        tech_stack: ai.tech_stack,
        executive_summary: Some(ai.executive_summary).filter(|s| !s.is_empty()),
        recommendations: ai.recommendations,
        pitch_subject: Some(ai.pitch.subject).filter(|s| !s.is_empty()),
        pitch_body: Some(ai.pitch.body).filter(|s| !s.is_empty()),
        last_checked: ctx.now,
        created_at: ctx.now,
        updated_at: ctx.now,
    }
}

/// Record for a listing without a website, built from the heuristic score
/// alone with no probes run.
#[must_use]
pub fn heuristic_record(candidate: &Candidate, ctx: RunContext<'_>) -> LeadRecord {
    let score = initial_score(candidate);
    let mut issues = vec!["No website listed on the business profile".to_string()];
    if let Some(rating) = candidate.rating.filter(|r| *r < 4.0) {
        issues.push(format!("Average rating of {rating:.1} stars is below 4.0"));
    }

    LeadRecord {
        id: Uuid::new_v4(),
        run_id: ctx.run_id,
        external_id: candidate.external_id.clone(),
        company_name: candidate.name.clone(),
        website: website_or_placeholder(candidate),
        phone: candidate.phone.clone(),
        address: candidate.address.clone(),
        industry: ctx.industry.to_string(),
        source: LEAD_SOURCE.to_string(),
        rating: candidate.rating,
        review_count: candidate.review_count,
        photo_count: candidate.photo_count,
        price_tier: candidate.price_tier,
        ui_score: None,
        seo_score: None,
        tech_score: None,
        performance_score: None,
        security_score: None,
        total_score: Some(score),
        speed_score: None,
        loading_time: None,
        lead_strength: lead_strength(score, candidate.has_website()),
        status: LeadStatus::Completed,
        issues: dedup_issues(issues),
        tech_stack: Vec::new(),
        executive_summary: None,
        recommendations: Vec::new(),
        pitch_subject: None,
        pitch_body: None,
        last_checked: ctx.now,
        created_at: ctx.now,
        updated_at: ctx.now,
    }
}

fn website_or_placeholder(candidate: &Candidate) -> String {
    candidate
        .website
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map_or_else(|| placeholder_website(&candidate.external_id), str::to_owned)
}
