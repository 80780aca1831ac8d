//! `search` command: one bulk search, printed as a summary or streamed as
//! JSON lines.

use std::io::Write;
use std::time::Duration;

use clap::{Args, ValueEnum};
use leadscan_core::{AppConfig, FilterCriteria, LeadStore, PriceTier, WebsiteRequirement};
use leadscan_db::PgLeadStore;
use leadscan_enrich::{EnrichOptions, Enricher};
use leadscan_listing::{ListingClient, ListingSettings};
use leadscan_pipeline::{
    next_with_keepalive, BulkSearchOutcome, BulkSearchRequest, MemoryLeadStore, Orchestrator,
    SearchEvent,
};
use tokio::sync::mpsc;

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WebsiteArg {
    Any,
    HasWebsite,
    NoWebsite,
}

impl From<WebsiteArg> for WebsiteRequirement {
    fn from(arg: WebsiteArg) -> Self {
        match arg {
            WebsiteArg::Any => WebsiteRequirement::Any,
            WebsiteArg::HasWebsite => WebsiteRequirement::Required,
            WebsiteArg::NoWebsite => WebsiteRequirement::Excluded,
        }
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Business category to search for (e.g., "cafe")
    pub industry: String,
    /// City or region (e.g., "Berlin")
    pub location: String,
    /// Number of leads to find (1-1000)
    #[arg(long, default_value = "10")]
    pub target: usize,
    /// Skip listings rated above this
    #[arg(long)]
    pub max_rating: Option<f64>,
    /// Skip listings with fewer reviews than this
    #[arg(long)]
    pub min_reviews: Option<u32>,
    /// Allowed price tier, as 1-4 or $-$$$$ (repeatable)
    #[arg(long = "price-tier", value_parser = parse_price_tier)]
    pub price_tiers: Vec<PriceTier>,
    /// Only keep listings that publish a phone number
    #[arg(long)]
    pub must_have_phone: bool,
    /// Skip listings with more photos than this
    #[arg(long)]
    pub max_photos: Option<u32>,
    /// Website requirement
    #[arg(long, value_enum, default_value = "any")]
    pub website: WebsiteArg,
    /// Skip the page-speed probe
    #[arg(long)]
    pub no_performance: bool,
    /// Skip the security-header probe
    #[arg(long)]
    pub no_security: bool,
    /// Skip the generative-text analysis and use heuristic scores
    #[arg(long)]
    pub no_ai: bool,
    /// Print progress events as JSON lines while the search runs
    #[arg(long)]
    pub stream: bool,
    /// Keep leads in memory instead of writing them to the database
    #[arg(long)]
    pub dry_run: bool,
}

impl SearchArgs {
    pub fn filters(&self) -> FilterCriteria {
        FilterCriteria {
            max_rating: self.max_rating,
            min_reviews: self.min_reviews,
            price_tiers: (!self.price_tiers.is_empty())
                .then(|| self.price_tiers.iter().copied().collect()),
            must_have_phone: self.must_have_phone,
            max_photos: self.max_photos,
            website: self.website.into(),
        }
    }

    pub fn enrich_options(&self) -> EnrichOptions {
        EnrichOptions {
            performance: !self.no_performance,
            security: !self.no_security,
            ai: !self.no_ai,
        }
    }

    pub fn request(&self) -> BulkSearchRequest {
        BulkSearchRequest {
            industry: self.industry.clone(),
            location: self.location.clone(),
            target_count: self.target,
            filters: self.filters(),
        }
    }
}

fn parse_price_tier(raw: &str) -> Result<PriceTier, String> {
    PriceTier::parse(raw).ok_or_else(|| format!("expected 1-4 or $ to $$$$, got '{raw}'"))
}

/// Run one bulk search.
///
/// With `--dry-run` leads go to an in-memory store and the database is never
/// touched.
///
/// # Errors
///
/// Returns an error if a client cannot be constructed, the database is
/// unreachable, or the request is rejected before the search starts.
/// Failures during the search are reported in the outcome instead.
pub(crate) async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let request = args.request();
    let listing = ListingClient::new(&ListingSettings::from_app_config(config))
        .map_err(|e| anyhow::anyhow!("failed to build listing client: {e}"))?;
    let enricher = Enricher::from_app_config(config, args.enrich_options())
        .map_err(|e| anyhow::anyhow!("failed to build enrichment clients: {e}"))?;
    let keepalive = Duration::from_secs(config.keepalive_secs.max(1));

    if args.dry_run {
        let orchestrator = Orchestrator::new(
            listing,
            enricher,
            MemoryLeadStore::new(),
            config.max_scan_limit,
        );
        execute(&orchestrator, &request, args.stream, keepalive).await?;
        if !args.stream {
            println!(
                "dry-run: {} lead(s) kept in memory, nothing written to the database",
                orchestrator.store().len()
            );
        }
        Ok(())
    } else {
        let pool = crate::connect(config).await?;
        let orchestrator = Orchestrator::new(
            listing,
            enricher,
            PgLeadStore::new(pool),
            config.max_scan_limit,
        );
        execute(&orchestrator, &request, args.stream, keepalive).await
    }
}

async fn execute<S: LeadStore>(
    orchestrator: &Orchestrator<S>,
    request: &BulkSearchRequest,
    stream: bool,
    keepalive: Duration,
) -> anyhow::Result<()> {
    if !stream {
        let outcome = orchestrator.run(request, None).await?;
        print_summary(&outcome);
        return Ok(());
    }

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let producer = async move {
        let result = orchestrator.run(request, Some(&tx)).await;
        drop(tx);
        result
    };
    // Owns the receiver so a failed write drops it and the run carries on
    // without streaming.
    let consumer = async move {
        let mut rx = rx;
        while let Some(event) = next_with_keepalive(&mut rx, keepalive).await {
            write_event(&mut std::io::stdout().lock(), &event)?;
        }
        anyhow::Ok(())
    };

    let (outcome, printed) = tokio::join!(producer, consumer);
    printed?;
    outcome?;
    Ok(())
}

/// Writes one event as a JSON line. Write errors such as a closed pipe are
/// returned rather than panicking.
pub(crate) fn write_event<W: Write>(out: &mut W, event: &SearchEvent) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn print_summary(outcome: &BulkSearchOutcome) {
    println!(
        "run {}: {} - {} lead(s) found, {} listing(s) scanned over {} page(s)",
        outcome.run_id,
        outcome.status.as_str(),
        outcome.total_found,
        outcome.total_scanned,
        outcome.pages_fetched
    );
    if outcome.leads.is_empty() {
        return;
    }

    println!();
    println!("{:<9}{:<7}{:<36}WEBSITE", "STRENGTH", "SCORE", "NAME");
    for lead in &outcome.leads {
        let score = lead
            .total_score
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!(
            "{:<9}{:<7}{:<36}{}",
            lead.lead_strength.as_str(),
            score,
            truncate(&lead.company_name, 34),
            lead.website
        );
    }

    if !outcome.failures.is_empty() {
        println!();
        println!("{} candidate(s) could not be stored:", outcome.failures.len());
        for failure in &outcome.failures {
            println!("  {} ({}): {}", failure.name, failure.external_id, failure.reason);
        }
    }
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
