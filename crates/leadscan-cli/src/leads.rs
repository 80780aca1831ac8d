//! `leads` command: read-only listing of stored leads.

use clap::Args;
use leadscan_core::{LeadStatus, LeadStrength};
use leadscan_db::LeadQuery;

#[derive(Debug, Args)]
pub struct LeadsArgs {
    /// Maximum number of leads to show (1-100)
    #[arg(long, default_value = "20")]
    pub limit: i64,
    /// Number of leads to skip
    #[arg(long, default_value = "0")]
    pub offset: i64,
    /// Filter by status (completed, analyzing, failed)
    #[arg(long, value_parser = parse_status)]
    pub status: Option<LeadStatus>,
    /// Filter by lead strength (strong, medium, weak)
    #[arg(long, value_parser = parse_strength)]
    pub strength: Option<LeadStrength>,
}

impl LeadsArgs {
    pub fn query(&self) -> LeadQuery {
        LeadQuery {
            limit: self.limit,
            offset: self.offset,
            status: self.status,
            strength: self.strength,
        }
    }
}

fn parse_status(raw: &str) -> Result<LeadStatus, String> {
    LeadStatus::parse(raw).ok_or_else(|| format!("unknown status '{raw}'"))
}

fn parse_strength(raw: &str) -> Result<LeadStrength, String> {
    LeadStrength::parse(raw).ok_or_else(|| format!("unknown lead strength '{raw}'"))
}

/// Print stored leads, most recently updated first.
///
/// # Errors
///
/// Returns an error if the paging arguments are out of range or the database
/// query fails.
pub(crate) async fn run_leads(pool: &sqlx::PgPool, args: &LeadsArgs) -> anyhow::Result<()> {
    let leads = leadscan_db::list_leads(pool, &args.query()).await?;

    if leads.is_empty() {
        println!("no leads found; run `search` first");
        return Ok(());
    }

    println!(
        "{:<9}{:<7}{:<12}{:<18}{:<36}WEBSITE",
        "STRENGTH", "SCORE", "STATUS", "UPDATED", "NAME"
    );
    for lead in &leads {
        let score = lead
            .total_score
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!(
            "{:<9}{:<7}{:<12}{:<18}{:<36}{}",
            lead.lead_strength.as_str(),
            score,
            lead.status.as_str(),
            lead.updated_at.format("%Y-%m-%d %H:%M"),
            crate::search::truncate(&lead.company_name, 34),
            lead.website
        );
    }

    Ok(())
}
