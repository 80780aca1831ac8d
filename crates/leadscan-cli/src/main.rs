mod leads;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::leads::LeadsArgs;
use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "leadscan-cli")]
#[command(about = "Find and qualify local-business sales leads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search listings, enrich qualifying businesses and store them as leads
    Search(SearchArgs),
    /// List stored leads, most recently updated first
    Leads(LeadsArgs),
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = leadscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search(args) => search::run_search(&config, args).await,
        Commands::Leads(args) => {
            let pool = connect(&config).await?;
            leads::run_leads(&pool, &args).await
        }
        Commands::Migrate => {
            let pool = connect(&config).await?;
            let applied = leadscan_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
    }
}

async fn connect(config: &leadscan_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = leadscan_db::PoolConfig::from_app_config(config);
    let pool = leadscan_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}
