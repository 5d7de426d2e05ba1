use clap::{Parser, Subcommand};
use pubwatch_core::Platform;
use pubwatch_ingest::{IngestOptions, Ingestor, PgContentStore, PgDirectory};
use pubwatch_scraper::FetchClient;

#[derive(Debug, Parser)]
#[command(name = "pubwatch-cli")]
#[command(about = "pubwatch command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upsert companies from the YAML config into the database.
    Seed,
    /// Scrape one platform for one company, now.
    Scrape {
        company: String,
        platform: String,
        #[arg(long)]
        max_posts: Option<usize>,
    },
    /// Scrape every linked platform of every active company.
    Batch {
        #[arg(long)]
        max_posts: Option<usize>,
    },
    /// Show recent ingest runs.
    Runs {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = pubwatch_core::load_app_config_from_env()?;
    let pool_config = pubwatch_db::PoolConfig::from_app_config(&config);
    let pool = pubwatch_db::connect_pool(&config.database_url, pool_config).await?;
    pubwatch_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Seed => {
            let companies = pubwatch_core::load_companies(&config.companies_path)?;
            let count = pubwatch_db::seed_companies(&pool, &companies.companies).await?;
            println!("seeded {count} companies from {}", config.companies_path.display());
        }
        Commands::Scrape {
            company,
            platform,
            max_posts,
        } => {
            let platform: Platform = platform
                .parse()
                .map_err(|e| anyhow::anyhow!("{e}; expected medium, mirror, or paragraph"))?;
            let ingestor = build_ingestor(&config, &pool)?;
            let records = ingestor
                .scrape_platform(&company, platform, max_posts)
                .await?;
            println!("{company} / {platform}: {} new records", records.len());
            for record in records {
                println!("  [{}] {} ({})", record.post_id, record.title, record.url);
            }
        }
        Commands::Batch { max_posts } => {
            let ingestor = build_ingestor(&config, &pool)?;
            let outcome = ingestor.run_all_recorded(&pool, "cli", max_posts).await;
            println!(
                "batch complete: {} records, {} companies scraped, {} failed",
                outcome.records.len(),
                outcome.companies_scraped,
                outcome.companies_failed
            );
        }
        Commands::Runs { limit } => {
            let runs = pubwatch_db::list_ingest_runs(&pool, limit).await?;
            if runs.is_empty() {
                println!("no ingest runs recorded");
            }
            for run in runs {
                println!(
                    "#{} {} [{}] inserted={} companies={}/{} failed={} {}",
                    run.id,
                    run.created_at.format("%Y-%m-%d %H:%M:%S"),
                    run.status,
                    run.records_inserted,
                    run.companies_total - run.companies_failed,
                    run.companies_total,
                    run.companies_failed,
                    run.error_message.as_deref().unwrap_or("")
                );
            }
        }
    }

    Ok(())
}

fn build_ingestor(
    config: &pubwatch_core::AppConfig,
    pool: &sqlx::PgPool,
) -> anyhow::Result<Ingestor<PgDirectory, PgContentStore>> {
    let fetch = FetchClient::new(config.fetch_timeout_secs, &config.user_agent)?;
    Ok(Ingestor::new(
        PgDirectory::new(pool.clone()),
        PgContentStore::new(pool.clone()),
        fetch,
        IngestOptions::from_app_config(config),
    ))
}
