use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tradeflow_core::{batch, cleaning, config::FeatureConfig, db, features, loader, outputs};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Trade shipment cleaning, feature derivation and loading", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse shipment dates and drop rows without one
    Clean(CleanArgs),
    /// Derive unit, category and cost features
    Features(FeaturesArgs),
    /// Insert a featured dataset into the shipments table
    Load(LoadArgs),
    /// Run database migrations
    Migrate,
    /// Clean, derive features and write the result (optionally loading it)
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Raw extract (.csv, .xlsx) or intermediate (.parquet)
    #[arg(long)]
    input: PathBuf,
    /// Destination (.parquet or .csv)
    #[arg(long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct FeaturesArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
    /// TOML file overriding the feature settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LoadArgs {
    #[arg(long)]
    input: PathBuf,
    /// Rows per INSERT statement
    #[arg(long, default_value_t = loader::DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// Skip running migrations before loading
    #[arg(long)]
    skip_migrations: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also load the result into the database
    #[arg(long)]
    load: bool,
    #[arg(long, default_value_t = loader::DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Clean(args) => {
            let raw = outputs::read_frame(&args.input)?;
            let (cleaned, summary) = cleaning::clean_shipments(&raw)?;
            outputs::write_frame(&cleaned, &args.output)?;
            let summary = serde_json::to_string(&summary)?;
            info!(%summary, "Cleaning finished");
            Ok(())
        }
        Command::Features(args) => {
            let config = load_config(args.config.as_ref())?;
            let input = outputs::read_frame(&args.input)?;
            let (featured, summary) = features::derive_features(&input, &config)?;
            outputs::write_frame(&featured, &args.output)?;
            let summary = serde_json::to_string(&summary)?;
            info!(%summary, "Feature derivation finished");
            Ok(())
        }
        Command::Load(args) => {
            let frame = outputs::read_frame(&args.input)?;
            // fail on a bad frame before opening a connection
            loader::validate_frame(&frame)?;
            let pool = connect_pool().await?;
            if args.skip_migrations {
                warn!("Skipping migrations before loading");
            } else {
                db::run_migrations(&pool).await?;
            }
            loader::load_shipments(&pool, &frame, args.batch_size).await?;
            Ok(())
        }
        Command::Migrate => {
            let pool = connect_pool().await?;
            db::run_migrations(&pool).await?;
            info!("Database migrations applied");
            Ok(())
        }
        Command::Run(args) => {
            let config = load_config(args.config.as_ref())?;
            let outcome = batch::process_extract(&args.input, &config)?;
            outputs::write_frame(&outcome.frame, &args.output)?;
            let summary = serde_json::to_string(&outcome.summary)?;
            info!(%summary, "Batch finished");

            if args.load {
                loader::validate_frame(&outcome.frame)?;
                let pool = connect_pool().await?;
                db::run_migrations(&pool).await?;
                loader::load_shipments(&pool, &outcome.frame, args.batch_size).await?;
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<FeatureConfig> {
    match path {
        Some(path) => FeatureConfig::load(path)
            .with_context(|| format!("failed to load feature config {}", path.display())),
        None => Ok(FeatureConfig::default()),
    }
}

async fn connect_pool() -> Result<db::DbPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("TRADEFLOW_DATABASE_URL"))
        .context("DATABASE_URL (or TRADEFLOW_DATABASE_URL) must be set")?;
    db::connect(&database_url).await
}
