//! topic-updater CLI - Apply list columns from a CSV to a Supabase table.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use topic_updater::{
    CheckpointStore, Column, Config, SupabaseClient, Table, Target, UpdatePipeline,
};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "topic-updater")]
#[command(version)]
#[command(about = "Update data in categories or books_metadata table, through a CSV file")]
struct Cli {
    /// Path to the CSV file containing the data to be updated
    csv_file: PathBuf,

    /// Path to the checkpoint file
    checkpoint_file: PathBuf,

    /// The table to update
    #[arg(value_enum)]
    table: Table,

    /// The column to update
    #[arg(value_enum)]
    column: Column,

    /// Supabase URL (default: SUPABASE_URL from the environment or .env)
    #[arg(long = "supabase_url", alias = "supabase-url", value_name = "URL")]
    supabase_url: Option<String>,

    /// Supabase API key (default: SUPABASE_KEY from the environment or .env)
    #[arg(long = "supabase_key", alias = "supabase-key", value_name = "KEY")]
    supabase_key: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment file loaded before resolving credentials
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

/// Load `path` into the process environment. A missing file is not an error.
fn load_env_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to load {path:?}")),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {path:?}")),
        None => Ok(Config::default()),
    }
}

/// Environment file, then config file, then CLI overrides.
///
/// Credentials resolve as: CLI flag, config file value, environment variable.
fn resolve_config(cli: &Cli) -> Result<Config> {
    if load_env_file(&cli.env_file)? {
        debug!(path = %cli.env_file.display(), "Loaded environment file");
    }

    let mut config = load_config(cli)?;
    config.apply_overrides(cli.supabase_url.clone(), cli.supabase_key.clone());
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let config = resolve_config(&cli)?;

    let client =
        SupabaseClient::new(&config.supabase).context("Failed to create Supabase client")?;
    let target = Target::new(cli.table, cli.column);

    info!(
        csv = %cli.csv_file.display(),
        checkpoint = %cli.checkpoint_file.display(),
        target = %target,
        "Starting"
    );

    let pipeline = UpdatePipeline::new(
        client,
        CheckpointStore::new(&cli.checkpoint_file),
        target,
        config.input,
    );

    pipeline
        .run(&cli.csv_file)
        .await
        .with_context(|| format!("Update of {target} from {:?} aborted", cli.csv_file))?;

    Ok(())
}
