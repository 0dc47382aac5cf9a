//! mbid-resolver - MBID resolution command line tool
//!
//! Reads a release JSON document, fills in the MusicBrainz IDs of its
//! artists and labels, and writes the result back out. Also inspects and
//! clears the persistent MBID cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mbid_common::config::{self, StorageMedium, TomlConfig};
use mbid_resolver::types::Release;
use mbid_resolver::{
    open_store, CacheGateway, KeyValueStore, MbidResolver, MusicBrainzClient, ProviderRegistry,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for mbid-resolver
#[derive(Parser, Debug)]
#[command(name = "mbid-resolver")]
#[command(about = "Resolve external release entity IDs to MusicBrainz IDs")]
#[command(version)]
struct Args {
    /// Config file (default: MBID_CONFIG or <config dir>/mbid-resolver/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root folder holding the durable cache database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Volatile development environment (selects the durable cache)
    #[arg(long)]
    dev: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the MBIDs of a release JSON document
    Resolve {
        /// Release JSON file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect or clear the MBID cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Print entry count and quota
    Stats,
    /// Remove every cached MBID
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config::config_file_path(args.config.as_deref());
    let toml_config = config::load_toml_config(config_path.as_deref())
        .context("Failed to load configuration")?;

    // Initialize tracing; logs go to stderr so stdout stays clean for JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting mbid-resolver {}", env!("CARGO_PKG_VERSION"));

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let volatile = config::is_volatile_environment(args.dev, &toml_config);
    let medium = StorageMedium::for_environment(volatile);
    info!(volatile, medium = %medium, "Root folder: {}", root_folder.display());

    let store = open_store(medium, &root_folder, toml_config.cache.clone())
        .await
        .context("Failed to open MBID cache")?;

    match args.command {
        Command::Resolve { input, output } => {
            resolve_release(&toml_config, store, &input, output.as_deref()).await
        }
        Command::Cache { action } => run_cache_action(store.as_ref(), action).await,
    }
}

async fn resolve_release(
    toml_config: &TomlConfig,
    store: Arc<dyn KeyValueStore>,
    input: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let data = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let mut release: Release = serde_json::from_str(&data)
        .with_context(|| format!("Invalid release JSON in {}", input.display()))?;

    let browser = MusicBrainzClient::new(&toml_config.musicbrainz)
        .context("Failed to create MusicBrainz client")?;
    let resolver = MbidResolver::new(
        CacheGateway::new(store),
        Arc::new(browser),
        Arc::new(ProviderRegistry::default()),
    );

    let report = resolver
        .resolve_release_mbids(&mut release)
        .await
        .context("MBID resolution failed")?;

    for message in &release.info.messages {
        eprintln!("[{:?}] {}", message.kind, message.text);
    }
    info!(
        elapsed_ms = report.elapsed.as_millis() as u64,
        requests = report.request_count,
        "Release resolved"
    );

    let json = serde_json::to_string_pretty(&release).context("Failed to serialize release")?;
    match output {
        Some(path) => tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(())
}

async fn run_cache_action(store: &dyn KeyValueStore, action: CacheAction) -> Result<()> {
    match action {
        CacheAction::Stats => {
            let count = store.count().await.context("Failed to count cache entries")?;
            let quota = store.quota();
            println!("Medium:      {}", store.medium());
            println!("Entries:     {} / {}", count, quota.max_entries);
            println!("Byte quota:  {}", quota.max_bytes);
        }
        CacheAction::Clear => {
            let removed = store.clear().await.context("Failed to clear cache")?;
            info!(removed, "MBID cache cleared");
            println!("Removed {} cached entries", removed);
        }
    }

    Ok(())
}
