//! `nowshowing` CLI - now-playing cinema listings enriched with ratings

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nowshowing::{Config, ProviderKind};

#[derive(Parser)]
#[command(name = "nowshowing")]
#[command(about = "Now-playing cinema listings enriched with release year, genres and ratings")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/nowshowing/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the listing, extract every movie and enrich it with ratings
    Run {
        /// Enrichment provider: api or rendered
        #[arg(short, long)]
        provider: Option<ProviderKind>,

        /// Now-playing page to start from
        #[arg(long, value_name = "URL")]
        listing_url: Option<String>,

        /// Pause between enrichment requests, in milliseconds
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,

        /// Directory for the JSON artifacts
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Extract one detail page and print the record as JSON
    Detail {
        /// Detail page URL
        url: String,

        /// Also print which strategies ran for each field
        #[arg(long)]
        trace: bool,
    },

    /// Query the enrichment provider for one external id (e.g. tt0113277)
    Lookup {
        /// External title identifier
        external_id: String,

        /// Enrichment provider: api or rendered
        #[arg(short, long)]
        provider: Option<ProviderKind>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            provider,
            listing_url,
            delay_ms,
            data_dir,
        } => {
            if let Some(provider) = provider {
                config.provider = provider;
            }
            if let Some(url) = listing_url {
                config.listing_url = url;
            }
            if let Some(delay) = delay_ms {
                config.request_delay_ms = delay;
            }
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            cmd::cmd_run(&config).await?;
        }
        Commands::Detail { url, trace } => {
            cmd::cmd_detail(&url, trace).await?;
        }
        Commands::Lookup {
            external_id,
            provider,
        } => {
            if let Some(provider) = provider {
                config.provider = provider;
            }
            cmd::cmd_lookup(&config, &external_id).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
