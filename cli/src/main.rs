//! CiteSweep command-line entry point.
//!
//! `find-cites` sweeps the (agency, citation number) space and appends every
//! citation found to the harvest store. `fetch-details` reads that store back
//! and writes one fully detailed record per citation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use citesweep_client::HttpLookupClient;
use citesweep_core::{AgencyId, AppConfig};
use citesweep_scanner::{EnrichmentPipeline, HarvestOrchestrator, QuerySpace, ResultSink};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Command-line arguments for citesweep
#[derive(Parser, Debug)]
#[command(name = "citesweep")]
#[command(about = "Harvest and enrich parking citations from an online lookup service")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "CITESWEEP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep the query space and append found citations to the harvest store
    FindCites {
        /// First agency ID to query
        #[arg(long)]
        start_agency: Option<AgencyId>,

        /// Last agency ID to query (inclusive)
        #[arg(long)]
        end_agency: Option<AgencyId>,

        /// First citation number to query
        #[arg(long)]
        start_cite_num: Option<u64>,

        /// Last citation number to query (inclusive)
        #[arg(long)]
        end_cite_num: Option<u64>,

        /// Number of concurrent lookup workers
        #[arg(long)]
        concurrency: Option<usize>,

        /// Harvest store to append to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch detail pages for every harvested citation
    FetchDetails {
        /// Harvest store to read
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Detail store to write (truncated)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of concurrent detail workers
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Write a configuration file populated with the defaults
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,citesweep=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let Cli { config, command } = Cli::parse();
    info!("Starting CiteSweep v{}", env!("CARGO_PKG_VERSION"));

    match command {
        Command::FindCites {
            start_agency,
            end_agency,
            start_cite_num,
            end_cite_num,
            concurrency,
            output,
        } => {
            let (mut config, lookup) = connect(config.as_deref())?;
            let harvest = &mut config.harvest;
            override_with(&mut harvest.start_agency, start_agency);
            override_with(&mut harvest.end_agency, end_agency);
            override_with(&mut harvest.start_cite_num, start_cite_num);
            override_with(&mut harvest.end_cite_num, end_cite_num);
            override_with(&mut harvest.concurrency, concurrency);
            override_with(&mut harvest.output, output);

            let sink = ResultSink::open_append(&harvest.output).with_context(|| {
                format!("Failed to open harvest store {}", harvest.output.display())
            })?;
            let orchestrator = HarvestOrchestrator::from_config(lookup, harvest);
            let mut rng = StdRng::from_entropy();

            let stats = orchestrator
                .run(QuerySpace::from_config(harvest), &mut rng, sink)
                .await
                .context("Harvest failed")?;
            info!(
                "Stored {} citations from {} queries in {}",
                stats.found,
                stats.generated,
                harvest.output.display()
            );
        }
        Command::FetchDetails {
            input,
            output,
            concurrency,
        } => {
            let (mut config, lookup) = connect(config.as_deref())?;
            let enrich = &mut config.enrich;
            override_with(&mut enrich.input, input);
            override_with(&mut enrich.output, output);
            override_with(&mut enrich.concurrency, concurrency);

            let stats = EnrichmentPipeline::from_config(lookup, enrich)
                .run_files(&enrich.input, &enrich.output)
                .await
                .with_context(|| format!("Failed to enrich {}", enrich.input.display()))?;
            info!(
                "Wrote {} detailed records to {}",
                stats.written,
                enrich.output.display()
            );
        }
        Command::InitConfig { force } => init_config(config, force)?,
    }

    Ok(())
}

/// Load configuration and build the lookup client it describes.
fn connect(path: Option<&Path>) -> Result<(AppConfig, Arc<HttpLookupClient>)> {
    let config = AppConfig::load_with_env(path).context("Failed to load configuration")?;
    let client = HttpLookupClient::new(&config.service).context("Failed to build HTTP client")?;
    info!("Lookup service: {}", client.base_url());
    Ok((config, Arc::new(client)))
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => AppConfig::config_path().context("Failed to locate config directory")?,
    };
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        );
    }

    AppConfig::default()
        .save_to(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Replace `slot` with a command-line value when one was given.
fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
