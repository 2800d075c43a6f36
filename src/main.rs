//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest site scraper.

use anyhow::Context;
use clap::Parser;
use site_harvest::config::{load_config, HarvestConfig};
use site_harvest::crawler::{Harvester, ScrapeEvent};
use site_harvest::output::{print_summary, send_to_ingest, summarize, write_json};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Site-Harvest: sitemap-driven site scraper
///
/// Site-Harvest discovers the pages of a website from its robots.txt and
/// sitemaps (or, failing that, its homepage links) and extracts the title,
/// description and readable main content of each page.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version)]
#[command(about = "A sitemap-driven site scraper", long_about = None)]
struct Cli {
    /// Any page URL on the site to harvest
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the harvested documents to this JSON file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// POST the harvested documents to this ingestion endpoint
    #[arg(long, value_name = "URL")]
    ingest: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => HarvestConfig::default(),
    };

    let harvester = Harvester::new(config).context("failed to initialise harvester")?;

    let (events, receiver) = mpsc::unbounded_channel();
    let progress = tokio::spawn(log_progress(receiver));

    let result = harvester.harvest(&cli.seed, Some(events)).await;
    // The sender is gone once harvest returns, so the logger drains and exits
    let _ = progress.await;

    let report = result.with_context(|| format!("harvest of {} failed", cli.seed))?;
    let documents = report.documents;

    if !cli.quiet {
        print_summary(&summarize(&documents));
    }

    if let Some(path) = &cli.output {
        write_json(path, &documents)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if let Some(endpoint) = &cli.ingest {
        let client = reqwest::Client::new();
        match send_to_ingest(&client, endpoint, &documents).await? {
            Some(url) => println!("Collection served at: {}", url),
            None => tracing::info!("Ingestion finished; no serving URL reported"),
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Logs scrape progress with a remaining-time estimate
async fn log_progress(mut receiver: mpsc::UnboundedReceiver<ScrapeEvent>) {
    let started = Instant::now();
    let mut last_done = 0;

    while let Some(event) = receiver.recv().await {
        let ScrapeEvent::Progress { url, done, total } = event else {
            continue;
        };
        if done == last_done && done != 0 {
            continue;
        }
        last_done = done;

        let eta = estimate_remaining(started.elapsed(), done, total);
        tracing::info!(
            "[{}/{}] {} (about {}s left)",
            done,
            total,
            if url.is_empty() { "starting" } else { url.as_str() },
            eta.as_secs()
        );
    }
}

/// Average time per finished page times the pages left
fn estimate_remaining(elapsed: Duration, done: usize, total: usize) -> Duration {
    if done == 0 {
        return Duration::ZERO;
    }
    let remaining = total.saturating_sub(done) as u32;
    (elapsed / done as u32) * remaining
}
