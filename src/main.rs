//! Evv-Harvest main entry point
//!
//! This is the command-line interface for the Evv-Harvest listing crawler.

use anyhow::Context;
use clap::Parser;
use evv_harvest::config::{load_config_with_hash, validate, Config};
use evv_harvest::crawler::{crawl, PageSelection};
use evv_harvest::output::{print_statistics, CsvOutput, OutputHandler};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Evv-Harvest: a bounded real-estate listing crawler
///
/// Collects listing URLs from the paginated index, scrapes each listing
/// and its contact phone, and writes the records to CSV.
#[derive(Parser, Debug)]
#[command(name = "evv-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A bounded real-estate listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of index pages to crawl; takes precedence over --all
    #[arg(long, env = "NUM_PAGES", value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// Detect and crawl every index page; any value other than `true` turns it off
    #[arg(
        long,
        env = "SCRAPE_ALL",
        default_value = "true",
        num_args = 0..=1,
        default_missing_value = "true",
        action = clap::ArgAction::Set,
        value_parser = parse_scrape_all
    )]
    all: bool,

    /// CSV destination, overriding the config file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Site origin, overriding the config file
    #[arg(long, value_name = "URL")]
    origin: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

/// Reads the auto-detect switch: on only for `true` in any case
fn parse_scrape_all(value: &str) -> Result<bool, String> {
    Ok(value.eq_ignore_ascii_case("true"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_run_config(&cli)?;
    let selection = PageSelection::from_inputs(cli.pages, cli.all);

    if cli.dry_run {
        handle_dry_run(&config, selection);
        return Ok(());
    }

    handle_crawl(config, selection).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` wins over the flags when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("evv_harvest=info,warn"),
                1 => EnvFilter::new("evv_harvest=debug,info"),
                2 => EnvFilter::new("evv_harvest=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_run_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }
    if let Some(origin) = &cli.origin {
        config.site.origin = origin.clone();
    }

    validate(&config).context("invalid configuration after command-line overrides")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, selection: PageSelection) {
    println!("=== Evv-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Origin: {}", config.site.origin);
    println!("  Index path: {}", config.site.index_path);
    println!("  Phone path: {}", config.site.phone_path);

    println!("\nCrawler:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Page stride: {}", config.crawler.page_stride);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Phone delay: {}ms", config.crawler.phone_delay_ms);

    println!("\nPages:");
    match selection {
        PageSelection::Explicit(n) => println!("  Explicit: {}", n),
        PageSelection::AutoDetect => println!("  Auto-detect from pagination"),
        PageSelection::Default => println!("  Default: {}", config.crawler.default_pages),
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, selection: PageSelection) -> anyhow::Result<()> {
    let csv_path = PathBuf::from(&config.output.csv_path);

    tracing::info!(
        "Crawling {} with at most {} concurrent requests",
        config.site.origin,
        config.crawler.max_concurrent_requests
    );

    let report = crawl(config, selection).await.context("crawl failed")?;

    print_statistics(&report.statistics);

    if report.records.is_empty() {
        tracing::warn!("No listings to save!");
        return Ok(());
    }

    let written = save_records(&csv_path, &report.records)?;
    tracing::info!("Saved {} listings to {}", written, csv_path.display());

    Ok(())
}

fn save_records(
    path: &Path,
    records: &[evv_harvest::ListingRecord],
) -> anyhow::Result<usize> {
    let mut output = CsvOutput::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let written = output
        .write_all(records)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(written)
}
