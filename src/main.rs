//! List-Harvester main entry point
//!
//! This is the command-line interface for the List-Harvester crawl runner.

use anyhow::Context;
use clap::Parser;
use list_harvester::browser::{HttpPagePool, PagePool};
use list_harvester::config::{load_config_with_hash, Config};
use list_harvester::runner::{ListRunner, RunnerSettings};
use list_harvester::storage::{open_storage, DataStorage};
use list_harvester::SelectorCrawler;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// List-Harvester: a recurring category/detail crawl runner
///
/// Walks every configured category page, harvests the detail pages it links
/// to, stores the results in SQLite, and repeats after the configured delay.
#[derive(Parser, Debug)]
#[command(name = "list-harvester")]
#[command(version)]
#[command(about = "A recurring category/detail crawl runner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a single cycle regardless of the configured delay
    #[arg(long)]
    once: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "once")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_run(config, cli.once).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("list_harvester=info,warn"),
            1 => EnvFilter::new("list_harvester=debug,info"),
            2 => EnvFilter::new("list_harvester=trace,debug"),
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

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== List-Harvester Dry Run ===\n");

    println!("Runner: {}", config.id);
    if config.delay_ms() < 1 {
        println!("  Delay: none (single cycle)");
    } else {
        println!("  Delay: {}ms", config.delay_ms());
    }
    println!("  Pages per handle: {}", config.pages_per_handle());
    match config.max_contexts() {
        Some(max) => println!("  Max page handles: {}", max),
        None => println!("  Max page handles: unlimited"),
    }

    println!("\nExtraction:");
    println!("  Detail links: {}", config.extract.detail_links);
    for (name, selector) in &config.extract.fields {
        println!("  Field {}: {}", name, selector);
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nCategories ({}):", config.categories.len());
    for category in &config.categories {
        if category.tags.is_empty() {
            println!("  - {}", category.uri);
        } else {
            println!("  - {} [{}]", category.uri, category.tags.join(", "));
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main run loop
async fn handle_run(config: Config, once: bool) -> anyhow::Result<()> {
    let crawler = SelectorCrawler::from_config(&config.extract)?;
    let storage: Arc<dyn DataStorage> = Arc::new(
        open_storage(Path::new(&config.output.database_path))
            .with_context(|| format!("failed to open {}", config.output.database_path))?,
    );
    let pool: Arc<dyn PagePool> = Arc::new(HttpPagePool::new(&config.http)?);

    let mut settings = RunnerSettings::from_config(&config);
    if once {
        settings.delay_ms = 0;
    }

    let runner = ListRunner::new(settings, crawler, storage);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let cycles = runner.process_until(pool, shutdown).await;
    tracing::info!("Runner {} finished after {} cycle(s)", runner.id(), cycles);
    Ok(())
}
