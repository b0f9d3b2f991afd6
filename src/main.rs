//! Mirrorpress main entry point
//!
//! Command-line interface for the mirrorpress website mirroring crawler.

use clap::Parser;
use mirrorpress::config::load_config_with_hash;
use mirrorpress::crawler::Coordinator;
use mirrorpress::storage::{remove_empty_dirs, remove_temp_files};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Mirrorpress: mirror a website to local storage
///
/// Mirrorpress crawls a site from the configured start URLs, stores pages
/// and media under a deterministic local directory layout, and skips
/// anything the mirror already holds, so interrupted or repeated runs only
/// fetch what is missing.
#[derive(Parser, Debug)]
#[command(name = "mirrorpress")]
#[command(version = "1.0.0")]
#[command(about = "Mirror a website to local storage", long_about = None)]
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

    /// Validate config and show what would be mirrored without crawling
    #[arg(long, conflicts_with = "sweep")]
    dry_run: bool,

    /// Only run mirror-tree housekeeping (remove temp files and empty
    /// folders) and exit
    #[arg(long, conflicts_with = "dry_run")]
    sweep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else if cli.sweep {
        handle_sweep(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mirrorpress=info,warn"),
            1 => EnvFilter::new("mirrorpress=debug,info"),
            2 => EnvFilter::new("mirrorpress=trace,debug"),
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

/// Handles --dry-run: validates config and shows what would be mirrored
fn handle_dry_run(config: &mirrorpress::config::Config) {
    println!("=== Mirrorpress Dry Run ===\n");

    println!("Start URLs ({}):", config.crawl.start_urls.len());
    for url in &config.crawl.start_urls {
        println!("  - {}", url);
    }

    println!("\nAllowed domains ({}):", config.crawl.allowed_domains.len());
    for domain in &config.crawl.allowed_domains {
        println!("  - {}", domain);
    }

    println!(
        "\nBlocked substrings ({}):",
        config.crawl.blocked_substrings.len()
    );
    for blocked in &config.crawl.blocked_substrings {
        println!("  - {}", blocked);
    }

    println!("\nCrawl:");
    println!("  Workers: {}", config.crawl.workers);
    match config.crawl.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }

    println!("\nRendering proxy:");
    if config.render.enabled {
        println!("  Endpoint: {}", config.render.endpoint);
        println!("  Wait: {}s", config.render.wait);
        println!("  Resource timeout: {}s", config.render.resource_timeout);
        println!("  Timeout: {}s", config.render.timeout);
        println!("  Strict domains: {}", config.render.strict_domains);
    } else {
        println!("  Disabled (pages fetched over plain GET)");
    }

    println!("\nOutput:");
    println!("  Mirror root: {}", config.output.mirror_root);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start mirroring from {} URL(s)",
        config.crawl.start_urls.len()
    );
}

/// Handles --sweep: housekeeping pass over the mirror root, no crawling
fn handle_sweep(config: &mirrorpress::config::Config) -> anyhow::Result<()> {
    let root = std::path::Path::new(&config.output.mirror_root);

    let temps = remove_temp_files(root)?;
    println!("Removed {} temporary file(s)", temps);

    let folders = remove_empty_dirs(root)?;
    println!("Removed {} empty folder(s)", folders);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: mirrorpress::config::Config) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config)?;

    // Stop between URLs on Ctrl-C; a second Ctrl-C kills the process
    let cancel = coordinator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing in-flight pages");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    match coordinator.run().await {
        Ok(report) => {
            tracing::info!(
                "Crawl finished: {} mirrored, {} from cache, {} fetch failures, {} storage failures, {} unexpected",
                report.mirrored,
                report.from_cache,
                report.fetch_failed,
                report.storage_failed,
                report.unexpected
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
