//! Link Archiver main entry point
//!
//! This is the command-line interface for the link archiver.

use clap::Parser;
use link_archiver::archiver::Archiver;
use link_archiver::config::{load_config, resolve_config, ConfigOverrides, FileConfig};
use link_archiver::output::log_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Link Archiver: keep a local copy of every page your notes link to
///
/// Scans a directory of markdown files for http(s) links and stores a
/// readable copy of each linked page in the output directory. Links that
/// were already attempted are remembered in `.checked_links.txt` and skipped
/// on later runs.
#[derive(Parser, Debug)]
#[command(name = "link-archiver")]
#[command(version)]
#[command(about = "Archive pages linked from markdown documents", long_about = None)]
struct Cli {
    /// Directory of markdown documents to scan
    #[arg(short, long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Directory to write archive entries into
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-link fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Number of fetches allowed in flight at once
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

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

    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => FileConfig::default(),
    };

    let overrides = ConfigOverrides {
        input: cli.input,
        output: cli.output,
        timeout_secs: cli.timeout,
        max_concurrent_fetches: cli.concurrency,
    };

    let config = match resolve_config(file_config, overrides) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let archiver = Archiver::with_http_fetcher(config)?;
    match archiver.run().await {
        Ok(stats) => {
            log_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Archive run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; `RUST_LOG` is ignored in favor of the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_archiver=info,warn"),
            1 => EnvFilter::new("link_archiver=debug,info"),
            2 => EnvFilter::new("link_archiver=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
