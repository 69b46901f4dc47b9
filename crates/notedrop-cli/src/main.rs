//! notedrop CLI
//!
//! Watches a vault directory and links Markdown notes written today into
//! today's daily note under the inbox section.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use notedrop_core::note::ensure_daily_note;
use notedrop_core::{Config, Ingestor, VaultWatcher, WatchMessage};

#[derive(Parser)]
#[command(name = "notedrop")]
#[command(about = "Watch a directory and add new Markdown files to today's daily note")]
#[command(version)]
struct Cli {
    /// Directory to watch (recursively)
    #[arg(long, value_name = "DIR")]
    watch_dir: PathBuf,

    /// Directory where daily notes (YYYY-MM-DD.md) live
    #[arg(long, value_name = "DIR")]
    daily_dir: PathBuf,

    /// Also link files created inside the daily notes directory
    #[arg(long)]
    include_daily_dir: bool,

    /// Config file path (default: ~/.config/notedrop/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let watch_root = expand_home(&cli.watch_dir);
    if !watch_root.is_dir() {
        anyhow::bail!(
            "watch-dir not found or not a directory: {}",
            watch_root.display()
        );
    }
    let watch_root = watch_root
        .canonicalize()
        .with_context(|| format!("Failed to resolve watch-dir {}", watch_root.display()))?;
    let daily_dir = expand_home(&cli.daily_dir);

    // Make sure today's note exists and carries the inbox section
    ensure_daily_note(&daily_dir, Local::now().date_naive(), &config.inbox_heading)
        .context("Failed to prepare today's daily note")?;

    let ingestor = Ingestor::new(&watch_root, &daily_dir, cli.include_daily_dir, &config)
        .context("Failed to set up ingestion")?;
    let watcher = VaultWatcher::new(&watch_root, &config.markdown_extensions)
        .context("Failed to start filesystem watcher")?;

    let shutdown = watcher.shutdown_handle();
    ctrlc::set_handler(move || {
        let _ = shutdown.send(WatchMessage::Shutdown);
    })
    .context("Failed to install Ctrl-C handler")?;

    tracing::info!(
        "watching {} -> daily notes in {}",
        watch_root.display(),
        daily_dir.display()
    );

    for msg in watcher.receiver.iter() {
        match msg {
            WatchMessage::Candidate(path) => match ingestor.process(&path) {
                Ok(true) => tracing::info!("linked {}", path.display()),
                Ok(false) => {}
                // One bad file must not stop ingestion of later events
                Err(e) => tracing::warn!("dropping event for {}: {}", path.display(), e),
            },
            WatchMessage::Shutdown => break,
        }
    }

    tracing::info!("shutting down");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Expand a leading `~/` to the user's home directory
fn expand_home(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
