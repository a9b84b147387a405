use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::{DEFAULT_DATA_DIR, DEFAULT_REPO_URL, ServiceConfig};
use crate::reload::ReloadTrigger;
use crate::service::LyricService;
use crate::utils::format_path_with_tilde;

#[derive(Parser)]
#[command(name = "lyric-meta-search")]
#[command(version)]
#[command(about = "Search lyric metadata across music platforms", long_about = None)]
#[command(after_help = "Every command syncs the dataset with git first unless --no-sync is given.")]
pub struct Cli {
    /// Dataset directory; well-known locations are probed when it has no platform data
    #[arg(long, global = true, env = "LYRIC_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Git repository the dataset is cloned from
    #[arg(long, global = true, env = "LYRIC_REPO_URL", default_value = DEFAULT_REPO_URL)]
    pub repo_url: String,

    /// Use the data directory as-is, never clone or pull. Without it every command,
    /// one-shot ones included, clones or pulls the dataset before answering.
    #[arg(long, global = true)]
    pub no_sync: bool,

    /// Refuse lyric file downloads
    #[arg(long, global = true)]
    pub no_download: bool,

    /// Seconds between background syncs (serve only)
    #[arg(long, global = true, default_value_t = 600)]
    pub interval: u64,

    /// Search deadline in seconds
    #[arg(long, global = true, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search song metadata by substring
    Search {
        query: String,
        /// Restrict to a platform (repeatable)
        #[arg(short, long = "platform")]
        platforms: Vec<String>,
    },
    /// Show index statistics
    Status,
    /// List downloadable lyric formats
    Formats,
    /// Fetch a lyric file
    Download {
        #[arg(long)]
        platform: String,
        #[arg(long = "id")]
        music_id: String,
        /// Defaults to ttml
        #[arg(long)]
        format: Option<String>,
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sync the dataset and reload if it changed
    Update,
    /// Answer JSON requests on stdin, one per line, and keep the index fresh
    Serve,
}

impl Cli {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            data_dir: self.data_dir.clone(),
            repo_url: self.repo_url.clone(),
            sync_enabled: !self.no_sync,
            download_enabled: !self.no_download,
            sync_interval: Duration::from_secs(self.interval.max(1)),
            search_timeout: Duration::from_secs(self.timeout),
            ..ServiceConfig::default()
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let service = LyricService::new(cli.service_config());

    match command {
        Commands::Search { query, platforms } => {
            load(&service).await;
            let response = service.search(query, platforms).await?;
            print_json(&response)?;
        }
        Commands::Status => {
            load(&service).await;
            print_json(&service.status())?;
        }
        Commands::Formats => {
            print_json(&service.list_formats())?;
        }
        Commands::Download { platform, music_id, format, output } => {
            load(&service).await;
            let file = service.download(platform, music_id, format.as_deref())?;
            match output {
                Some(path) => {
                    std::fs::write(path, &file.bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(
                        "Saved {} to {}",
                        file.file_name,
                        format_path_with_tilde(path)
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&file.bytes)?;
                    stdout.flush()?;
                }
            }
        }
        Commands::Update => {
            let report = service.trigger_reload().await?;
            print_json(&report)?;
        }
        Commands::Serve => {
            let shutdown = CancellationToken::new();
            let on_signal = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted, shutting down");
                    on_signal.cancel();
                }
            });

            let periodic = service.start(shutdown.clone()).await;
            let served = super::serve::serve_lines(
                &service,
                tokio::io::stdin(),
                tokio::io::stdout(),
                shutdown.clone(),
            )
            .await;

            shutdown.cancel();
            if let Some(handle) = periodic {
                let _ = handle.await;
            }
            served?;
        }
    }

    Ok(())
}

/// One-shot commands load once and skip the background loop
async fn load(service: &LyricService) {
    service.coordinator().reload(ReloadTrigger::Startup).await;
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{}", rendered);
    Ok(())
}
