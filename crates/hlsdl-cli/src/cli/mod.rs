//! CLI for hlsdl.

mod commands;
mod progress;
mod surface;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use hlsdl_core::capture::ResourceKind;
use hlsdl_core::config;
use std::path::{Path, PathBuf};

use commands::{run_checksum, run_get, run_hls, run_records};

/// Top-level CLI for hlsdl.
#[derive(Debug, Parser)]
#[command(name = "hlsdl")]
#[command(about = "hlsdl: download HLS streams and inspect captured requests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by everything that may run an HLS session.
#[derive(Debug, Clone, Default, Args)]
pub struct HlsOptions {
    /// Title shown above the progress output.
    #[arg(long)]
    pub title: Option<String>,

    /// Pick variant N (0-based, playlist order) from a master playlist.
    #[arg(long, value_name = "N", conflicts_with = "best")]
    pub variant: Option<usize>,

    /// Pick the highest-bandwidth variant from a master playlist.
    #[arg(long)]
    pub best: bool,

    /// Maximum segment requests in flight (default from config).
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Directory for the finished file (default from config, else ~/Downloads).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download an HLS stream (master or media playlist URL) into one file.
    Hls {
        /// Playlist URL.
        url: String,

        #[command(flatten)]
        opts: HlsOptions,
    },

    /// Download a single resource as-is.
    Get {
        /// Resource URL.
        url: String,

        /// Directory for the downloaded file.
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Inspect captured requests (HAR file or JSON-lines capture log).
    Records {
        #[command(subcommand)]
        command: RecordsCommand,
    },

    /// Compute SHA-256 of a file (e.g. after download).
    Checksum {
        /// Path to the file.
        path: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// List captured requests in id order.
    List {
        /// Capture file (.har or JSON lines).
        file: PathBuf,

        /// Only these kinds (html, css, js, data, image, media, etc). Repeatable.
        #[arg(long = "kind", value_name = "KIND", value_delimiter = ',')]
        kinds: Vec<ResourceKind>,

        /// Only requests from this tab.
        #[arg(long, value_name = "ID", allow_negative_numbers = true)]
        tab: Option<i64>,
    },

    /// Show URL and headers of one request.
    Show {
        file: PathBuf,
        id: String,

        /// Also print the captured response body.
        #[arg(long)]
        body: bool,
    },

    /// Print a curl command that repeats the request.
    Curl { file: PathBuf, id: String },

    /// Download the resource behind a request (HLS playlists run a full session).
    Download {
        file: PathBuf,
        id: String,

        /// Send the captured Cookie header along.
        #[arg(long)]
        allow_cookies: bool,

        #[command(flatten)]
        opts: HlsOptions,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Hls { url, opts } => run_hls(&cfg, &url, &opts, Default::default()).await?,
            CliCommand::Get { url, output_dir } => {
                run_get(&cfg, &url, None, output_dir.as_deref(), Default::default()).await?
            }
            CliCommand::Records { command } => run_records(&cfg, command).await?,
            CliCommand::Checksum { path } => run_checksum(Path::new(&path)).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
