//! `hlsdl hls <url>`: run one HLS session with terminal progress.

use anyhow::Result;
use hlsdl_core::config::HlsdlConfig;
use hlsdl_core::control::CancelToken;
use hlsdl_core::export::DirExporter;
use hlsdl_core::fetch::CurlFetcher;
use hlsdl_core::scheduler::ProgressStats;
use hlsdl_core::session::{Session, SessionOutcome};
use hlsdl_core::storage::FsArtifactStore;
use std::collections::HashMap;

use super::download_dir;
use crate::cli::progress::print_progress;
use crate::cli::surface::{TerminalSurface, VariantChoice};
use crate::cli::HlsOptions;

pub async fn run_hls(
    cfg: &HlsdlConfig,
    url: &str,
    opts: &HlsOptions,
    headers: HashMap<String, String>,
) -> Result<()> {
    let cancel = CancelToken::new();
    spawn_ctrl_c(cancel.clone());

    let (progress_tx, progress_rx) = tokio::sync::mpsc::channel::<ProgressStats>(16);
    let printer = tokio::spawn(print_progress(progress_rx, opts.title.clone()));

    let fetcher = CurlFetcher::new(cfg.curl_options()).with_headers(headers);
    let store = FsArtifactStore::new(FsArtifactStore::default_root()?);
    let exporter = DirExporter::new(download_dir(opts.output_dir.as_deref(), cfg));
    let mut session_cfg = cfg.session_config();
    if let Some(jobs) = opts.jobs {
        session_cfg.max_concurrency = jobs;
    }
    let choice = VariantChoice::from(opts);
    let url = url.to_string();

    let outcome = tokio::task::spawn_blocking(move || {
        let mut surface = TerminalSurface::new(progress_tx, cancel, choice);
        Session::new(&fetcher, &store, &exporter)
            .with_config(session_cfg)
            .run(&url, &mut surface)
    })
    .await??;
    let _ = printer.await;

    match outcome {
        SessionOutcome::Exported {
            path,
            segments,
            bytes,
        } => println!(
            "Saved {} ({} segments, {:.1} MiB)",
            path.display(),
            segments,
            bytes as f64 / 1_048_576.0
        ),
        SessionOutcome::Cancelled { received, total } => {
            println!("Cancelled after {} of {} segments; nothing saved.", received, total)
        }
        SessionOutcome::Dismissed => println!("No variant chosen; nothing downloaded."),
    }
    Ok(())
}

/// First Ctrl-C cancels cooperatively; a second one exits immediately.
fn spawn_ctrl_c(cancel: CancelToken) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if cancel.cancel() {
                eprintln!("\ninterrupted again; exiting");
                std::process::exit(130);
            }
            eprintln!("\ncancelling after in-flight segments (Ctrl-C again to exit now)");
        }
    });
}
