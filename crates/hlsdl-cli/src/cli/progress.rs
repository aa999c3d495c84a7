//! Progress printer task fed by the terminal surface.

use std::time::Instant;

use hlsdl_core::scheduler::ProgressStats;
use tokio::sync::mpsc;

const PROGRESS_INTERVAL_MS: u64 = 500;

/// One status line for `stats`.
pub fn format_progress(stats: &ProgressStats) -> String {
    let done_mib = stats.bytes_received as f64 / 1_048_576.0;
    let rate_mib = stats.bytes_per_sec() / 1_048_576.0;
    let eta = stats
        .eta_secs()
        .map(|s| format!("{:.0}s", s))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "  {} / {} segments ({:.1}%)  {:.1} MiB  {:.2} MiB/s  ETA {}",
        stats.segments_received,
        stats.segment_count,
        stats.fraction() * 100.0,
        done_mib,
        rate_mib,
        eta
    )
}

/// Prints at most every 500ms, plus the final snapshot. Ends when every
/// sender is dropped.
pub async fn print_progress(mut rx: mpsc::Receiver<ProgressStats>, title: Option<String>) {
    if let Some(title) = title {
        println!("{}", title);
    }
    let mut last_print: Option<Instant> = None;
    while let Some(stats) = rx.recv().await {
        let now = Instant::now();
        let due = last_print
            .map_or(true, |t| now.duration_since(t).as_millis() as u64 >= PROGRESS_INTERVAL_MS);
        if due || stats.segments_received >= stats.segment_count {
            println!("\r{}  ", format_progress(&stats));
            last_print = Some(now);
        }
    }
}
