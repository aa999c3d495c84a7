//! `hlsdl records …`: list, inspect, and download captured requests.

use anyhow::{Context, Result};
use hlsdl_core::capture::{load_capture_log, CaptureLog, CaptureRecord, KindFilter, TabFilter};
use hlsdl_core::config::HlsdlConfig;
use std::collections::HashMap;
use std::path::Path;

use super::{run_get, run_hls};
use crate::cli::{HlsOptions, RecordsCommand};

pub async fn run_records(cfg: &HlsdlConfig, command: RecordsCommand) -> Result<()> {
    match command {
        RecordsCommand::List { file, kinds, tab } => {
            let log = load_capture_log(&file)?;
            let filter = if kinds.is_empty() {
                cfg.kind_filter()
            } else {
                KindFilter::only(kinds)
            };
            let rows = log.filtered(&filter, TabFilter::from(tab));
            println!("{}", header_row());
            for record in &rows {
                println!("{}", format_row(record));
            }
            tracing::debug!(shown = rows.len(), total = log.len(), "listed records");
        }
        RecordsCommand::Show { file, id, body } => {
            let log = load_capture_log(&file)?;
            let record = find(&log, &id, &file)?;
            print!("{}", record.detail_text());
            if body {
                println!("========== body ========");
                println!("{}", record.body_text());
            }
        }
        RecordsCommand::Curl { file, id } => {
            let log = load_capture_log(&file)?;
            println!("{}", find(&log, &id, &file)?.curl_command());
        }
        RecordsCommand::Download {
            file,
            id,
            allow_cookies,
            opts,
        } => {
            let log = load_capture_log(&file)?;
            let record = find(&log, &id, &file)?.clone();
            let headers = request_headers(&record, allow_cookies);
            if record.is_hls() {
                let opts = HlsOptions {
                    title: opts.title.clone().or_else(|| Some(record.url.clone())),
                    ..opts
                };
                run_hls(cfg, &record.url, &opts, headers).await?;
            } else {
                run_get(
                    cfg,
                    &record.url,
                    Some(record.download_filename()),
                    opts.output_dir.as_deref(),
                    headers,
                )
                .await?;
            }
        }
    }
    Ok(())
}

fn find<'a>(log: &'a CaptureLog, id: &str, file: &Path) -> Result<&'a CaptureRecord> {
    log.get(id)
        .with_context(|| format!("no request with id {} in {}", id, file.display()))
}

/// Extra headers for re-fetching a captured request. Cookies only on request.
pub(crate) fn request_headers(record: &CaptureRecord, allow_cookies: bool) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    if allow_cookies {
        if let Some(cookie) = record.request_header("Cookie") {
            headers.insert("Cookie".to_string(), cookie.to_string());
        }
    }
    headers
}

pub(crate) fn header_row() -> String {
    format!("{:>6} {:>5} {:>4} {:<6} {:>10}  {:<32} {}", "ID", "TAB", "CODE", "KIND", "SIZE", "CONTENT-TYPE", "URL")
}

pub(crate) fn format_row(r: &CaptureRecord) -> String {
    let code = r.code.map_or_else(|| "-".to_string(), |c| c.to_string());
    let size = r.size.map_or_else(|| "-".to_string(), |s| s.to_string());
    let hls = if r.is_hls() { " [hls]" } else { "" };
    format!(
        "{:>6} {:>5} {:>4} {:<6} {:>10}  {:<32} {}{}",
        r.id, r.tab_id, code, r.kind.as_str(), size, r.content_type, r.url, hls
    )
}
