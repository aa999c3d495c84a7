//! `hlsdl get <url>`: single-request download.

use anyhow::Result;
use hlsdl_core::config::HlsdlConfig;
use hlsdl_core::direct::download_resource;
use hlsdl_core::export::DirExporter;
use hlsdl_core::fetch::CurlFetcher;
use std::collections::HashMap;
use std::path::Path;

use super::download_dir;

pub async fn run_get(
    cfg: &HlsdlConfig,
    url: &str,
    filename: Option<String>,
    output_dir: Option<&Path>,
    headers: HashMap<String, String>,
) -> Result<()> {
    let fetcher = CurlFetcher::new(cfg.curl_options()).with_headers(headers);
    let exporter = DirExporter::new(download_dir(output_dir, cfg));
    let policy = cfg.request_retry_policy();
    let url = url.to_string();

    let (path, bytes) = tokio::task::spawn_blocking(move || {
        download_resource(&fetcher, &url, filename.as_deref(), &policy, &exporter)
    })
    .await??;
    println!("Saved {} ({} bytes)", path.display(), bytes);
    Ok(())
}
