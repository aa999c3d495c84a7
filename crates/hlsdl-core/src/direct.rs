//! Standalone resource download: one request, exported as-is.

use std::io::Cursor;
use std::path::PathBuf;

use crate::export::Exporter;
use crate::fetch::Fetcher;
use crate::retry::{fetch_with_retry, FetchError, RetryPolicy};
use crate::url_model::derive_filename;

#[derive(Debug, thiserror::Error)]
pub enum DirectError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("export failed: {0:#}")]
    Export(anyhow::Error),
}

/// Fetches `url` with the single-request retry rules and exports the body.
///
/// `filename` overrides the name derived from the URL path.
pub fn download_resource(
    fetcher: &dyn Fetcher,
    url: &str,
    filename: Option<&str>,
    policy: &RetryPolicy,
    exporter: &dyn Exporter,
) -> Result<(PathBuf, u64), DirectError> {
    let name = filename
        .map(str::to_string)
        .unwrap_or_else(|| derive_filename(url, None));
    tracing::info!(url, name = %name, "direct download");
    let resp = fetch_with_retry(fetcher, url, policy)?;
    let len = resp.body.len() as u64;
    let path = exporter
        .export(&mut Cursor::new(resp.body), &name)
        .map_err(DirectError::Export)?;
    Ok((path, len))
}
