//! URL handling: playlist reference resolution and local filename derivation.

mod content_disposition;
mod path;
mod resolve;
mod sanitize;

pub use content_disposition::content_disposition_filename;
pub use path::filename_from_url_path;
pub use resolve::resolve;
pub use sanitize::sanitize_filename;

/// Default filename when nothing usable can be derived.
const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe filename for saving a standalone resource.
///
/// Uses the Content-Disposition filename when one is given and parseable,
/// otherwise the last path segment of `url`.
///
/// - `derive_filename("https://example.com/poster.jpg", None)` → `"poster.jpg"`
/// - `derive_filename("https://example.com/", None)` → `"download.bin"`
pub fn derive_filename(url: &str, content_disposition: Option<&str>) -> String {
    content_disposition
        .and_then(content_disposition_filename)
        .or_else(|| filename_from_url_path(url))
        .map(|raw| sanitize_filename(&raw))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
