//! Join a playlist line against the playlist's own URL.

use url::Url;

/// Resolves `reference` (one line of a playlist) against `base` (the
/// playlist's URL).
///
/// - `http://…` / `https://…` are returned unchanged.
/// - `/path` is root-relative: scheme and host (with port) of `base`.
/// - anything else is relative to the directory of `base`'s path.
///
/// `.` and `..` segments are kept verbatim and the base query is dropped.
pub fn resolve(base: &Url, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }

    let origin = origin_of(base);
    if reference.starts_with('/') {
        return format!("{}{}", origin, reference);
    }

    let path = base.path();
    let dir = match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "/",
    };
    format!("{}{}{}", origin, dir, reference)
}

/// `scheme://host[:port]` of `url`.
fn origin_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}
