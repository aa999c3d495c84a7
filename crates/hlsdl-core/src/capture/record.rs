//! One captured request, as shown in the request log.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::message::{CaptureInfo, HeaderEntry, ResourceKind};
use crate::url_model::derive_filename;

/// Content type that marks a response as an HLS playlist.
pub const HLS_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// Playlist signature looked for when the content type is missing.
const HLS_SIGNATURE: &str = "#EXTM3U";
/// Body prefix (in characters) searched for the signature.
const SNIFF_CHARS: usize = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureRecord {
    pub id: String,
    pub tab_id: i64,
    pub code: Option<u32>,
    pub url: String,
    pub content_type: String,
    pub kind: ResourceKind,
    pub size: Option<u64>,
    pub request_headers: Vec<HeaderEntry>,
    pub response_headers: Vec<HeaderEntry>,
    /// Response body, base64 chunks in arrival order.
    pub body_chunks: Vec<String>,
}

impl CaptureRecord {
    /// Record created by a `req` message.
    pub fn from_info(info: &CaptureInfo) -> Self {
        Self {
            id: info.id.clone(),
            tab_id: info.tab_id,
            code: info.code,
            url: info.url.clone(),
            content_type: info.content_type.clone(),
            kind: info.kind,
            size: info.length,
            request_headers: info.req_header.clone().unwrap_or_default(),
            response_headers: info.resp_header.clone().unwrap_or_default(),
            body_chunks: info.b64_list.clone().unwrap_or_default(),
        }
    }

    /// Decoded body. Chunks that are not valid base64 are skipped.
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, chunk) in self.body_chunks.iter().enumerate() {
            match STANDARD.decode(chunk) {
                Ok(bytes) => out.extend_from_slice(&bytes),
                Err(e) => tracing::debug!(id = %self.id, chunk = i, "skipping body chunk: {}", e),
            }
        }
        out
    }

    /// Body as text (lossy UTF-8).
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body_bytes()).into_owned()
    }

    /// Whether downloading this record means running an HLS session.
    ///
    /// True for the HLS content type, or for an empty content type whose body
    /// begins with `#EXTM3U`.
    pub fn is_hls(&self) -> bool {
        let mime = self.content_type.split(';').next().unwrap_or_default().trim();
        if mime.eq_ignore_ascii_case(HLS_CONTENT_TYPE) {
            return true;
        }
        if !self.content_type.trim().is_empty() {
            return false;
        }
        let head: String = self.body_text().chars().take(SNIFF_CHARS).collect();
        head.starts_with(HLS_SIGNATURE)
    }

    pub fn request_header(&self, name: &str) -> Option<&str> {
        find_header(&self.request_headers, name)
    }

    pub fn response_header(&self, name: &str) -> Option<&str> {
        find_header(&self.response_headers, name)
    }

    /// Shell command reproducing the request with its captured headers.
    pub fn curl_command(&self) -> String {
        let mut cmd = format!("curl {}", shell_quote(&self.url));
        for h in &self.request_headers {
            cmd.push_str(" -H ");
            cmd.push_str(&shell_quote(&format!("{}: {}", h.name, h.value)));
        }
        cmd
    }

    /// URL plus request and response headers, each block sorted by name.
    pub fn detail_text(&self) -> String {
        let mut out = format!("URL: {}\n", self.url);
        dump_headers(&mut out, "========== request headers ========", &self.request_headers);
        dump_headers(&mut out, "========== response headers ========", &self.response_headers);
        out
    }

    /// Local filename for a direct (non-HLS) download.
    pub fn download_filename(&self) -> String {
        derive_filename(&self.url, self.response_header("Content-Disposition"))
    }
}

fn find_header<'a>(headers: &'a [HeaderEntry], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

fn dump_headers(out: &mut String, banner: &str, headers: &[HeaderEntry]) {
    out.push_str(banner);
    out.push('\n');
    let mut sorted: Vec<&HeaderEntry> = headers.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    for h in sorted {
        out.push_str(&format!("{}: {}\n", h.name, h.value));
    }
}

/// Single-quote for POSIX shells (`'` becomes `'\''`).
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
