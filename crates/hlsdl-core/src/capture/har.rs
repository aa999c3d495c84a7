//! HAR 1.2 import: each entry becomes `req`, `reqSend` and `respData` messages.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use super::message::{CaptureInfo, CaptureMessage, HeaderEntry, ResourceKind};

/// Tab id used when an entry has no usable `pageref`.
pub const NO_TAB: i64 = -1;

#[derive(Debug, Deserialize)]
pub struct HarLog {
    pub log: HarRoot,
}

#[derive(Debug, Deserialize)]
pub struct HarRoot {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HarEntry {
    #[serde(default)]
    pub pageref: Option<String>,
    pub request: HarRequest,
    pub response: HarResponse,
}

#[derive(Debug, Deserialize)]
pub struct HarRequest {
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HarResponse {
    #[serde(default)]
    pub status: u32,
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
    #[serde(default)]
    pub content: HarContent,
    #[serde(default, rename = "bodySize")]
    pub body_size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarContent {
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Parses HAR JSON text.
pub fn parse_har(text: &str) -> serde_json::Result<HarLog> {
    serde_json::from_str(text)
}

/// Converts every entry into capture messages. Ids are the 1-based entry
/// positions.
pub fn har_messages(har: &HarLog) -> Vec<CaptureMessage> {
    let mut out = Vec::with_capacity(har.log.entries.len() * 3);
    for (i, entry) in har.log.entries.iter().enumerate() {
        let id = (i + 1).to_string();
        let resp = &entry.response;
        let content_type = resp
            .content
            .mime_type
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| header(&resp.headers, "Content-Type").map(str::to_string))
            .unwrap_or_default();
        let length = [resp.content.size, resp.body_size]
            .into_iter()
            .flatten()
            .find(|n| *n >= 0)
            .map(|n| n as u64);

        out.push(CaptureMessage::Req {
            info: CaptureInfo {
                id: id.clone(),
                tab_id: tab_id(entry.pageref.as_deref()),
                code: (resp.status != 0).then_some(resp.status),
                url: entry.request.url.clone(),
                kind: ResourceKind::from_content_type(&content_type),
                content_type,
                length,
                resp_header: Some(resp.headers.clone()),
                ..CaptureInfo::default()
            },
        });
        out.push(CaptureMessage::ReqSend {
            info: CaptureInfo {
                id: id.clone(),
                req_header: Some(entry.request.headers.clone()),
                ..CaptureInfo::default()
            },
        });
        if let Some(text) = &resp.content.text {
            let chunk = match resp.content.encoding.as_deref() {
                Some(enc) if enc.eq_ignore_ascii_case("base64") => text.clone(),
                _ => STANDARD.encode(text),
            };
            out.push(CaptureMessage::RespData {
                info: CaptureInfo {
                    id,
                    length,
                    b64_list: Some(vec![chunk]),
                    ..CaptureInfo::default()
                },
            });
        }
    }
    out
}

fn header<'a>(headers: &'a [HeaderEntry], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Trailing digits of a pageref (`page_3` → 3).
fn tab_id(pageref: Option<&str>) -> i64 {
    let Some(p) = pageref else {
        return NO_TAB;
    };
    let digits = p.trim_end_matches(|c: char| !c.is_ascii_digit());
    let start = digits
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |i| i + 1);
    digits[start..].parse().unwrap_or(NO_TAB)
}
