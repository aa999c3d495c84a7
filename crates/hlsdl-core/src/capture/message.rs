//! Wire shape of the messages emitted by the request-capture layer.

use serde::{Deserialize, Deserializer, Serialize};

/// One HTTP header as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Coarse resource category assigned by the capture layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Html,
    Css,
    Js,
    Data,
    Image,
    Media,
    #[default]
    #[serde(other)]
    Etc,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown resource kind: {0} (expected html, css, js, data, image, media or etc)")]
pub struct UnknownKind(pub String);

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Html,
        ResourceKind::Css,
        ResourceKind::Js,
        ResourceKind::Data,
        ResourceKind::Image,
        ResourceKind::Media,
        ResourceKind::Etc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Html => "html",
            ResourceKind::Css => "css",
            ResourceKind::Js => "js",
            ResourceKind::Data => "data",
            ResourceKind::Image => "image",
            ResourceKind::Media => "media",
            ResourceKind::Etc => "etc",
        }
    }

    /// Best guess from a Content-Type value, for sources that carry no kind.
    pub fn from_content_type(content_type: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "text/html" | "application/xhtml+xml" => ResourceKind::Html,
            "text/css" => ResourceKind::Css,
            m if m.contains("javascript") || m.contains("ecmascript") => ResourceKind::Js,
            m if m.contains("mpegurl") || m.contains("dash+xml") || m == "video/mp2t" => {
                ResourceKind::Media
            }
            m if m.starts_with("video/") || m.starts_with("audio/") => ResourceKind::Media,
            m if m.starts_with("image/") => ResourceKind::Image,
            m if m.contains("json") || m.contains("xml") || m == "text/plain" => ResourceKind::Data,
            _ => ResourceKind::Etc,
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by every capture message. Which fields are filled depends
/// on the message type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "tabId")]
    pub tab_id: i64,
    pub code: Option<u32>,
    pub url: String,
    pub content_type: String,
    pub kind: ResourceKind,
    pub length: Option<u64>,
    #[serde(rename = "reqHeader", skip_serializing_if = "Option::is_none")]
    pub req_header: Option<Vec<HeaderEntry>>,
    #[serde(rename = "respHeader", skip_serializing_if = "Option::is_none")]
    pub resp_header: Option<Vec<HeaderEntry>>,
    /// Body chunks, each base64-encoded.
    #[serde(rename = "b64List", skip_serializing_if = "Option::is_none")]
    pub b64_list: Option<Vec<String>>,
}

/// Message from the capture layer, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CaptureMessage {
    /// Handshake; carries nothing.
    Init,
    /// A request was observed: creates the record.
    Req { info: CaptureInfo },
    /// Request headers as sent.
    ReqSend { info: CaptureInfo },
    ReqEnd { info: CaptureInfo },
    ReqErr { info: CaptureInfo },
    /// Response body captured.
    RespData { info: CaptureInfo },
}

impl CaptureMessage {
    pub fn info(&self) -> Option<&CaptureInfo> {
        match self {
            CaptureMessage::Init => None,
            CaptureMessage::Req { info }
            | CaptureMessage::ReqSend { info }
            | CaptureMessage::ReqEnd { info }
            | CaptureMessage::ReqErr { info }
            | CaptureMessage::RespData { info } => Some(info),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }
    Ok(match Id::deserialize(d)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}
