use url::Url;

use crate::url_model::resolve;

/// Tag preceding each segment URI in a media playlist.
pub const SEGMENT_INF_TAG: &str = "#EXTINF:";

/// Ordered, immutable list of absolute segment URLs. The output artifact's
/// byte order is this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentList(Vec<String>);

impl SegmentList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for SegmentList {
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

/// Extracts segment URLs in order of appearance.
///
/// After an `#EXTINF:` tag the next line that is neither blank nor another
/// `#` line is the segment URI. A tag with no URI after it is dropped.
pub fn parse_media_playlist(text: &str, base: &Url) -> SegmentList {
    let mut urls = Vec::new();
    let mut pending = false;
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with(SEGMENT_INF_TAG) {
            pending = true;
        } else if pending && !line.is_empty() && !line.starts_with('#') {
            urls.push(resolve(base, line));
            pending = false;
        }
    }
    SegmentList(urls)
}
