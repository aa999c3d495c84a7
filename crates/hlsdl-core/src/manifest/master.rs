use url::Url;

use super::attributes::attribute;
use crate::url_model::resolve;

/// Tag introducing a variant stream in a master playlist.
pub const STREAM_INF_TAG: &str = "#EXT-X-STREAM-INF:";

/// One variant stream: its absolute URL and the raw attribute payload of its
/// `#EXT-X-STREAM-INF` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDescriptor {
    pub url: String,
    pub attributes: String,
}

impl VariantDescriptor {
    /// Value of one attribute, e.g. `RESOLUTION`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        attribute(&self.attributes, name)
    }

    /// Declared peak bandwidth in bits per second.
    pub fn bandwidth(&self) -> Option<u64> {
        self.attribute("BANDWIDTH")?.parse().ok()
    }
}

/// Variants keyed by URL. A repeated URL overwrites the earlier attributes in
/// place, so iteration order is first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSet(Vec<VariantDescriptor>);

impl VariantSet {
    pub fn insert(&mut self, url: String, attributes: String) {
        match self.0.iter_mut().find(|v| v.url == url) {
            Some(existing) => existing.attributes = attributes,
            None => self.0.push(VariantDescriptor { url, attributes }),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariantDescriptor> {
        self.0.iter()
    }

    pub fn get(&self, url: &str) -> Option<&VariantDescriptor> {
        self.0.iter().find(|v| v.url == url)
    }

    /// Variant at `index` in presentation order.
    pub fn nth(&self, index: usize) -> Option<&VariantDescriptor> {
        self.0.get(index)
    }

    /// Variant with the highest declared bandwidth; variants without one rank lowest.
    pub fn highest_bandwidth(&self) -> Option<&VariantDescriptor> {
        self.0.iter().max_by_key(|v| v.bandwidth().unwrap_or(0))
    }
}

/// Extracts variant streams: each `#EXT-X-STREAM-INF:` line is paired with the
/// next non-empty line, resolved against `base`.
pub fn parse_master_playlist(text: &str, base: &Url) -> VariantSet {
    let mut variants = VariantSet::default();
    let mut pending: Option<&str> = None;
    for line in text.lines() {
        let line = line.trim();
        if let Some(attrs) = pending {
            if !line.is_empty() {
                variants.insert(resolve(base, line), attrs.to_string());
                pending = None;
            }
        } else if let Some(attrs) = line.strip_prefix(STREAM_INF_TAG) {
            pending = Some(attrs);
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\"
low/index.m3u8

#EXT-X-STREAM-INF:BANDWIDTH=2400000,RESOLUTION=1280x720

/hd/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=5000000
https://other.cdn/fhd.m3u8
";

    fn base() -> Url {
        Url::parse("https://cdn.example.com/videos/master.m3u8").unwrap()
    }

    #[test]
    fn extracts_variants_with_attributes() {
        let v = parse_master_playlist(MASTER, &base());
        assert_eq!(v.len(), 3);
        let low = v.get("https://cdn.example.com/videos/low/index.m3u8").unwrap();
        assert_eq!(
            low.attributes,
            "BANDWIDTH=800000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\""
        );
        assert_eq!(low.attribute("CODECS"), Some("avc1.4d401e,mp4a.40.2"));
        assert!(v.get("https://cdn.example.com/hd/index.m3u8").is_some());
        assert!(v.get("https://other.cdn/fhd.m3u8").is_some());
    }

    #[test]
    fn duplicate_url_last_write_wins() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=1\na.m3u8\n#EXT-X-STREAM-INF:BANDWIDTH=2\na.m3u8\n";
        let v = parse_master_playlist(text, &base());
        assert_eq!(v.len(), 1);
        assert_eq!(v.nth(0).unwrap().bandwidth(), Some(2));
    }

    #[test]
    fn highest_bandwidth_pick() {
        let v = parse_master_playlist(MASTER, &base());
        assert_eq!(v.highest_bandwidth().unwrap().url, "https://other.cdn/fhd.m3u8");
    }

    #[test]
    fn media_playlist_has_no_variants() {
        let text = "#EXTM3U\n#EXTINF:4,\na.ts\n";
        assert!(parse_master_playlist(text, &base()).is_empty());
    }
}
