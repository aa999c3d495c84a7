//! HLS playlist parsing.
//!
//! Both parsers work line-by-line with one pending tag of lookahead and never
//! fail: a malformed playlist yields an empty result.

mod attributes;
mod master;
mod media;

pub use attributes::attribute;
pub use master::{parse_master_playlist, VariantDescriptor, VariantSet, STREAM_INF_TAG};
pub use media::{parse_media_playlist, SegmentList, SEGMENT_INF_TAG};

use url::Url;

/// Result of classifying a fetched playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestKind {
    /// At least one `#EXT-X-STREAM-INF` entry: the user picks a variant.
    Master(VariantSet),
    /// No variants: the text is itself a media playlist.
    Media(SegmentList),
}

/// Classifies `text` as a master or media playlist.
pub fn classify(text: &str, base: &Url) -> ManifestKind {
    let variants = parse_master_playlist(text, base);
    if variants.is_empty() {
        ManifestKind::Media(parse_media_playlist(text, base))
    } else {
        ManifestKind::Master(variants)
    }
}
