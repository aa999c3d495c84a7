//! Filename hint from a URL path.

/// Last path segment of `url`, ignoring query and fragment.
///
/// Returns `None` when the URL does not parse or its path has no usable segment.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    match segment {
        "." | ".." => None,
        s => Some(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_segment() {
        assert_eq!(
            filename_from_url_path("https://example.com/media/clip.mp4").as_deref(),
            Some("clip.mp4")
        );
        assert_eq!(
            filename_from_url_path("https://example.com/dir/").as_deref(),
            Some("dir")
        );
    }

    #[test]
    fn root_or_garbage() {
        assert_eq!(filename_from_url_path("https://example.com/"), None);
        assert_eq!(filename_from_url_path("not a url"), None);
    }

    #[test]
    fn query_ignored() {
        assert_eq!(
            filename_from_url_path("https://example.com/v.webm?range=0-").as_deref(),
            Some("v.webm")
        );
    }
}
