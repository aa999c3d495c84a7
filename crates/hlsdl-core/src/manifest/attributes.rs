//! Attribute-list lookup for tag payloads such as `#EXT-X-STREAM-INF`.

/// Returns the value of attribute `name` in an HLS attribute list
/// (`KEY=VALUE,KEY="quoted,value"`). Quotes around the value are stripped.
pub fn attribute<'a>(list: &'a str, name: &str) -> Option<&'a str> {
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in list.char_indices().chain(std::iter::once((list.len(), ','))) {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                let item = &list[start..i];
                start = i + 1;
                if let Some((key, value)) = item.split_once('=') {
                    if key.trim() == name {
                        let value = value.trim();
                        return Some(
                            value
                                .strip_prefix('"')
                                .and_then(|v| v.strip_suffix('"'))
                                .unwrap_or(value),
                        );
                    }
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_quoted() {
        let list = "BANDWIDTH=1280000,CODECS=\"avc1.4d401f,mp4a.40.2\",RESOLUTION=1280x720";
        assert_eq!(attribute(list, "BANDWIDTH"), Some("1280000"));
        assert_eq!(attribute(list, "CODECS"), Some("avc1.4d401f,mp4a.40.2"));
        assert_eq!(attribute(list, "RESOLUTION"), Some("1280x720"));
        assert_eq!(attribute(list, "FRAME-RATE"), None);
    }

    #[test]
    fn empty_list() {
        assert_eq!(attribute("", "BANDWIDTH"), None);
    }
}
