//! `filename` / `filename*` extraction from a Content-Disposition value.

/// Filename named by a Content-Disposition header value, if any.
///
/// `filename*=UTF-8''…` (percent-encoded) wins over plain `filename=`; quoted
/// values have their backslash escapes removed.
pub fn content_disposition_filename(value: &str) -> Option<String> {
    let mut plain = None;
    for param in value.split(';').map(str::trim) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let raw = raw.trim();
        if key.eq_ignore_ascii_case("filename*") {
            let encoded = raw
                .get(..7)
                .filter(|p| p.eq_ignore_ascii_case("utf-8''"))
                .map(|_| &raw[7..]);
            if let Some(name) = encoded.map(percent_decode).filter(|n| !n.is_empty()) {
                return Some(name);
            }
        } else if key.eq_ignore_ascii_case("filename") {
            let name = match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
                Some(quoted) => unescape(quoted),
                None => raw.to_string(),
            };
            if !name.is_empty() {
                plain = Some(name);
            }
        }
    }
    plain
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            c => out.push(c),
        }
    }
    out
}

/// Lenient percent-decoding: malformed escapes are kept literally.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
