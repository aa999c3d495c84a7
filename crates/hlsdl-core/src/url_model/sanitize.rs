//! Filesystem-safe filename sanitization.

/// Longest name most filesystems accept (bytes).
const NAME_MAX: usize = 255;

/// Replaces path separators, NUL, control characters and characters Windows
/// refuses (`<>:"|?*`) with `_`, collapses runs of `_`, trims leading and
/// trailing dots, spaces and underscores, and caps the length at 255 bytes.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let bad = c.is_control() || matches!(c, '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*');
        let c = if bad { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
