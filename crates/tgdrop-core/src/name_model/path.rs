//! Filename extraction from URL path.

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// The segment is percent-decoded (so `my%20clip.mp4` yields `my clip.mp4`
/// before sanitization). Returns `None` if the URL cannot be parsed or the
/// path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let path = parsed.path();
    let segment = path.split('/').filter(|s| !s.is_empty()).last()?;
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    match percent_decode(segment) {
        Ok(decoded) if !decoded.is_empty() => Some(decoded),
        _ => Some(segment.to_string()),
    }
}

/// Percent-decode a path segment. Malformed escapes are kept literally.
fn percent_decode(input: &str) -> Result<String, std::str::Utf8Error> {
    let mut out = Vec::new();
    let mut bytes = input.as_bytes().iter().cloned();
    while let Some(b) = bytes.next() {
        if b == b'%' {
            let h = bytes.next();
            let l = bytes.next();
            match (h.and_then(hex_digit), l.and_then(hex_digit)) {
                (Some(high), Some(low)) => out.push(high << 4 | low),
                _ => {
                    out.push(b'%');
                    out.extend(h);
                    out.extend(l);
                }
            }
        } else {
            out.push(b);
        }
    }
    std::str::from_utf8(&out).map(|s| s.to_string())
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
