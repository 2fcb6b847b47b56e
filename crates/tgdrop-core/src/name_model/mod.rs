//! Filename derivation for queued downloads.
//!
//! Derives safe local filenames from a URL path or a chat-declared
//! attachment name, restricted to `[A-Za-z0-9.-]`.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Default filename when a source yields nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe filename for saving a URL download.
///
/// Uses the last path segment of `url` (percent-decoded), sanitized. Falls
/// back to `"download.bin"` when the path yields nothing usable.
pub fn derive_url_filename(url: &str) -> String {
    let raw = match filename_from_url_path(url) {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };
    fallback_if_empty(sanitize_filename(&raw))
}

/// Derives a safe filename for a chat attachment.
///
/// Uses the declared name when present, otherwise `file_<id>`. The result
/// is sanitized.
pub fn derive_attachment_filename(declared_name: Option<&str>, file_id: &str) -> String {
    let raw = match declared_name {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => format!("file_{file_id}"),
    };
    fallback_if_empty(sanitize_filename(&raw))
}

fn fallback_if_empty(sanitized: String) -> String {
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
