//! Pre-fetch validation: extension allow-list and declared-size ceiling.

use thiserror::Error;

/// Why a request was turned away before any bytes were fetched. The message
/// is shown to the submitting user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Files with the .{extension} extension are not allowed. Only {allowed} files are accepted.")]
    Extension { extension: String, allowed: String },
    #[error("The file is too big. Max allowed size is {limit_mib} MiB.")]
    TooLarge { limit_mib: u64 },
}

/// Validation limits, built once from config.
#[derive(Debug, Clone)]
pub struct Limits {
    allowed_extensions: Vec<String>,
    attachment_max_bytes: u64,
}

impl Limits {
    /// `allowed_extensions` are matched case-insensitively.
    pub fn new(allowed_extensions: &[String], attachment_max_bytes: u64) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .iter()
                .map(|e| e.trim().to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            attachment_max_bytes,
        }
    }

    pub fn attachment_max_bytes(&self) -> u64 {
        self.attachment_max_bytes
    }

    fn allowed_list(&self) -> String {
        self.allowed_extensions.join(", ")
    }
}

/// Extension of a (sanitized) filename: the part after the last `.`,
/// lower-cased; empty when there is no dot.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Accepts or rejects a request before any bytes are fetched.
///
/// The size check applies only when a size is declared up front (chat
/// attachments); URL sources pass it by construction since their size is
/// unknown until streaming begins. Never panics; a rejection is a value,
/// not an error path.
pub fn validate_request(
    filename: &str,
    declared_size: Option<u64>,
    limits: &Limits,
) -> Result<(), Rejection> {
    if let Some(size) = declared_size {
        if size > limits.attachment_max_bytes {
            return Err(Rejection::TooLarge {
                limit_mib: limits.attachment_max_bytes / (1024 * 1024),
            });
        }
    }

    let extension = file_extension(filename);
    if !limits.allowed_extensions.contains(&extension) {
        return Err(Rejection::Extension {
            extension,
            allowed: limits.allowed_list(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> Limits {
        Limits::new(&["mp4".into(), "PDF".into()], 20 * 1024 * 1024)
    }

    #[test]
    fn extension_derivation() {
        assert_eq!(file_extension("clip.MP4"), "mp4");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("noext"), "");
    }

    #[test]
    fn accepts_allowed_extension_case_insensitively() {
        assert!(validate_request("clip.MP4", None, &limits()).is_ok());
        assert!(validate_request("notes.pdf", None, &limits()).is_ok());
    }

    #[test]
    fn rejects_disallowed_extension() {
        let err = validate_request("notes.txt", None, &limits()).unwrap_err();
        assert!(matches!(err, Rejection::Extension { ref extension, .. } if extension == "txt"));
    }

    #[test]
    fn rejects_missing_extension() {
        assert!(validate_request("README", None, &limits()).is_err());
    }

    #[test]
    fn rejects_oversized_declared_size() {
        let err = validate_request("clip.mp4", Some(21 * 1024 * 1024), &limits()).unwrap_err();
        assert_eq!(err, Rejection::TooLarge { limit_mib: 20 });
    }

    #[test]
    fn size_check_skipped_when_unknown() {
        assert!(validate_request("clip.mp4", None, &limits()).is_ok());
        assert!(validate_request("clip.mp4", Some(20 * 1024 * 1024), &limits()).is_ok());
    }

    #[test]
    fn rejection_messages_are_user_displayable() {
        let err = validate_request("notes.txt", None, &limits()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Files with the .txt extension are not allowed. Only mp4, pdf files are accepted."
        );
    }
}
