//! The unit of work handed to the download queue.

use crate::name_model;

/// Where the bytes of a queued download come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A remote URL submitted as message text.
    Url(String),
    /// A chat attachment; the id is resolved to a fetchable link at
    /// processing time. Size and name are what the transport declared,
    /// when it declared them.
    Attachment {
        file_id: String,
        declared_name: Option<String>,
        declared_size: Option<u64>,
    },
}

impl Source {
    /// Size known before any bytes are fetched, if any. URLs have none.
    pub fn declared_size(&self) -> Option<u64> {
        match self {
            Source::Url(_) => None,
            Source::Attachment { declared_size, .. } => *declared_size,
        }
    }

    /// Sanitized filename this source will be saved under (before the
    /// timestamp prefix is added).
    pub fn local_filename(&self) -> String {
        match self {
            Source::Url(url) => name_model::derive_url_filename(url),
            Source::Attachment {
                file_id,
                declared_name,
                ..
            } => name_model::derive_attachment_filename(declared_name.as_deref(), file_id),
        }
    }
}

/// One queued download. Created by the intake classifier, consumed exactly
/// once by the queue worker, then dropped. Success or failure, it is never
/// retried.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub source: Source,
    /// Chat that submitted the request; used only for reply routing.
    pub origin_chat: i64,
    /// Destination subfolder, captured when the request was created. A later
    /// folder switch must not move already-queued items.
    pub folder: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_source_has_no_declared_size() {
        let s = Source::Url("https://example.com/clip.mp4".into());
        assert_eq!(s.declared_size(), None);
        assert_eq!(s.local_filename(), "clip.mp4");
    }

    #[test]
    fn attachment_source_projects_declared_fields() {
        let s = Source::Attachment {
            file_id: "AgAD".into(),
            declared_name: Some("notes final.pdf".into()),
            declared_size: Some(1024),
        };
        assert_eq!(s.declared_size(), Some(1024));
        assert_eq!(s.local_filename(), "notes-final.pdf");
    }
}
