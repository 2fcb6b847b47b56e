//! Intake classifier: turns one inbound chat message into queue work or a
//! control action.

use std::sync::RwLock;

use crate::config::TgdropConfig;
use crate::request::{DownloadRequest, Source};

/// Which transport slot the attachment arrived in. Photo is already the
/// highest-resolution variant; the adapter picks it before handing over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Document,
    Audio,
    Video,
    Voice,
    Photo,
}

/// A chat attachment, projected to the fields the pipeline needs.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub file_id: String,
    pub declared_name: Option<String>,
    pub declared_size: Option<u64>,
}

/// One inbound chat message, as the transport adapter hands it over.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat: i64,
    pub username: Option<String>,
    pub text: Option<String>,
    pub attachment: Option<Attachment>,
}

/// What one message classified to. `Submission` requests are already
/// stamped with the folder active at classification time.
#[derive(Debug, Clone)]
pub enum Classification {
    /// Sender not allow-listed; fixed rejection reply, nothing enqueued.
    Unauthorized,
    /// Message text named a configured folder; Active Folder was updated.
    FolderSwitch(String),
    /// The start command; reply with a welcome and the folder keyboard.
    Greeting,
    /// One or more download requests, ready to enqueue.
    Submission(Vec<DownloadRequest>),
    /// Nothing recognizable; generic "send a file or link" reply.
    Rejected,
}

const START_COMMAND: &str = "/start";

/// Classifier state: the allow-list, the folder names, and the process-wide
/// Active Folder (last-write-wins, snapshotted into each request).
pub struct Intake {
    allowed_usernames: Vec<String>,
    folders: Vec<String>,
    active_folder: RwLock<String>,
}

impl Intake {
    pub fn new(cfg: &TgdropConfig) -> Self {
        Self {
            allowed_usernames: cfg.allowed_usernames.clone(),
            folders: cfg.folders.clone(),
            active_folder: RwLock::new(cfg.default_folder.clone()),
        }
    }

    /// Folder new requests are currently stamped with.
    pub fn active_folder(&self) -> String {
        self.active_folder.read().unwrap().clone()
    }

    /// Folder names a user can switch between.
    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    /// Classifies one message. A `FolderSwitch` updates the Active Folder as
    /// a side effect; every other outcome leaves shared state untouched.
    pub fn classify(&self, msg: &InboundMessage) -> Classification {
        if !self.is_authorized(msg.username.as_deref()) {
            return Classification::Unauthorized;
        }

        if let Some(attachment) = &msg.attachment {
            let request = DownloadRequest {
                source: Source::Attachment {
                    file_id: attachment.file_id.clone(),
                    declared_name: attachment.declared_name.clone(),
                    declared_size: attachment.declared_size,
                },
                origin_chat: msg.chat,
                folder: self.active_folder(),
            };
            return Classification::Submission(vec![request]);
        }

        let Some(text) = msg.text.as_deref() else {
            return Classification::Rejected;
        };

        if self.folders.iter().any(|f| f == text) {
            *self.active_folder.write().unwrap() = text.to_string();
            return Classification::FolderSwitch(text.to_string());
        }

        if text == START_COMMAND {
            return Classification::Greeting;
        }

        // Comma-separated link batch; all tokens must look like URLs or the
        // whole submission is rejected with nothing enqueued.
        let tokens: Vec<&str> = text.split(',').map(str::trim).collect();
        if !tokens.is_empty() && tokens.iter().all(|t| is_url_shaped(t)) {
            let folder = self.active_folder();
            let requests = tokens
                .into_iter()
                .map(|token| DownloadRequest {
                    source: Source::Url(token.to_string()),
                    origin_chat: msg.chat,
                    folder: folder.clone(),
                })
                .collect();
            return Classification::Submission(requests);
        }

        Classification::Rejected
    }

    fn is_authorized(&self, username: Option<&str>) -> bool {
        match username {
            Some(name) => self.allowed_usernames.iter().any(|u| u == name),
            None => false,
        }
    }
}

/// Shape test for a link token: `ftp|http|https` scheme followed by a
/// non-empty, whitespace-free authority. Anything stricter is left to the
/// fetcher.
fn is_url_shaped(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    for scheme in ["http://", "https://", "ftp://"] {
        if lower.starts_with(scheme) {
            let rest = &token[scheme.len()..];
            return !rest.is_empty() && !rest.chars().any(char::is_whitespace);
        }
    }
    false
}
