//! Narrow interfaces to the chat-transport collaborator.
//!
//! The core decides what to say and when; sending it, and turning an
//! attachment id into a fetchable link, belong to the transport adapter.

use anyhow::Result;
use async_trait::async_trait;

/// Sends human-readable status text back to the originating chat.
///
/// Send failures must be handled by the caller as log-and-continue; a dead
/// notifier must never stall the download queue.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, chat: i64, text: &str) -> Result<()>;

    /// Like `send_text`, with a reply-keyboard layout. Adapters that have no
    /// keyboard concept fall back to plain text.
    async fn send_text_with_keyboard(
        &self,
        chat: i64,
        text: &str,
        _keyboard_rows: &[Vec<String>],
    ) -> Result<()> {
        self.send_text(chat, text).await
    }
}

/// Resolves a chat attachment id to a URL the stream fetcher can open.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    async fn resolve(&self, file_id: &str) -> Result<String>;
}
