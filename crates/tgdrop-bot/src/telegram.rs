//! Telegram adapters for the core's transport interfaces.

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, Message};

use tgdrop_core::intake::{Attachment, AttachmentKind, InboundMessage};
use tgdrop_core::transport::{LinkResolver, Notifier};

/// Sends status replies through the Bot API.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, chat: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat), text)
            .await
            .context("sendMessage failed")?;
        Ok(())
    }

    async fn send_text_with_keyboard(
        &self,
        chat: i64,
        text: &str,
        keyboard_rows: &[Vec<String>],
    ) -> Result<()> {
        let markup = keyboard_markup(keyboard_rows);
        self.bot
            .send_message(ChatId(chat), text)
            .reply_markup(markup)
            .await
            .context("sendMessage with keyboard failed")?;
        Ok(())
    }
}

/// Turns an attachment's file id into a direct download URL via `getFile`.
pub struct TelegramLinkResolver {
    bot: Bot,
    bot_token: String,
}

impl TelegramLinkResolver {
    pub fn new(bot: Bot, bot_token: String) -> Self {
        Self { bot, bot_token }
    }
}

#[async_trait]
impl LinkResolver for TelegramLinkResolver {
    async fn resolve(&self, file_id: &str) -> Result<String> {
        let file = self
            .bot
            .get_file(file_id.to_string())
            .await
            .context("getFile failed")?;
        Ok(format!(
            "https://api.telegram.org/file/bot{}/{}",
            self.bot_token, file.path
        ))
    }
}

/// Builds a resized reply keyboard from rows of button labels.
fn keyboard_markup(keyboard_rows: &[Vec<String>]) -> KeyboardMarkup {
    let rows = keyboard_rows.iter().map(|row| {
        row.iter()
            .map(|name| KeyboardButton::new(name.clone()))
            .collect::<Vec<_>>()
    });
    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Maps a Telegram message onto the core's inbound shape. Probes the
/// attachment slots in priority order; for photos the last array entry is
/// the highest-resolution variant.
pub fn inbound_from_message(msg: &Message) -> InboundMessage {
    let attachment = if let Some(doc) = msg.document() {
        Some(Attachment {
            kind: AttachmentKind::Document,
            file_id: doc.file.id.clone(),
            declared_name: doc.file_name.clone(),
            declared_size: Some(doc.file.size as u64),
        })
    } else if let Some(audio) = msg.audio() {
        Some(Attachment {
            kind: AttachmentKind::Audio,
            file_id: audio.file.id.clone(),
            declared_name: audio.file_name.clone(),
            declared_size: Some(audio.file.size as u64),
        })
    } else if let Some(video) = msg.video() {
        Some(Attachment {
            kind: AttachmentKind::Video,
            file_id: video.file.id.clone(),
            declared_name: video.file_name.clone(),
            declared_size: Some(video.file.size as u64),
        })
    } else if let Some(voice) = msg.voice() {
        Some(Attachment {
            kind: AttachmentKind::Voice,
            file_id: voice.file.id.clone(),
            declared_name: None,
            declared_size: Some(voice.file.size as u64),
        })
    } else if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        Some(Attachment {
            kind: AttachmentKind::Photo,
            file_id: photo.file.id.clone(),
            declared_name: None,
            declared_size: Some(photo.file.size as u64),
        })
    } else {
        None
    };

    InboundMessage {
        chat: msg.chat.id.0,
        username: msg.from.as_ref().and_then(|u| u.username.clone()),
        text: msg.text().map(str::to_string),
        attachment,
    }
}
