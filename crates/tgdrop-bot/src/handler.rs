//! Message handling: classify, reply, enqueue.

use std::sync::Arc;

use teloxide::types::Message;

use tgdrop_core::intake::{Classification, Intake};
use tgdrop_core::queue::DownloadQueue;
use tgdrop_core::reply;
use tgdrop_core::transport::Notifier;

use crate::telegram::inbound_from_message;

pub struct App {
    intake: Intake,
    queue: DownloadQueue,
    notifier: Arc<dyn Notifier>,
}

impl App {
    pub fn new(intake: Intake, queue: DownloadQueue, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            intake,
            queue,
            notifier,
        }
    }

    pub async fn handle_message(&self, msg: Message) {
        let inbound = inbound_from_message(&msg);
        let chat = inbound.chat;

        match self.intake.classify(&inbound) {
            Classification::Unauthorized => {
                tracing::info!(chat, "unauthorized sender");
                self.send(chat, reply::UNAUTHORIZED).await;
            }
            Classification::FolderSwitch(folder) => {
                tracing::info!(chat, %folder, "active folder switched");
                self.send(chat, &reply::folder_switched(&folder)).await;
            }
            Classification::Greeting => {
                let text = reply::welcome(&self.intake.active_folder());
                let rows = folder_keyboard(self.intake.folders());
                if let Err(err) = self
                    .notifier
                    .send_text_with_keyboard(chat, &text, &rows)
                    .await
                {
                    tracing::warn!(chat, error = %err, "failed to send welcome");
                }
            }
            Classification::Submission(requests) => {
                tracing::info!(chat, count = requests.len(), "enqueuing submission");
                self.queue.enqueue_all(requests);
            }
            Classification::Rejected => {
                self.send(chat, reply::SEND_FILE_OR_LINK).await;
            }
        }
    }

    async fn send(&self, chat: i64, text: &str) {
        if let Err(err) = self.notifier.send_text(chat, text).await {
            tracing::warn!(chat, error = %err, "failed to send reply");
        }
    }
}

/// Folder names as reply-keyboard rows, two buttons per row.
fn folder_keyboard(folders: &[String]) -> Vec<Vec<String>> {
    folders.chunks(2).map(|chunk| chunk.to_vec()).collect()
}
