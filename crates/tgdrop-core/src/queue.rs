//! Download queue: FIFO buffer plus a single-worker scheduler.
//!
//! At most one request is in flight process-wide. The worker is an explicit
//! drain loop; every per-item outcome (saved, rejected, failed) falls
//! through to the same inter-item pause and re-check, so one bad item can
//! never strand the items behind it.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::fetch::{FetchError, Fetcher};
use crate::reply;
use crate::request::{DownloadRequest, Source};
use crate::transport::{LinkResolver, Notifier};
use crate::validate::{self, Limits};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Idle,
    Draining,
}

struct QueueState {
    pending: VecDeque<DownloadRequest>,
    worker: WorkerState,
}

struct Shared {
    state: Mutex<QueueState>,
    fetcher: Arc<dyn Fetcher>,
    notifier: Arc<dyn Notifier>,
    resolver: Arc<dyn LinkResolver>,
    limits: Limits,
    base_path: PathBuf,
    delay: Duration,
}

/// Handle to the queue. Cheap to clone; all clones share one buffer and one
/// worker.
#[derive(Clone)]
pub struct DownloadQueue {
    shared: Arc<Shared>,
}

impl DownloadQueue {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        notifier: Arc<dyn Notifier>,
        resolver: Arc<dyn LinkResolver>,
        limits: Limits,
        base_path: PathBuf,
        delay: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState {
                    pending: VecDeque::new(),
                    worker: WorkerState::Idle,
                }),
                fetcher,
                notifier,
                resolver,
                limits,
                base_path,
                delay,
            }),
        }
    }

    /// Appends one request; starts the worker if it was idle. Must be called
    /// from within a tokio runtime.
    pub fn enqueue(&self, request: DownloadRequest) {
        self.enqueue_all(vec![request]);
    }

    /// Appends a batch in order, starting the worker at most once. Insertion
    /// order is processing order.
    pub fn enqueue_all(&self, requests: Vec<DownloadRequest>) {
        if requests.is_empty() {
            return;
        }
        let spawn_worker = {
            let mut state = self.shared.state.lock().unwrap();
            state.pending.extend(requests);
            if state.worker == WorkerState::Idle {
                state.worker = WorkerState::Draining;
                true
            } else {
                false
            }
        };
        if spawn_worker {
            tokio::spawn(drain(Arc::clone(&self.shared)));
        }
    }

    /// True when nothing is buffered and nothing is in flight.
    pub fn is_idle(&self) -> bool {
        let state = self.shared.state.lock().unwrap();
        state.worker == WorkerState::Idle && state.pending.is_empty()
    }

    /// Number of buffered (not yet started) requests.
    pub fn pending_len(&self) -> usize {
        self.shared.state.lock().unwrap().pending.len()
    }
}

/// Worker loop. Popping the head and settling back to Idle happen under the
/// same lock as `enqueue_all`'s state check, so exactly one worker exists
/// whenever the queue is non-empty.
async fn drain(shared: Arc<Shared>) {
    loop {
        let (request, remaining) = {
            let mut state = shared.state.lock().unwrap();
            match state.pending.pop_front() {
                Some(request) => {
                    let remaining = state.pending.len();
                    (request, remaining)
                }
                None => {
                    state.worker = WorkerState::Idle;
                    return;
                }
            }
        };

        process_one(&shared, request, remaining).await;

        // Courtesy pause before touching the remote host or the chat
        // transport again.
        if !shared.delay.is_zero() {
            tokio::time::sleep(shared.delay).await;
        }
    }
}

/// Handles one request end to end. Infallible by design: rejection,
/// resolution failure, and fetch failure each end in a user notification
/// and a normal return, never an early exit out of the drain loop.
async fn process_one(shared: &Shared, request: DownloadRequest, remaining: usize) {
    let filename = request.source.local_filename();
    let chat = request.origin_chat;

    notify(shared, chat, &reply::download_started(&filename, remaining)).await;

    if let Err(rejection) =
        validate::validate_request(&filename, request.source.declared_size(), &shared.limits)
    {
        tracing::info!(%filename, %rejection, "request rejected before fetch");
        notify(shared, chat, &rejection.to_string()).await;
        return;
    }

    let url = match &request.source {
        Source::Url(url) => url.clone(),
        Source::Attachment { file_id, .. } => match shared.resolver.resolve(file_id).await {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(%file_id, error = %err, "attachment link resolution failed");
                notify(shared, chat, reply::LINK_RESOLVE_FAILED).await;
                return;
            }
        },
    };

    let dir = shared.base_path.join(&request.folder);
    if let Err(err) = tokio::fs::create_dir_all(&dir).await {
        tracing::warn!(dir = %dir.display(), error = %err, "cannot create destination folder");
        notify(shared, chat, reply::download_failed(&FetchError::Write(err))).await;
        return;
    }
    let dest = dir.join(format!("{}_{}", timestamp(), filename));

    match shared.fetcher.fetch(&url, &dest).await {
        Ok(written) => {
            tracing::info!(dest = %dest.display(), written, "download saved");
            notify(shared, chat, &reply::download_saved(&filename)).await;
        }
        Err(err) => {
            tracing::warn!(%url, error = %err, "download failed");
            notify(shared, chat, reply::download_failed(&err)).await;
        }
    }
}

async fn notify(shared: &Shared, chat: i64, text: &str) {
    if let Err(err) = shared.notifier.send_text(chat, text).await {
        tracing::warn!(chat, error = %err, "failed to deliver status reply");
    }
}

/// Timestamp prefix for saved files, e.g. `2026-8-23-14-5-9`. Makes name
/// collisions astronomically unlikely without any locking.
fn timestamp() -> String {
    chrono::Local::now().format("%Y-%-m-%-d-%-H-%-M-%-S").to_string()
}
