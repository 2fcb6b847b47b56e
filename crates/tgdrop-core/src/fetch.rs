//! Stream fetcher: pipes a remote byte stream into a destination file.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Why a fetch failed. Mirrors the worker's error taxonomy: transport
/// problems drop the item, write problems drop the item, neither is fatal
/// to the process.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection or protocol failure while opening or reading the source.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The source answered with a non-success status.
    #[error("HTTP {0}")]
    Http(u16),
    /// Creating, writing, or flushing the destination file failed.
    #[error("write error: {0}")]
    Write(#[from] io::Error),
}

/// One-shot byte transfer from a source URL to a destination path.
///
/// Implementations must report exactly once per call, as the returned
/// `Result`, and must leave no partial file behind on failure. They hold no
/// queue knowledge.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// HTTP(S) fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Streams the response body chunk by chunk; the whole payload is never
    /// held in memory. Success only after the file is flushed and synced.
    async fn stream_to_file(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        // The destination is created only once the source has answered, so
        // a refused connection or error status leaves nothing to clean up.
        let mut file = tokio::fs::File::create(dest).await?;
        let mut response = response;
        let mut written: u64 = 0;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        match self.stream_to_file(url, dest).await {
            Ok(written) => {
                tracing::debug!(url, dest = %dest.display(), written, "fetch complete");
                Ok(written)
            }
            Err(err) => {
                // A half-written file must never survive a failed fetch.
                match tokio::fs::remove_file(dest).await {
                    Ok(()) => tracing::debug!(dest = %dest.display(), "removed partial file"),
                    Err(rm) if rm.kind() == io::ErrorKind::NotFound => {}
                    Err(rm) => {
                        tracing::warn!(dest = %dest.display(), error = %rm, "failed to remove partial file")
                    }
                }
                Err(err)
            }
        }
    }
}
