//! Fetcher integration: streaming to disk against a local HTTP server, and
//! partial-file cleanup on every failure path.

mod common;

use tgdrop_core::fetch::{FetchError, Fetcher, HttpFetcher};

use common::http_server::{self, ServerOptions};

#[tokio::test]
async fn streams_body_to_destination_file() {
    let body: Vec<u8> = (0u8..100).cycle().take(256 * 1024).collect();
    let base = http_server::start(body.clone());
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("payload.bin");

    let written = HttpFetcher::new()
        .fetch(&format!("{base}payload.bin"), &dest)
        .await
        .expect("fetch should succeed");

    assert_eq!(written, body.len() as u64);
    let content = std::fs::read(&dest).unwrap();
    assert_eq!(content, body, "saved bytes must match the served body");
}

#[tokio::test]
async fn error_status_reports_http_failure_and_creates_nothing() {
    let base = http_server::start_with_options(
        b"irrelevant".to_vec(),
        ServerOptions {
            status: 404,
            ..ServerOptions::default()
        },
    );
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("missing.bin");

    let err = HttpFetcher::new()
        .fetch(&format!("{base}missing.bin"), &dest)
        .await
        .expect_err("404 must fail");

    assert!(matches!(err, FetchError::Http(404)));
    assert!(!dest.exists(), "no file may be created for an error status");
}

#[tokio::test]
async fn truncated_transfer_removes_partial_file() {
    let body: Vec<u8> = (0u8..100).cycle().take(128 * 1024).collect();
    let base = http_server::start_with_options(
        body,
        ServerOptions {
            truncate_body: true,
            ..ServerOptions::default()
        },
    );
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("partial.bin");

    let err = HttpFetcher::new()
        .fetch(&format!("{base}partial.bin"), &dest)
        .await
        .expect_err("truncated body must fail");

    assert!(matches!(err, FetchError::Transport(_)));
    assert!(!dest.exists(), "partial file must be cleaned up");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("never.bin");

    // Port 9 (discard) on localhost is assumed closed.
    let err = HttpFetcher::new()
        .fetch("http://127.0.0.1:9/never.bin", &dest)
        .await
        .expect_err("connection refused must fail");

    assert!(matches!(err, FetchError::Transport(_)));
    assert!(!dest.exists());
}
