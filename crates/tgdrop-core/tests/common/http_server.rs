//! Minimal HTTP/1.1 server for fetcher tests: serves one static body on any
//! GET path, with switches for error status and mid-body truncation.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    /// Status line to answer with; anything non-2xx makes the fetcher bail
    /// before creating the destination file.
    pub status: u16,
    /// If true, advertise the full Content-Length but send only half the
    /// body before closing, simulating a dropped connection.
    pub truncate_body: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            truncate_body: false,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the base
/// URL (e.g. `http://127.0.0.1:12345/`). Runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, ServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, &body, opts));
        }
    });
    format!("http://127.0.0.1:{port}/")
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: ServerOptions) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    // Drain the request head; the path is irrelevant.
    let mut buf = [0u8; 8192];
    if matches!(stream.read(&mut buf), Ok(0) | Err(_)) {
        return;
    }

    if opts.status < 200 || opts.status >= 300 {
        let response = format!(
            "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            opts.status
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let header = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let sent = if opts.truncate_body {
        &body[..body.len() / 2]
    } else {
        body
    };
    let _ = stream.write_all(sent);
    let _ = stream.flush();
}
