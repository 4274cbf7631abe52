//! Common test utilities for tdash integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.local/share/tesla-dash/` directory, and `MockBackend`, a
//! one-shot HTTP responder standing in for the dashboard backend.

#![allow(dead_code)]

use assert_cmd::Command;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
pub use tempfile::TempDir;

/// Base URL nothing listens on, so backend commands fail fast.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9/api";

/// A test environment with isolated data storage.
///
/// The `tdash()` method returns a `Command` that sets `TDASH_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an empty data directory.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the tdash binary with isolated data directory.
    pub fn tdash(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tdash"));
        cmd.env("TDASH_DATA_DIR", self.data_dir.path());
        cmd.env("TDASH_BASE_URL", UNREACHABLE_BASE_URL);
        cmd.env_remove("TDASH_LOG");
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Contents of state.kdl, or an empty string when it was never written.
    pub fn state_file(&self) -> String {
        std::fs::read_to_string(self.data_path().join("state.kdl")).unwrap_or_default()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse JSON from command output.
pub fn parse_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("Failed to parse JSON output")
}

/// A request captured by [`MockBackend`].
#[derive(Debug)]
pub struct CapturedRequest {
    /// e.g. `GET /api/dev/stats HTTP/1.1`
    pub request_line: String,
    /// Header lines, lowercased names
    pub headers: Vec<(String, String)>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One-shot HTTP server answering a single request with a canned response.
pub struct MockBackend {
    pub base_url: String,
    requests: mpsc::Receiver<CapturedRequest>,
}

impl MockBackend {
    /// Serve one request with `status` and a JSON `body` (empty for no body).
    pub fn respond(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();
        let body = body.to_string();

        thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut headers = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    let name = name.trim().to_lowercase();
                    let value = value.trim().to_string();
                    if name == "content-length" {
                        content_length = value.parse().unwrap_or(0);
                    }
                    headers.push((name, value));
                }
            }
            let mut discard = vec![0u8; content_length];
            reader.read_exact(&mut discard).unwrap();

            let reason = match status {
                200 => "OK",
                204 => "No Content",
                401 => "Unauthorized",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            let _ = tx.send(CapturedRequest {
                request_line: request_line.trim_end().to_string(),
                headers,
            });
        });

        Self {
            base_url: format!("http://127.0.0.1:{}/api", port),
            requests: rx,
        }
    }

    /// The request the server received.
    pub fn request(&self) -> CapturedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("mock backend received no request")
    }

    /// True when no request arrived.
    pub fn was_not_called(&self) -> bool {
        self.requests.recv_timeout(Duration::from_millis(200)).is_err()
    }
}
