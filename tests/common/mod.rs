//! Common test utilities for n8ncli integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.n8ncli.json`, plus a minimal canned-response HTTP server
//! for exercising the API commands without a real n8n instance.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated config directory.
///
/// The `n8ncli()` method returns a `Command` that points
/// `N8NCLI_CONFIG_DIR` at a temp directory and strips the `N8N_*`
/// variables per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated config directory.
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the n8ncli binary with isolated configuration.
    pub fn n8ncli(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_n8ncli"));
        cmd.env("N8NCLI_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("N8N_HOST");
        cmd.env_remove("N8N_API_KEY");
        cmd
    }

    /// Path of the config directory.
    pub fn config_path(&self) -> &Path {
        self.config_dir.path()
    }

    /// Path of the persisted config file inside the test environment.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.path().join(".n8ncli.json")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// A one-shot HTTP server serving a fixed sequence of canned responses.
///
/// Binds an ephemeral local port, answers `responses.len()` connections in
/// order, and hands back the request line of each (method, path, version)
/// when joined.
pub struct StubServer {
    pub host: String,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    /// Start a server that answers each connection with the next
    /// `(status, body)` pair.
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let mut request_lines = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 8192];
                let n = stream.read(&mut buf).unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                request_lines.push(request.lines().next().unwrap_or_default().to_string());

                let reason = match status {
                    200 => "OK",
                    204 => "No Content",
                    401 => "Unauthorized",
                    404 => "Not Found",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
            request_lines
        });

        Self {
            host: format!("http://{}", addr),
            handle,
        }
    }

    /// Wait for all responses to be served and return the request lines.
    pub fn finish(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

/// JSON body for a workflow as the n8n API would return it.
pub fn workflow_json(id: &str, name: &str, active: bool) -> String {
    format!(
        r#"{{"id": "{}", "name": "{}", "active": {}, "createdAt": "2025-06-01T09:00:00.000Z", "updatedAt": "2025-07-15T16:30:00.000Z"}}"#,
        id, name, active
    )
}

/// JSON body for a workflow list envelope.
pub fn workflow_list_json(workflows: &[String]) -> String {
    format!(r#"{{"data": [{}]}}"#, workflows.join(", "))
}

/// Parse JSON output from a command.
pub fn parse_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("Failed to parse JSON output")
}
