// Common test utilities shared across test files

use reqforge::Variables;
use std::io::Write;
use std::net::SocketAddr;

/// Build template variables from a json object
#[allow(dead_code)]
pub fn vars(value: serde_json::Value) -> Variables {
    reqforge::variables(value)
}

/// Write a yaml manifest to a temporary file
#[allow(dead_code)]
pub fn write_manifest(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write manifest");
    file
}

/// Serve a router on an ephemeral loopback port
#[allow(dead_code)]
pub async fn spawn_server(router: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server failed");
    });
    addr
}
