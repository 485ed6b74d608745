//! Spawns the real binary and checks startup, health, and config handling.

use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::sleep;

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a config pointing at temp databases
fn config_with_dbs(port: u16, system_path: &str, library_path: &str) -> String {
    format!(
        r#"
[tmdb]
api_key = "test-key"

[server]
host = "127.0.0.1"
port = {}

[database]
system_path = "{}"
library_path = "{}"
"#,
        port, system_path, library_path
    )
}

/// Spawn the server and return a handle
async fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_cinefile"))
        .env("CINEFILE_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_server_starts_and_serves_health() {
    let port = get_available_port();
    let temp_dir = TempDir::new().unwrap();
    let system_path = temp_dir.path().join("system.db");
    let library_path = temp_dir.path().join("library.db");

    let config_content = config_with_dbs(
        port,
        system_path.to_str().unwrap(),
        library_path.to_str().unwrap(),
    );

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let mut server = spawn_server(temp_file.path()).await;

    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/api/v1/health", port))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let config_response = client
        .get(format!("http://127.0.0.1:{}/api/v1/config", port))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = config_response.json().await.unwrap();
    assert_eq!(body["tmdb"]["api_key_configured"], true);

    // Databases were created on startup.
    assert!(system_path.exists());
    assert!(library_path.exists());

    server.kill().await.ok();
}

#[tokio::test]
async fn test_server_refuses_invalid_config() {
    // Missing TMDB key must abort startup, not limp along.
    let port = get_available_port();
    let config_content = format!(
        r#"
[tmdb]
api_key = ""

[server]
host = "127.0.0.1"
port = {}
"#,
        port
    );

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let mut server = spawn_server(temp_file.path()).await;

    let status = tokio::time::timeout(Duration::from_secs(10), server.wait())
        .await
        .expect("server should exit quickly")
        .unwrap();
    assert!(!status.success());
}
