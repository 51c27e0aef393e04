// These modules are used by several test binaries
#![allow(dead_code)]

pub mod mock_upstream;

use ollama_relay_rs::config::RelayConfig;
use ollama_relay_rs::relay_state::RelayState;
use serde_json::Value;

/// Relay state pointed at `upstream_url`, with bounded timeouts so a broken test cannot hang.
pub fn create_relay_state(upstream_url: &str) -> RelayState {
    let config = RelayConfig {
        upstream_url: upstream_url.to_string(),
        request_timeout_secs: Some(10),
        connect_timeout_secs: Some(2),
        ..Default::default()
    };
    RelayState::new(&config).expect("Failed to create RelayState in test")
}

/// Render chunks as the newline-terminated lines an Ollama server would stream.
pub fn ndjson_lines(chunks: &[Value]) -> Vec<String> {
    chunks.iter().map(|c| format!("{}\n", c)).collect()
}

/// An address nothing is listening on.
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
