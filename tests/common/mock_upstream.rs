use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, web};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Configuration for mock inference engine behavior
#[derive(Clone, Debug)]
pub struct MockUpstreamConfig {
    /// Status returned by `POST /api/generate`; anything but 200 sends no stream
    pub status: u16,
    /// Raw body pieces, written one per network write
    pub lines: Vec<String>,
    /// Pause before each piece
    pub line_delay_ms: u64,
}

impl MockUpstreamConfig {
    pub fn streaming(lines: Vec<String>) -> Self {
        Self {
            status: 200,
            lines,
            line_delay_ms: 0,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            status,
            lines: Vec::new(),
            line_delay_ms: 0,
        }
    }
}

#[derive(Clone)]
struct MockState {
    config: MockUpstreamConfig,
    received: Arc<Mutex<Vec<Value>>>,
}

/// Mock Ollama server for testing
pub struct MockUpstream {
    url: String,
    received: Arc<Mutex<Vec<Value>>>,
    handle: Option<ServerHandle>,
}

impl MockUpstream {
    /// Bind an ephemeral port and start serving.
    pub async fn start(config: MockUpstreamConfig) -> std::io::Result<Self> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();

        let received = Arc::new(Mutex::new(Vec::new()));
        let state = web::Data::new(MockState {
            config,
            received: received.clone(),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .route("/api/generate", web::post().to(generate_handler))
        })
        .workers(1)
        .listen(listener)?
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        // Wait for the server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            url: format!("http://127.0.0.1:{}", port),
            received,
            handle: Some(handle),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bodies of every generate request received so far.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }

    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop(false).await;
        }
    }
}

async fn generate_handler(body: web::Json<Value>, state: web::Data<MockState>) -> HttpResponse {
    state.received.lock().unwrap().push(body.into_inner());

    let config = &state.config;
    if config.status != 200 {
        let status = StatusCode::from_u16(config.status).unwrap();
        return HttpResponse::build(status).json(json!({"error": "model not found"}));
    }

    let delay = config.line_delay_ms;
    let body = stream::iter(config.lines.clone()).then(move |line| async move {
        if delay > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
        }
        Ok::<_, std::io::Error>(Bytes::from(line))
    });

    HttpResponse::Ok()
        .content_type("application/x-ndjson")
        .streaming(body)
}
