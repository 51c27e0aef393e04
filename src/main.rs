use clap::Parser;
use ollama_relay_rs::config::{
    DEFAULT_HOST, DEFAULT_MAX_PAYLOAD_SIZE, DEFAULT_PORT, DEFAULT_UPSTREAM_URL, RelayConfig,
};
use ollama_relay_rs::logging::init_logging;
use ollama_relay_rs::relay_state::RelayState;
use ollama_relay_rs::server::startup;

#[derive(Parser, Debug)]
#[command(name = "ollama-relay")]
#[command(about = "Relay that collects an Ollama generate stream into a single JSON response")]
struct CliArgs {
    /// Host address to bind the relay server
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the relay server
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Base URL of the Ollama server
    #[arg(long, default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: String,

    /// Timeout in seconds for a whole upstream generate call (unbounded if unset)
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Timeout in seconds for connecting to the upstream
    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    /// Maximum accepted request body size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD_SIZE)]
    max_payload_size: usize,

    /// Number of HTTP worker threads
    #[arg(long)]
    workers: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: String,
}

impl CliArgs {
    fn to_relay_config(&self) -> RelayConfig {
        RelayConfig {
            host: self.host.clone(),
            port: self.port,
            upstream_url: self.upstream_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            max_payload_size: self.max_payload_size,
            workers: self.workers,
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = args.to_relay_config();
    config.validate()?;

    init_logging(&config.log_level);

    let relay_state = RelayState::new(&config)?;

    actix_web::rt::System::new().block_on(async move {
        tokio::select! {
            res = startup(config, relay_state) => res,
            _ = tokio::signal::ctrl_c() => {
                log::info!("Received Ctrl+C, shutting down");
                Ok(())
            }
        }
    })?;

    Ok(())
}
