use crate::aggregator::aggregate;
use crate::config::RelayConfig;
use crate::error::RelayResult;
use crate::io_struct::{AggregatedResult, GenerateRequest};
use crate::upstream::UpstreamClient;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct RelayState {
    pub upstream: UpstreamClient,
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            upstream: UpstreamClient::new(client, config.upstream_url.clone()),
        })
    }

    /// Forward `req` upstream and wait for the whole stream to be aggregated.
    pub async fn generate(&self, req: &GenerateRequest) -> RelayResult<AggregatedResult> {
        let chunks = self.upstream.stream_generate(req).await?;
        aggregate(chunks).await
    }
}
