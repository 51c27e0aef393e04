//! Streaming client for the inference engine's `POST /api/generate`.
//!
//! The engine answers with newline-delimited JSON:
//! ```text
//! {"model":"llama3","response":"Hel","done":false}
//! {"model":"llama3","response":"lo","done":true}
//! ```
//! [`UpstreamClient::stream_generate`] returns a [`ChunkStream`] that decodes those lines lazily
//! as bytes arrive. Dropping the stream drops the response body and releases the connection.

use crate::error::{RelayError, RelayResult};
use crate::io_struct::{Chunk, GenerateRequest};
use bytes::{Bytes, BytesMut};
use futures::Stream;
use futures::stream::BoxStream;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

pub const GENERATE_PATH: &str = "/api/generate";

pub type UpstreamChunks = ChunkStream<BoxStream<'static, Result<Bytes, reqwest::Error>>>;

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        UpstreamClient {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_path(&self, api_path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if api_path.starts_with('/') {
            format!("{}{}", base, api_path)
        } else {
            format!("{}/{}", base, api_path)
        }
    }

    /// Send one generate request and hand back the body as a chunk stream.
    ///
    /// Fails before yielding anything when the engine is unreachable or answers with a
    /// status other than 200.
    pub async fn stream_generate(&self, req: &GenerateRequest) -> RelayResult<UpstreamChunks> {
        let url = self.api_path(GENERATE_PATH);
        log::debug!("Forwarding generate request for model {} to {}", req.model, url);

        // `.json()` also sets `Content-Type: application/json`
        let resp = self.client.post(url).json(req).send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(RelayError::UpstreamStatus {
                status_code: status.as_u16(),
            });
        }

        let byte_stream: BoxStream<'static, Result<Bytes, reqwest::Error>> =
            Box::pin(resp.bytes_stream());
        Ok(ChunkStream::new(byte_stream))
    }
}

/// Lazy decoder from an NDJSON byte stream to [`Chunk`]s.
///
/// Lines end at `\n`, `\r\n` or a bare `\r`. Yields one item per non-empty line in arrival
/// order. After the first error the stream is finished and the source is dropped; it is not
/// restartable.
pub struct ChunkStream<S> {
    inner: Option<S>,
    buf: BytesMut,
    // Prefix of `buf` already known to hold no line terminator.
    scanned: usize,
    lines: VecDeque<Bytes>,
}

impl<S> ChunkStream<S> {
    pub fn new(inner: S) -> Self {
        ChunkStream {
            inner: Some(inner),
            buf: BytesMut::new(),
            scanned: 0,
            lines: VecDeque::new(),
        }
    }

    // Move every complete line out of `buf`, dropping terminators and blank lines.
    // A trailing `\r` is held back until the next read unless `eof` is set, since it may be
    // the first half of `\r\n`.
    fn split_lines(&mut self, eof: bool) {
        loop {
            let Some(offset) = self.buf[self.scanned..]
                .iter()
                .position(|b| *b == b'\n' || *b == b'\r')
            else {
                self.scanned = self.buf.len();
                break;
            };
            let pos = self.scanned + offset;

            let terminator = match (self.buf[pos], self.buf.get(pos + 1).copied()) {
                (b'\r', Some(b'\n')) => 2,
                (b'\r', None) if !eof => {
                    self.scanned = pos;
                    break;
                }
                _ => 1,
            };

            let mut line = self.buf.split_to(pos + terminator).freeze();
            line.truncate(pos);
            self.scanned = 0;
            if !line.is_empty() {
                self.lines.push_back(line);
            }
        }

        if eof && !self.buf.is_empty() {
            // A final line without a terminator still counts.
            self.lines.push_back(self.buf.split().freeze());
            self.scanned = 0;
        }
    }

    fn finish(&mut self) {
        self.inner = None;
        self.buf.clear();
        self.scanned = 0;
        self.lines.clear();
    }
}

pub fn decode_line(line: &[u8]) -> RelayResult<Chunk> {
    serde_json::from_slice(line).map_err(RelayError::protocol)
}

impl<S, E> Stream for ChunkStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<RelayError>,
{
    type Item = RelayResult<Chunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(line) = this.lines.pop_front() {
                let decoded = decode_line(&line);
                if decoded.is_err() {
                    this.finish();
                }
                return Poll::Ready(Some(decoded));
            }

            let Some(inner) = this.inner.as_mut() else {
                return Poll::Ready(None);
            };

            match Pin::new(inner).poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buf.extend_from_slice(&bytes);
                    this.split_lines(false);
                }
                Poll::Ready(Some(Err(e))) => {
                    this.finish();
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(None) => {
                    this.inner = None;
                    this.split_lines(true);
                }
            }
        }
    }
}
