use crate::error::RelayResult;
use crate::io_struct::{AggregatedResult, Chunk};
use futures::{Stream, TryStreamExt};

/// Running concatenation of chunk `response` fragments.
#[derive(Debug, Default)]
pub struct Aggregator {
    text: String,
    chunks: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &Chunk) {
        self.chunks += 1;
        if let Some(fragment) = &chunk.response {
            self.text.push_str(fragment);
        }
    }

    /// Number of chunks seen, including those without a `response`.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn finish(self) -> AggregatedResult {
        AggregatedResult { result: self.text }
    }
}

/// Fold a chunk stream into its concatenated text.
///
/// The first error from the stream is returned as is and whatever was collected so far is
/// dropped along with the stream.
pub async fn aggregate<S>(chunks: S) -> RelayResult<AggregatedResult>
where
    S: Stream<Item = RelayResult<Chunk>>,
{
    let aggregator = chunks
        .try_fold(Aggregator::new(), |mut agg, chunk| async move {
            agg.push(&chunk);
            Ok(agg)
        })
        .await?;
    log::debug!("Aggregated {} upstream chunks", aggregator.chunk_count());
    Ok(aggregator.finish())
}
