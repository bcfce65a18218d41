//! Batch publishing with partial-failure accounting.

use serde::Serialize;
use tracing::{info, warn};

use crate::sink::{MessageSink, SinkError};

/// Outcome of one publishing run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PublishSummary {
    pub total: usize,
    pub published: usize,
    pub failed: usize,
}

/// Partition `items` into contiguous fixed-size chunks (the last may be
/// shorter) and hand each to the sink in order, keyed `batch_N` with N
/// increasing from 1. A failed chunk is counted and logged; processing
/// continues with the next chunk.
pub async fn publish_in_batches<T, S>(
    sink: &S,
    topic: &str,
    items: &[T],
    batch_size: usize,
) -> Result<PublishSummary, SinkError>
where
    T: Serialize,
    S: MessageSink + ?Sized,
{
    if batch_size == 0 {
        return Err(SinkError::InvalidBatchSize(batch_size));
    }

    let mut summary = PublishSummary {
        total: items.len(),
        ..Default::default()
    };

    for (index, chunk) in items.chunks(batch_size).enumerate() {
        let batch_number = index + 1;
        let key = format!("batch_{batch_number}");

        let batch: Vec<serde_json::Value> = chunk
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;

        match sink.deliver(topic, &key, &batch).await {
            Ok(()) => {
                summary.published += chunk.len();
                info!(batch = batch_number, size = chunk.len(), topic, "Published batch");
            }
            Err(err) => {
                summary.failed += chunk.len();
                warn!(batch = batch_number, error = %err, topic, "Failed to publish batch");
            }
        }
    }

    info!(
        total = summary.total,
        published = summary.published,
        failed = summary.failed,
        topic,
        "Publishing complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records delivered batches; fails any whose key is in `fail_keys`.
    #[derive(Default)]
    struct MemorySink {
        fail_keys: Vec<String>,
        delivered: Mutex<Vec<(String, String, usize)>>,
    }

    #[async_trait]
    impl MessageSink for MemorySink {
        async fn deliver(
            &self,
            topic: &str,
            key: &str,
            batch: &[serde_json::Value],
        ) -> Result<(), SinkError> {
            if self.fail_keys.iter().any(|k| k == key) {
                return Err(SinkError::Rejected(format!("{key} refused")));
            }
            self.delivered
                .lock()
                .unwrap()
                .push((topic.to_string(), key.to_string(), batch.len()));
            Ok(())
        }
    }

    fn items(n: usize) -> Vec<u32> {
        (0..n as u32).collect()
    }

    #[tokio::test]
    async fn test_chunks_are_contiguous_and_last_is_shorter() {
        let sink = MemorySink::default();
        let summary = publish_in_batches(&sink, "events", &items(7), 3).await.unwrap();

        assert_eq!(summary.total, 7);
        assert_eq!(summary.published, 7);
        assert_eq!(summary.failed, 0);

        let delivered = sink.delivered.lock().unwrap();
        let sizes: Vec<usize> = delivered.iter().map(|(_, _, n)| *n).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        let keys: Vec<&str> = delivered.iter().map(|(_, k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["batch_1", "batch_2", "batch_3"]);
    }

    #[tokio::test]
    async fn test_failed_chunk_does_not_halt_the_rest() {
        let sink = MemorySink {
            fail_keys: vec!["batch_2".to_string()],
            ..Default::default()
        };
        let summary = publish_in_batches(&sink, "events", &items(9), 3).await.unwrap();

        assert_eq!(summary.total, 9);
        assert_eq!(summary.published, 6);
        assert_eq!(summary.failed, 3);
        // chunks after the failure were still delivered
        let delivered = sink.delivered.lock().unwrap();
        assert!(delivered.iter().any(|(_, k, _)| k == "batch_3"));
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_rejected() {
        let sink = MemorySink::default();
        let result = publish_in_batches(&sink, "events", &items(3), 0).await;
        assert!(matches!(result, Err(SinkError::InvalidBatchSize(0))));
    }

    #[tokio::test]
    async fn test_empty_input_publishes_nothing() {
        let sink = MemorySink::default();
        let summary = publish_in_batches(&sink, "events", &items(0), 100).await.unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.published, 0);
        assert!(sink.delivered.lock().unwrap().is_empty());
    }
}
