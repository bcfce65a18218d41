//! The message-sink boundary.

use async_trait::async_trait;

/// Errors at the sink boundary. Delivery failures are caught and counted
/// by the publisher, never propagated past it.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Kafka producer error: {0}")]
    Producer(#[from] rdkafka::error::KafkaError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Batch size must be positive, got {0}")]
    InvalidBatchSize(usize),

    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// An external sink accepting `(topic, key, value)` where the value is an
/// ordered batch of serialized records.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(
        &self,
        topic: &str,
        key: &str,
        batch: &[serde_json::Value],
    ) -> Result<(), SinkError>;
}
