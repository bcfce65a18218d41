//! Kafka sink backed by an rdkafka producer.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    producer::{FutureProducer, FutureRecord, Producer},
    util::Timeout,
};
use tracing::info;

use crate::sink::{MessageSink, SinkError};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// A Kafka-backed message sink. The producer is owned by the sink value
/// for the duration of a publishing run and released on drop.
pub struct KafkaSink {
    producer: FutureProducer,
}

impl KafkaSink {
    /// Create a sink connected to the given bootstrap servers.
    pub fn connect(brokers: &str) -> Result<Self, SinkError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .create()?;
        info!(brokers, "Kafka producer created");
        Ok(Self { producer })
    }

    /// Block until all in-flight deliveries settle.
    pub fn flush(&self) -> Result<(), SinkError> {
        self.producer.flush(Timeout::After(SEND_TIMEOUT))?;
        Ok(())
    }
}

#[async_trait]
impl MessageSink for KafkaSink {
    async fn deliver(
        &self,
        topic: &str,
        key: &str,
        batch: &[serde_json::Value],
    ) -> Result<(), SinkError> {
        let payload = serde_json::to_vec(batch)?;
        let record = FutureRecord::to(topic).key(key).payload(&payload);
        self.producer
            .send(record, Timeout::After(SEND_TIMEOUT))
            .await
            .map_err(|(err, _)| SinkError::Producer(err))?;
        Ok(())
    }
}
