//! # eventfuse Kafka
//!
//! Message-sink boundary: a sink trait the pipeline publishes through, a
//! Kafka producer implementation, and the batch publisher with
//! partial-failure accounting.

pub mod producer;
pub mod publisher;
pub mod sink;

pub use producer::KafkaSink;
pub use publisher::{publish_in_batches, PublishSummary};
pub use sink::{MessageSink, SinkError};
