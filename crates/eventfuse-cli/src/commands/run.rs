//! Full pipeline command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use eventfuse_graph::project_events;
use eventfuse_kafka::{publish_in_batches, KafkaSink};

use crate::output;
use crate::pipeline;

#[derive(Args)]
pub struct RunArgs {
    /// Primary dataset CSV
    #[arg(long)]
    pub primary: PathBuf,

    /// Secondary dataset CSV
    #[arg(long)]
    pub secondary: PathBuf,

    /// Topic for validated event batches
    #[arg(long, env = "TERROR_EVENTS")]
    pub events_topic: String,

    /// Topic for graph statement batches
    #[arg(long, env = "NEO4J_ENTITIES")]
    pub graph_topic: String,

    /// Kafka bootstrap servers
    #[arg(long, env = "BOOTSTRAP_SERVERS", default_value = "localhost:9092")]
    pub brokers: String,

    /// Records per published batch
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub batch_size: u32,

    /// Where to save the canonical merged CSV (skipped if not given)
    #[arg(long)]
    pub merged_out: Option<PathBuf>,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let (table, events, report) = pipeline::build_events(&args.primary, &args.secondary)?;
    output::print_validation_summary(&report);

    if let Some(path) = &args.merged_out {
        eventfuse_ingest::save_table(&table, path)
            .context("Failed to save merged CSV")?;
        println!("Merged records written to {}", path.display().to_string().cyan());
    }

    let sink = KafkaSink::connect(&args.brokers)
        .context("Failed to create Kafka producer")?;
    let batch_size = args.batch_size as usize;

    let event_summary = publish_in_batches(&sink, &args.events_topic, &events, batch_size)
        .await
        .context("Failed to publish events")?;
    output::print_publish_summary("Events", &event_summary);

    let projection = project_events(&events).context("Failed to project events")?;
    output::print_projection_stats(&projection.stats);

    let graph_summary =
        publish_in_batches(&sink, &args.graph_topic, &projection.statements, batch_size)
            .await
            .context("Failed to publish graph statements")?;
    output::print_publish_summary("Graph statements", &graph_summary);

    // settle in-flight deliveries before the producer is released
    sink.flush().context("Failed to flush Kafka producer")?;

    Ok(())
}
