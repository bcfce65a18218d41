//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod graph;
pub mod merge;
pub mod run;

/// eventfuse - dataset reconciliation and graph projection
#[derive(Parser)]
#[command(name = "eventfuse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: reconcile, validate, publish to Kafka
    Run(run::RunArgs),

    /// Reconcile the two datasets and write the canonical CSV
    Merge(merge::MergeArgs),

    /// Graph projection commands
    #[command(subcommand)]
    Graph(graph::GraphCommands),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => run::execute(args).await,
            Commands::Merge(args) => merge::execute(args),
            Commands::Graph(cmd) => graph::execute(cmd).await,
        }
    }
}
