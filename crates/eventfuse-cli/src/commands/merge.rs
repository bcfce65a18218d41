//! Reconcile-only command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::pipeline;

#[derive(Args)]
pub struct MergeArgs {
    /// Primary dataset CSV
    #[arg(long)]
    pub primary: PathBuf,

    /// Secondary dataset CSV
    #[arg(long)]
    pub secondary: PathBuf,

    /// Output path for the canonical merged CSV
    #[arg(long, default_value = "merged_events.csv")]
    pub output: PathBuf,
}

pub fn execute(args: MergeArgs) -> Result<()> {
    let canonical = pipeline::build_canonical_table(&args.primary, &args.secondary)?;

    eventfuse_ingest::save_table(&canonical, &args.output)
        .context("Failed to save merged CSV")?;

    println!(
        "{} {} records written to {}",
        "Merge complete:".green().bold(),
        canonical.len(),
        args.output.display().to_string().cyan()
    );
    Ok(())
}
