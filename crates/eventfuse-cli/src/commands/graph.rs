//! Graph projection commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use eventfuse_graph::{project_events, save_script, GraphClient, GraphConfig};

use crate::output;
use crate::pipeline;

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Generate the statement script from the two datasets
    Script {
        /// Primary dataset CSV
        #[arg(long)]
        primary: PathBuf,

        /// Secondary dataset CSV
        #[arg(long)]
        secondary: PathBuf,

        /// Output path for the statement script
        #[arg(long, default_value = "graph_statements.cypher")]
        output: PathBuf,
    },

    /// Generate statements and apply them to Neo4j
    Apply {
        /// Primary dataset CSV
        #[arg(long)]
        primary: PathBuf,

        /// Secondary dataset CSV
        #[arg(long)]
        secondary: PathBuf,
    },

    /// Show graph node/relationship counts
    Status,
}

pub async fn execute(cmd: GraphCommands) -> Result<()> {
    match cmd {
        GraphCommands::Script { primary, secondary, output: out_path } => {
            cmd_script(&primary, &secondary, &out_path)
        }
        GraphCommands::Apply { primary, secondary } => cmd_apply(&primary, &secondary).await,
        GraphCommands::Status => cmd_status().await,
    }
}

fn config_from_env() -> GraphConfig {
    let default = GraphConfig::default();
    GraphConfig {
        uri: std::env::var("NEO4J_URI").unwrap_or(default.uri),
        user: std::env::var("NEO4J_USER").unwrap_or(default.user),
        password: std::env::var("NEO4J_PASSWORD").unwrap_or(default.password),
    }
}

fn cmd_script(primary: &Path, secondary: &Path, out_path: &Path) -> Result<()> {
    let (_, events, report) = pipeline::build_events(primary, secondary)?;
    output::print_validation_summary(&report);

    let projection = project_events(&events).context("Failed to project events")?;
    output::print_projection_stats(&projection.stats);

    save_script(&projection.statements, out_path)?;
    println!(
        "{} {} statements written to {}",
        "Script complete:".green().bold(),
        projection.statements.len(),
        out_path.display().to_string().cyan()
    );
    Ok(())
}

async fn cmd_apply(primary: &Path, secondary: &Path) -> Result<()> {
    let (_, events, report) = pipeline::build_events(primary, secondary)?;
    output::print_validation_summary(&report);

    let projection = project_events(&events).context("Failed to project events")?;
    output::print_projection_stats(&projection.stats);

    let client = GraphClient::connect(&config_from_env()).await?;
    eventfuse_graph::schema::initialize_schema(&client).await?;

    println!("{}", "Applying statements...".bold());
    let applied = client.apply(&projection.statements).await?;
    println!("{} {} statements applied", "Apply complete:".green().bold(), applied);
    Ok(())
}

async fn cmd_status() -> Result<()> {
    let client = GraphClient::connect(&config_from_env()).await?;
    let counts = client.get_counts().await?;

    println!("{}", "Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());
    println!("{}", "─".repeat(40));
    Ok(())
}
