//! Terminal output formatting.

use colored::Colorize;

use eventfuse_core::ValidationReport;
use eventfuse_graph::ProjectionStats;
use eventfuse_kafka::PublishSummary;

/// Print the validation counts for a pipeline run.
pub fn print_validation_summary(report: &ValidationReport) {
    println!("{}", "Validation Summary".bold());
    println!("  Total records:  {}", report.total.to_string().cyan());
    println!("  Validated:      {}", report.accepted.to_string().green());
    let skipped = report.skipped.to_string();
    println!(
        "  Skipped:        {}",
        if report.skipped > 0 { skipped.yellow() } else { skipped.dimmed() }
    );
}

/// Print a publishing summary.
pub fn print_publish_summary(label: &str, summary: &PublishSummary) {
    println!("{} {}", label.bold(), "publishing summary".bold());
    println!("  Total:      {}", summary.total.to_string().cyan());
    println!("  Published:  {}", summary.published.to_string().green());
    let failed = summary.failed.to_string();
    println!(
        "  Failed:     {}",
        if summary.failed > 0 { failed.red() } else { failed.dimmed() }
    );
}

/// Print the projection counts.
pub fn print_projection_stats(stats: &ProjectionStats) {
    println!("{}", "Graph Projection".bold());
    println!("  Unique entities: {}", stats.entities.to_string().cyan());
    println!("  Events:          {}", stats.events.to_string().cyan());
    println!("  Relationships:   {}", stats.relationships.to_string().cyan());
}
