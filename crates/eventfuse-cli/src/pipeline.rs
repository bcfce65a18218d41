//! Pipeline composition shared by the CLI commands.
//!
//! Each stage fully materializes its output before the next begins:
//! raw tables -> dated tables -> merged table -> normalized table ->
//! identified table -> validated events.

use std::path::Path;

use anyhow::{Context, Result};

use eventfuse_core::{dates, event, identity, merge, normalize};
use eventfuse_core::{Event, Table, ValidationReport};

/// Load both sources and reconcile them into the canonical merged table.
pub fn build_canonical_table(primary: &Path, secondary: &Path) -> Result<Table> {
    let primary_table = eventfuse_ingest::load_primary_csv(primary)
        .context("Failed to load primary dataset")?;
    let secondary_table = eventfuse_ingest::load_secondary_csv(secondary)
        .context("Failed to load secondary dataset")?;

    let primary_table = dates::attach_primary_dates(&primary_table);
    let secondary_table = dates::attach_secondary_dates(&secondary_table);

    let merged = merge::reconcile(&primary_table, &secondary_table)
        .context("Failed to reconcile datasets")?;
    Ok(normalize::normalize(&merged))
}

/// Run the full pipeline through identity assignment and validation.
pub fn build_events(primary: &Path, secondary: &Path) -> Result<(Table, Vec<Event>, ValidationReport)> {
    let canonical = build_canonical_table(primary, secondary)?;
    let identified = identity::assign_event_ids(&canonical);
    let (events, report) = event::validate_rows(&identified);
    Ok((identified, events, report))
}
