//! Validated event records.
//!
//! Maps normalized rows into strongly typed `Event` values. Row-level
//! failures are counted and skipped; they never abort the batch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FuseError, FuseResult};
use crate::identity::EVENT_ID_COLUMN;
use crate::merge::{Provenance, DATA_SOURCE_COLUMN};
use crate::table::{Row, Table};

/// Canonical validated event. Created once from a merged row; immutable
/// thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub event_date: NaiveDate,
    pub country: String,
    pub city: String,
    pub region: Option<String>,
    pub province_or_state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub num_killed: Option<i64>,
    pub num_terrorist_killed: Option<i64>,
    pub num_wounded: Option<i64>,
    pub num_terrorist_wounded: Option<i64>,
    pub total_casualties: i64,
    pub num_perpetrators: Option<i64>,
    pub num_perpetrators_captured: Option<i64>,
    /// Primary/secondary/tertiary group names, in that order.
    pub terror_groups: Vec<String>,
    pub attack_types: Vec<String>,
    /// Target type/subtype labels, in column order.
    pub target_details: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub data_source: Provenance,
}

/// Outcome of one validation run. Computed on every invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub total: usize,
    pub accepted: usize,
    pub skipped: usize,
}

/// Map each normalized row into an `Event`. Rows without an event date,
/// and rows failing any other required-field check, are skipped and
/// counted.
pub fn validate_rows(table: &Table) -> (Vec<Event>, ValidationReport) {
    let mut events = Vec::with_capacity(table.len());
    let mut report = ValidationReport {
        total: table.len(),
        ..Default::default()
    };

    for row in table.rows() {
        if row.get("event_date").is_null() {
            report.skipped += 1;
            continue;
        }
        match row_to_event(row) {
            Ok(event) => {
                events.push(event);
                report.accepted += 1;
            }
            Err(err) => {
                warn!(error = %err, "Skipping invalid row");
                report.skipped += 1;
            }
        }
    }

    info!(
        total = report.total,
        accepted = report.accepted,
        skipped = report.skipped,
        "Validation complete"
    );
    (events, report)
}

fn row_to_event(row: &Row) -> FuseResult<Event> {
    let event_date = row
        .get_date("event_date")
        .ok_or_else(|| FuseError::validation("event_date is not a date"))?;

    Ok(Event {
        event_id: required_text(row, EVENT_ID_COLUMN)?,
        event_date,
        country: required_text(row, "country")?,
        city: required_text(row, "city")?,
        region: optional_text(row, "region"),
        province_or_state: optional_text(row, "province_or_state"),
        latitude: row.get_num("latitude"),
        longitude: row.get_num("longitude"),
        num_killed: count(row, "num_killed"),
        num_terrorist_killed: count(row, "num_terrorist_killed"),
        num_wounded: count(row, "num_wounded"),
        num_terrorist_wounded: count(row, "num_terrorist_wounded"),
        total_casualties: count(row, "num_killed").unwrap_or(0)
            + count(row, "num_wounded").unwrap_or(0),
        num_perpetrators: count(row, "num_perpetrators"),
        num_perpetrators_captured: count(row, "num_perpetrators_captured"),
        terror_groups: collect_labels(
            row,
            &[
                "terror_group_name",
                "secondary_terror_group_name",
                "tertiary_terror_group_name",
            ],
        ),
        attack_types: collect_labels(row, &["attack_type_1", "attack_type_2", "attack_type_3"]),
        target_details: collect_labels(
            row,
            &[
                "target_type_1",
                "target_subtype_1",
                "target_type_2",
                "target_subtype_2",
                "target_type_3",
                "target_subtype_3",
            ],
        ),
        summary: optional_text(row, "summary"),
        description: optional_text(row, "description"),
        data_source: row
            .get_str(DATA_SOURCE_COLUMN)
            .map(Provenance::from_str)
            .unwrap_or(Provenance::PrimaryOnly),
    })
}

fn required_text(row: &Row, column: &str) -> FuseResult<String> {
    let value = row.get(column);
    if value.is_null() {
        return Err(FuseError::validation(format!("missing required field '{column}'")));
    }
    Ok(value.to_string())
}

fn optional_text(row: &Row, column: &str) -> Option<String> {
    let value = row.get(column);
    value.is_present().then(|| value.to_string())
}

fn count(row: &Row, column: &str) -> Option<i64> {
    row.get_num(column).map(|n| n as i64)
}

fn collect_labels(row: &Row, columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .filter_map(|column| row.get_str(column))
        .map(|s| s.to_string())
        .collect()
}
