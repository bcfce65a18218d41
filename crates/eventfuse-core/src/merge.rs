//! Composite-key reconciliation of the two source tables.
//!
//! Full outer join on `(date, country, city)` with provenance tagging,
//! first-row election per matched key, and per-field primary-over-secondary
//! fallback for the designated conflict columns.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::columns::{CANONICAL_RENAMES, ESSENTIAL_COLUMNS, SECONDARY_RENAMES};
use crate::dates::DATE_COLUMN;
use crate::error::{FuseError, FuseResult};
use crate::table::{Row, Table, Value};

/// Columns forming the composite natural key.
pub const MERGE_KEY_COLUMNS: [&str; 3] = [DATE_COLUMN, "country_txt", "city"];

/// Conflict columns resolved as "primary when present, else secondary".
pub const FALLBACK_COLUMNS: [&str; 4] = ["nkill", "nwound", "total_casualties", "Description"];

/// Column carrying the provenance tag on merged rows.
pub const DATA_SOURCE_COLUMN: &str = "data_source";

/// Which source table(s) contributed to a merged record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    PrimaryOnly,
    SecondaryOnly,
    Matched,
}

impl Provenance {
    /// Parse from string.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "secondary_only" => Self::SecondaryOnly,
            "matched" => Self::Matched,
            _ => Self::PrimaryOnly,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryOnly => "primary_only",
            Self::SecondaryOnly => "secondary_only",
            Self::Matched => "matched",
        }
    }
}

/// Composite key: all three components must be present for two records to
/// be the same event. Records lacking a resolvable date never merge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct MergeKey {
    date: NaiveDate,
    country: String,
    city: String,
}

fn merge_key(row: &Row) -> Option<MergeKey> {
    let date = row.get_date(DATE_COLUMN)?;
    let country = present_text(row.get("country_txt"))?;
    let city = present_text(row.get("city"))?;
    Some(MergeKey { date, country, city })
}

fn present_text(value: &Value) -> Option<String> {
    value.is_present().then(|| value.to_string())
}

/// Reconcile the two dated source tables into the canonical merged table:
/// prepare both sides, outer-join on the composite key, restrict to the
/// essential column set sorted by date, and rename to canonical names.
pub fn reconcile(primary: &Table, secondary: &Table) -> FuseResult<Table> {
    let primary = with_total_casualties(primary);
    let secondary = with_total_casualties(&secondary.rename_columns(SECONDARY_RENAMES));

    let joined = outer_join(&primary, &secondary)?;
    info!(
        rows = joined.len(),
        primary = primary.len(),
        secondary = secondary.len(),
        "Merge complete"
    );

    let cleaned = joined
        .select_columns(ESSENTIAL_COLUMNS)
        .sort_by_date(DATE_COLUMN);
    Ok(cleaned.rename_columns(CANONICAL_RENAMES))
}

/// Recompute `total_casualties = killed + wounded` with nulls as zero,
/// regardless of any value the input supplied.
fn with_total_casualties(table: &Table) -> Table {
    let mut out = Table::new(table.columns().to_vec());
    out.add_column("total_casualties");
    for row in table.rows() {
        let mut row = row.clone();
        let killed = row.get_num("nkill").unwrap_or(0.0);
        let wounded = row.get_num("nwound").unwrap_or(0.0);
        row.set("total_casualties", Value::Num(killed + wounded));
        out.push(row);
    }
    out
}

/// Full outer join on the composite key with provenance tagging.
///
/// Matched keys elect the first row encountered on each side and resolve
/// the fallback columns; all other rows pass through 1:1. Columns present
/// on both sides but outside the fallback set never survive the join.
fn outer_join(primary: &Table, secondary: &Table) -> FuseResult<Table> {
    require_key_columns(primary, "primary")?;
    require_key_columns(secondary, "secondary")?;

    let secondary_index = index_by_key(secondary);

    let mut out = Table::new(joined_columns(primary, secondary));
    let mut emitted: BTreeSet<MergeKey> = BTreeSet::new();

    for row in primary.rows() {
        match merge_key(row) {
            Some(key) if secondary_index.contains_key(&key) => {
                // First arbitration pass: the first primary row per key is
                // the representative; later same-key rows are consumed.
                if emitted.insert(key.clone()) {
                    let partner = &secondary.rows()[secondary_index[&key][0]];
                    out.push(matched_row(row, partner, primary, secondary));
                }
            }
            _ => out.push(passthrough(row, Provenance::PrimaryOnly)),
        }
    }

    for row in secondary.rows() {
        let consumed = merge_key(row).is_some_and(|key| emitted.contains(&key));
        if !consumed {
            out.push(passthrough(row, Provenance::SecondaryOnly));
        }
    }

    Ok(out)
}

fn require_key_columns(table: &Table, side: &str) -> FuseResult<()> {
    for column in MERGE_KEY_COLUMNS {
        if !table.has_column(column) {
            return Err(FuseError::merge_input(format!(
                "{side} table lacks merge key column '{column}'"
            )));
        }
    }
    Ok(())
}

fn index_by_key(table: &Table) -> BTreeMap<MergeKey, Vec<usize>> {
    let mut index: BTreeMap<MergeKey, Vec<usize>> = BTreeMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        if let Some(key) = merge_key(row) {
            index.entry(key).or_default().push(i);
        }
    }
    index
}

fn joined_columns(primary: &Table, secondary: &Table) -> Vec<String> {
    let mut columns: Vec<String> = primary.columns().to_vec();
    for column in secondary.columns() {
        if !primary.has_column(column) {
            columns.push(column.clone());
        }
    }
    columns.push(DATA_SOURCE_COLUMN.to_string());
    columns
}

fn matched_row(primary_row: &Row, secondary_row: &Row, primary: &Table, secondary: &Table) -> Row {
    let mut out = Row::new();
    for column in primary.columns() {
        let shared = secondary.has_column(column);
        let is_key = MERGE_KEY_COLUMNS.contains(&column.as_str());
        let is_fallback = FALLBACK_COLUMNS.contains(&column.as_str());
        if is_key || !shared {
            out.set(column.clone(), primary_row.get(column).clone());
        } else if is_fallback {
            let value = primary_row.get(column);
            let resolved = if value.is_present() {
                value.clone()
            } else {
                secondary_row.get(column).clone()
            };
            out.set(column.clone(), resolved);
        }
        // shared non-fallback columns are conflicting duplicates; dropped
    }
    for column in secondary.columns() {
        if !primary.has_column(column) {
            out.set(column.clone(), secondary_row.get(column).clone());
        }
    }
    out.set(DATA_SOURCE_COLUMN, Value::Str(Provenance::Matched.as_str().to_string()));
    out
}

fn passthrough(row: &Row, provenance: Provenance) -> Row {
    let mut out = row.clone();
    out.set(DATA_SOURCE_COLUMN, Value::Str(provenance.as_str().to_string()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary_table(rows: Vec<Row>) -> Table {
        let mut table = Table::new(
            ["date", "country_txt", "city", "nkill", "nwound", "gname"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        for row in rows {
            table.push(row);
        }
        table
    }

    fn secondary_table(rows: Vec<Row>) -> Table {
        let mut table = Table::new(
            ["date", "Country", "City", "Fatalities", "Injuries", "Description"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        for row in rows {
            table.push(row);
        }
        table
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn primary_row(d: Option<&str>, country: &str, city: &str, killed: Option<f64>) -> Row {
        let mut row = Row::new();
        match d {
            Some(d) => row.set("date", Value::Date(date(d))),
            None => row.set("date", Value::Null),
        }
        row.set("country_txt", Value::Str(country.to_string()));
        row.set("city", Value::Str(city.to_string()));
        if let Some(k) = killed {
            row.set("nkill", Value::Num(k));
        }
        row.set("gname", Value::Str("Some Group".to_string()));
        row
    }

    fn secondary_row(
        d: Option<&str>,
        country: &str,
        city: &str,
        killed: Option<f64>,
        description: Option<&str>,
    ) -> Row {
        let mut row = Row::new();
        match d {
            Some(d) => row.set("date", Value::Date(date(d))),
            None => row.set("date", Value::Null),
        }
        row.set("Country", Value::Str(country.to_string()));
        row.set("City", Value::Str(city.to_string()));
        if let Some(k) = killed {
            row.set("Fatalities", Value::Num(k));
        }
        if let Some(text) = description {
            row.set("Description", Value::Str(text.to_string()));
        }
        row
    }

    fn provenance_of(row: &Row) -> Provenance {
        Provenance::from_str(row.get_str("data_source").unwrap())
    }

    #[test]
    fn test_merged_row_prefers_primary_killed_takes_secondary_text() {
        let primary = primary_table(vec![primary_row(
            Some("2001-09-11"),
            "USA",
            "New York",
            Some(5.0),
        )]);
        let secondary = secondary_table(vec![secondary_row(
            Some("2001-09-11"),
            "USA",
            "New York",
            None,
            Some("attack"),
        )]);

        let merged = reconcile(&primary, &secondary).unwrap();
        assert_eq!(merged.len(), 1);
        let row = &merged.rows()[0];
        assert_eq!(provenance_of(row), Provenance::Matched);
        assert_eq!(row.get_num("num_killed"), Some(5.0));
        assert_eq!(row.get_str("description"), Some("attack"));
    }

    #[test]
    fn test_secondary_fills_absent_primary_value() {
        let primary = primary_table(vec![primary_row(Some("2001-09-11"), "USA", "New York", None)]);
        let secondary = secondary_table(vec![secondary_row(
            Some("2001-09-11"),
            "USA",
            "New York",
            Some(7.0),
            None,
        )]);

        let merged = reconcile(&primary, &secondary).unwrap();
        assert_eq!(merged.rows()[0].get_num("num_killed"), Some(7.0));
    }

    #[test]
    fn test_merge_totality() {
        // one matched key, one primary-only, one secondary-only
        let primary = primary_table(vec![
            primary_row(Some("2001-09-11"), "USA", "New York", Some(5.0)),
            primary_row(Some("1998-08-07"), "Kenya", "Nairobi", Some(213.0)),
        ]);
        let secondary = secondary_table(vec![
            secondary_row(Some("2001-09-11"), "USA", "New York", None, Some("attack")),
            secondary_row(Some("2004-03-11"), "Spain", "Madrid", Some(191.0), None),
        ]);

        let merged = reconcile(&primary, &secondary).unwrap();
        assert_eq!(merged.len(), 3);

        let sources: Vec<Provenance> = merged.rows().iter().map(provenance_of).collect();
        assert_eq!(
            sources,
            vec![
                Provenance::PrimaryOnly,   // 1998
                Provenance::Matched,       // 2001
                Provenance::SecondaryOnly, // 2004
            ]
        );
    }

    #[test]
    fn test_matched_key_emits_exactly_one_row() {
        // duplicate same-key rows on both sides collapse to the firsts
        let primary = primary_table(vec![
            primary_row(Some("2001-09-11"), "USA", "New York", Some(5.0)),
            primary_row(Some("2001-09-11"), "USA", "New York", Some(99.0)),
        ]);
        let secondary = secondary_table(vec![
            secondary_row(Some("2001-09-11"), "USA", "New York", None, Some("first")),
            secondary_row(Some("2001-09-11"), "USA", "New York", None, Some("second")),
        ]);

        let merged = reconcile(&primary, &secondary).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.rows()[0].get_num("num_killed"), Some(5.0));
        assert_eq!(merged.rows()[0].get_str("description"), Some("first"));
    }

    #[test]
    fn test_dateless_rows_never_merge() {
        let primary = primary_table(vec![primary_row(None, "USA", "New York", Some(1.0))]);
        let secondary = secondary_table(vec![secondary_row(None, "USA", "New York", Some(2.0), None)]);

        let merged = reconcile(&primary, &secondary).unwrap();
        assert_eq!(merged.len(), 2);
        let sources: BTreeSet<&str> = merged
            .rows()
            .iter()
            .map(|r| r.get_str("data_source").unwrap())
            .collect();
        assert!(sources.contains("primary_only"));
        assert!(sources.contains("secondary_only"));
    }

    #[test]
    fn test_total_casualties_recomputed() {
        let mut row = primary_row(Some("2001-09-11"), "USA", "New York", Some(5.0));
        row.set("nwound", Value::Num(3.0));
        let primary = primary_table(vec![row]);
        let secondary = secondary_table(vec![]);

        let merged = reconcile(&primary, &secondary).unwrap();
        assert_eq!(merged.rows()[0].get_num("total_casualties"), Some(8.0));
    }

    #[test]
    fn test_output_sorted_by_date_nulls_last() {
        let primary = primary_table(vec![
            primary_row(None, "USA", "Chicago", Some(1.0)),
            primary_row(Some("2004-03-11"), "Spain", "Madrid", Some(191.0)),
            primary_row(Some("1998-08-07"), "Kenya", "Nairobi", Some(213.0)),
        ]);
        let secondary = secondary_table(vec![]);

        let merged = reconcile(&primary, &secondary).unwrap();
        let dates: Vec<Option<NaiveDate>> = merged
            .rows()
            .iter()
            .map(|r| r.get_date("event_date"))
            .collect();
        assert_eq!(
            dates,
            vec![Some(date("1998-08-07")), Some(date("2004-03-11")), None]
        );
    }

    #[test]
    fn test_missing_key_column_is_merge_failure() {
        let primary = Table::new(vec!["date".into(), "city".into()]);
        let secondary = secondary_table(vec![]);
        let result = reconcile(&primary, &secondary);
        assert!(matches!(result, Err(FuseError::MergeInput(_))));
    }

    #[test]
    fn test_canonical_columns_in_output() {
        let primary = primary_table(vec![primary_row(Some("2001-09-11"), "USA", "New York", Some(5.0))]);
        let secondary = secondary_table(vec![]);
        let merged = reconcile(&primary, &secondary).unwrap();

        for column in ["event_date", "country", "city", "num_killed", "total_casualties", "data_source"] {
            assert!(merged.has_column(column), "missing column {column}");
        }
        assert!(!merged.has_column("nkill"));
        assert!(!merged.has_column("country_txt"));
    }
}
