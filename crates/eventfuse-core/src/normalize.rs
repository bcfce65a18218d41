//! Field-level cleanup of the canonical merged table.

use tracing::info;

use crate::table::{Table, Value};

/// The non-negotiable minimum for a usable event record.
pub const REQUIRED_COLUMNS: [&str; 3] = ["event_date", "country", "city"];

/// Numeric severity columns; negative values are data-entry errors and
/// become absent, never clamped to zero.
const SEVERITY_COLUMNS: [&str; 7] = [
    "num_killed",
    "num_terrorist_killed",
    "num_wounded",
    "num_terrorist_wounded",
    "total_casualties",
    "num_perpetrators",
    "num_perpetrators_captured",
];

/// String identity columns, trimmed and title-cased.
const IDENTITY_COLUMNS: [&str; 4] = ["country", "city", "region", "province_or_state"];

/// Normalize the canonical merged table: drop rows missing the required
/// minimum, default the captured count, reject negative severity values
/// and title-case the identity strings. Latitude/longitude and the
/// target-type columns pass through untouched.
pub fn normalize(table: &Table) -> Table {
    let mut out = Table::new(table.columns().to_vec());

    for row in table.rows() {
        if REQUIRED_COLUMNS.iter().any(|c| row.get(c).is_null()) {
            continue;
        }

        let mut row = row.clone();

        // "captured none" and "unknown" intentionally collapse to zero
        if row.get("num_perpetrators_captured").is_null() {
            row.set("num_perpetrators_captured", Value::Num(0.0));
        }

        for column in SEVERITY_COLUMNS {
            if let Some(n) = row.get_num(column) {
                if n < 0.0 {
                    row.set(column, Value::Null);
                }
            }
        }

        for column in IDENTITY_COLUMNS {
            if let Some(s) = row.get_str(column) {
                row.set(column, Value::Str(title_case(s.trim())));
            }
        }

        out.push(row);
    }

    info!(kept = out.len(), dropped = table.len() - out.len(), "Normalization complete");
    out
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alphabetic = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alphabetic {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(ch);
            prev_alphabetic = false;
        }
    }
    out
}
