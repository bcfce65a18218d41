//! Opaque identifier assignment.

use uuid::Uuid;

use crate::table::{Table, Value};

/// Column carrying the opaque event identifier.
pub const EVENT_ID_COLUMN: &str = "event_id";

/// Stamp every surviving record with a generated opaque identifier.
///
/// Identity denotes a distinct observation, not a dedup key: two
/// structurally identical rows receive different identifiers.
pub fn assign_event_ids(table: &Table) -> Table {
    let mut out = Table::new(table.columns().to_vec());
    out.add_column_front(EVENT_ID_COLUMN);
    for row in table.rows() {
        let mut row = row.clone();
        row.set(EVENT_ID_COLUMN, Value::Str(Uuid::new_v4().to_string()));
        out.push(row);
    }
    out
}
