//! Canonical event-date resolution for both sources.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::table::{Row, Table, Value};

/// Canonical date column attached to both sources before the merge.
pub const DATE_COLUMN: &str = "date";

/// Format of the secondary source's date strings, e.g. `11-Sep-01`.
pub const SECONDARY_DATE_FORMAT: &str = "%d-%b-%y";

/// Two-digit years parse into 20xx up to this year; anything later is a
/// pre-rollover date and gets 100 years subtracted, so `17-Apr-68`
/// resolves to 1968 rather than 2068.
pub const ROLLOVER_CUTOFF_YEAR: i32 = 2025;

/// Resolve a date from separate year/month/day columns. The date is
/// absent (not an error) unless all three are present and month and day
/// are non-zero.
pub fn component_date(row: &Row) -> Option<NaiveDate> {
    let year = row.get_num("iyear")? as i32;
    let month = row.get_num("imonth")? as u32;
    let day = row.get_num("iday")? as u32;
    if month == 0 || day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a formatted two-digit-year date string, correcting rollover.
pub fn formatted_date(text: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(text.trim(), SECONDARY_DATE_FORMAT).ok()?;
    if parsed.year() > ROLLOVER_CUTOFF_YEAR {
        parsed.with_year(parsed.year() - 100)
    } else {
        Some(parsed)
    }
}

/// Attach the canonical date column to a primary-source table.
pub fn attach_primary_dates(table: &Table) -> Table {
    attach(table, component_date)
}

/// Attach the canonical date column to a secondary-source table, reading
/// the formatted `Date` column. Unparseable cells resolve to null.
pub fn attach_secondary_dates(table: &Table) -> Table {
    attach(table, |row| {
        let text = row.get_str("Date")?;
        let resolved = formatted_date(text);
        if resolved.is_none() {
            debug!(value = text, "Unparseable secondary date");
        }
        resolved
    })
}

fn attach(table: &Table, resolve: impl Fn(&Row) -> Option<NaiveDate>) -> Table {
    let mut out = Table::new(table.columns().to_vec());
    out.add_column_front(DATE_COLUMN);
    for row in table.rows() {
        let mut row = row.clone();
        match resolve(&row) {
            Some(date) => row.set(DATE_COLUMN, Value::Date(date)),
            None => row.set(DATE_COLUMN, Value::Null),
        }
        out.push(row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_row(year: Option<f64>, month: Option<f64>, day: Option<f64>) -> Row {
        let mut row = Row::new();
        if let Some(y) = year {
            row.set("iyear", Value::Num(y));
        }
        if let Some(m) = month {
            row.set("imonth", Value::Num(m));
        }
        if let Some(d) = day {
            row.set("iday", Value::Num(d));
        }
        row
    }

    #[test]
    fn test_component_date_complete() {
        let row = component_row(Some(2001.0), Some(9.0), Some(11.0));
        assert_eq!(
            component_date(&row),
            NaiveDate::from_ymd_opt(2001, 9, 11)
        );
    }

    #[test]
    fn test_component_date_zero_month_is_absent() {
        let row = component_row(Some(2001.0), Some(0.0), Some(11.0));
        assert_eq!(component_date(&row), None);
    }

    #[test]
    fn test_component_date_zero_day_is_absent() {
        let row = component_row(Some(2001.0), Some(9.0), Some(0.0));
        assert_eq!(component_date(&row), None);
    }

    #[test]
    fn test_component_date_missing_part_is_absent() {
        let row = component_row(Some(2001.0), None, Some(11.0));
        assert_eq!(component_date(&row), None);
    }

    #[test]
    fn test_formatted_date_recent() {
        assert_eq!(
            formatted_date("11-Sep-01"),
            NaiveDate::from_ymd_opt(2001, 9, 11)
        );
    }

    #[test]
    fn test_formatted_date_rollover() {
        // %y parses 68 into 2068; the cutoff pulls it back a century.
        assert_eq!(
            formatted_date("17-Apr-68"),
            NaiveDate::from_ymd_opt(1968, 4, 17)
        );
        assert_eq!(
            formatted_date("31-Dec-99"),
            NaiveDate::from_ymd_opt(1999, 12, 31)
        );
    }

    #[test]
    fn test_formatted_date_at_cutoff_is_kept() {
        assert_eq!(
            formatted_date("01-Jan-25"),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
    }

    #[test]
    fn test_formatted_date_garbage_is_absent() {
        assert_eq!(formatted_date("not a date"), None);
        assert_eq!(formatted_date(""), None);
    }

    #[test]
    fn test_attach_primary_dates() {
        let mut table = Table::new(vec!["iyear".into(), "imonth".into(), "iday".into()]);
        table.push(component_row(Some(1998.0), Some(8.0), Some(7.0)));
        table.push(component_row(Some(1998.0), Some(0.0), Some(7.0)));

        let dated = attach_primary_dates(&table);
        assert_eq!(dated.columns()[0], DATE_COLUMN);
        assert_eq!(
            dated.rows()[0].get_date(DATE_COLUMN),
            NaiveDate::from_ymd_opt(1998, 8, 7)
        );
        assert!(dated.rows()[1].get(DATE_COLUMN).is_null());
    }
}
