//! CSV ingestion for the two source datasets, and canonical-table export.
//!
//! The research export ships as Latin-1; files are decoded to UTF-8 with a
//! Windows-1252 fallback before parsing.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use eventfuse_core::{Row, Table, Value};

/// Usable column subset of the primary research database.
pub const PRIMARY_COLUMNS: &[&str] = &[
    "iyear",
    "imonth",
    "iday",
    "country_txt",
    "region_txt",
    "provstate",
    "city",
    "latitude",
    "longitude",
    "attacktype1_txt",
    "attacktype2_txt",
    "attacktype3_txt",
    "targtype1_txt",
    "targsubtype1_txt",
    "targtype2_txt",
    "targsubtype2_txt",
    "targtype3_txt",
    "targsubtype3_txt",
    "gname",
    "gsubname",
    "gname2",
    "gsubname2",
    "gname3",
    "gsubname3",
    "nkill",
    "nkillter",
    "nwound",
    "nwoundte",
    "nperps",
    "nperpcap",
];

/// Column subset of the secondary incident list.
pub const SECONDARY_COLUMNS: &[&str] =
    &["Date", "City", "Country", "Injuries", "Fatalities", "Description"];

/// Load the primary source with its usable column subset.
pub fn load_primary_csv(path: &Path) -> Result<Table> {
    load_csv(path, PRIMARY_COLUMNS)
}

/// Load the secondary source with its column subset.
pub fn load_secondary_csv(path: &Path) -> Result<Table> {
    load_csv(path, SECONDARY_COLUMNS)
}

/// Load a headed CSV file, keeping only the requested columns (those the
/// file actually carries). Cells parse per [`Value::from_csv_field`].
pub fn load_csv(path: &Path, columns: &[&str]) -> Result<Table> {
    let content = read_file_as_utf8(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header of {}", path.display()))?
        .clone();

    // (output column, position in the file) for the requested subset
    let selected: Vec<(String, usize)> = columns
        .iter()
        .filter_map(|wanted| {
            headers
                .iter()
                .position(|h| h == *wanted)
                .map(|i| (wanted.to_string(), i))
        })
        .collect();

    let mut table = Table::new(selected.iter().map(|(name, _)| name.clone()).collect());
    for record in reader.records() {
        let record = record.with_context(|| format!("Malformed CSV record in {}", path.display()))?;
        let mut row = Row::new();
        for (name, index) in &selected {
            let field = record.get(*index).unwrap_or("");
            row.set(name.clone(), Value::from_csv_field(field));
        }
        table.push(row);
    }

    info!(path = %path.display(), rows = table.len(), columns = table.columns().len(), "Loaded CSV");
    Ok(table)
}

/// Write a table as UTF-8 CSV with `NA` for null cells.
pub fn save_table(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(table.columns())?;
    for row in table.rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| {
                let value = row.get(column);
                if value.is_null() {
                    "NA".to_string()
                } else {
                    value.to_string()
                }
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = table.len(), "Saved CSV");
    Ok(())
}

/// Read a file and convert to UTF-8 if needed (handles the Latin-1 /
/// Windows-1252 bytes the research export uses).
fn read_file_as_utf8(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_load_selects_requested_columns() {
        let file = write_temp(b"Date,City,Country,Extra\n11-Sep-01,New York,USA,ignored\n");
        let table = load_csv(file.path(), &["Date", "Country"]).unwrap();
        assert_eq!(table.columns(), &["Date".to_string(), "Country".to_string()]);
        assert_eq!(table.rows()[0].get_str("Country"), Some("USA"));
        assert!(!table.has_column("Extra"));
    }

    #[test]
    fn test_empty_cells_are_null_numbers_are_numeric() {
        let file = write_temp(b"City,Fatalities\nNairobi,213\nMadrid,\n");
        let table = load_csv(file.path(), &["City", "Fatalities"]).unwrap();
        assert_eq!(table.rows()[0].get_num("Fatalities"), Some(213.0));
        assert!(table.rows()[1].get("Fatalities").is_null());
    }

    #[test]
    fn test_latin1_fallback() {
        // "Bogotá" with a Latin-1 encoded á (0xE1)
        let file = write_temp(b"City\nBogot\xe1\n");
        let table = load_csv(file.path(), &["City"]).unwrap();
        assert_eq!(table.rows()[0].get_str("City"), Some("Bogot\u{e1}"));
    }

    #[test]
    fn test_save_round_trip_with_na_nulls() {
        let mut table = Table::new(vec!["city".into(), "nkill".into()]);
        let mut row = Row::new();
        row.set("city", Value::Str("Nairobi".to_string()));
        table.push(row);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.csv");
        save_table(&table, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("city,nkill\n"));
        assert!(content.contains("Nairobi,NA"));

        let reloaded = load_csv(&path, &["city", "nkill"]).unwrap();
        assert!(reloaded.rows()[0].get("nkill").is_null());
    }
}
