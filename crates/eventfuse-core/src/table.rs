//! Scalar/row/table model for the pipeline stages.
//!
//! Every stage takes a `Table` and returns a new one; nothing mutates a
//! table after it leaves the stage that built it, so stage boundaries stay
//! testable in isolation.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

/// A single cell value. Missing cells read as `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Date(NaiveDate),
    Null,
}

const NULL: Value = Value::Null;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_present(&self) -> bool {
        !self.is_null()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Parse a raw CSV cell. Empty cells and the `NA` marker are null;
    /// numeric text becomes `Num`; everything else stays text.
    pub fn from_csv_field(field: &str) -> Value {
        let trimmed = field.trim();
        if trimmed.is_empty() || trimmed == "NA" {
            return Value::Null;
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return Value::Num(n);
        }
        Value::Str(field.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Num(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Null => Ok(()),
        }
    }
}

/// One record: column name to value. Column order lives on the `Table`.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Read a cell; absent columns read as `Null`.
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).as_str()
    }

    pub fn get_num(&self, column: &str) -> Option<f64> {
        self.get(column).as_num()
    }

    pub fn get_date(&self, column: &str) -> Option<NaiveDate> {
        self.get(column).as_date()
    }

    fn rename(&self, mapping: &[(&str, &str)]) -> Row {
        let mut out = Row::new();
        for (column, value) in &self.values {
            let renamed = mapping
                .iter()
                .find(|(from, _)| *from == column.as_str())
                .map(|(_, to)| to.to_string())
                .unwrap_or_else(|| column.clone());
            out.set(renamed, value.clone());
        }
        out
    }
}

/// An ordered set of columns plus the rows holding their values.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Register a column at the end of the column order. Cell values are
    /// set per row by the caller.
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.push(name);
        }
    }

    /// Register a column at the front of the column order.
    pub fn add_column_front(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.insert(0, name);
        }
    }

    /// Apply a column-name mapping; unmapped columns keep their names.
    pub fn rename_columns(&self, mapping: &[(&str, &str)]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                mapping
                    .iter()
                    .find(|(from, _)| *from == column.as_str())
                    .map(|(_, to)| to.to_string())
                    .unwrap_or_else(|| column.clone())
            })
            .collect();
        let rows = self.rows.iter().map(|r| r.rename(mapping)).collect();
        Table { columns, rows }
    }

    /// Restrict to the listed columns, in the listed order. Columns the
    /// table does not carry are silently skipped.
    pub fn select_columns(&self, wanted: &[&str]) -> Table {
        let columns: Vec<String> = wanted
            .iter()
            .filter(|c| self.has_column(c))
            .map(|c| c.to_string())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = Row::new();
                for column in &columns {
                    out.set(column.clone(), row.get(column).clone());
                }
                out
            })
            .collect();
        Table { columns, rows }
    }

    /// Stable sort by a date column, ascending, null dates last.
    pub fn sort_by_date(&self, column: &str) -> Table {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|row| {
            let date = row.get_date(column);
            (date.is_none(), date)
        });
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }
}
