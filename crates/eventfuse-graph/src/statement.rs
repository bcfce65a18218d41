//! Statement building blocks: value escaping and property rendering.
//!
//! Structural templating lives in the projector; everything that touches
//! embedded values goes through here so free text cannot break a
//! statement literal.

use std::fmt;

/// Reserved label treated as equivalent to absence.
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// Whether a text value carries information: non-empty, non-whitespace
/// and not the sentinel.
pub fn is_meaningful(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(UNKNOWN_SENTINEL)
}

/// Neutralize quote characters and collapse line breaks so the value can
/// be embedded in a single-quoted statement literal.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(['\r', '\n'], " ")
}

/// A typed property value; strings are escaped and quoted, numbers bare.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(s) => write!(f, "'{}'", escape_text(s)),
            PropValue::Int(n) => write!(f, "{n}"),
            PropValue::Float(n) => write!(f, "{n}"),
        }
    }
}

/// Render a `key: value` property list in the given order.
pub fn render_props(props: &[(&str, PropValue)]) -> String {
    props
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
