//! Tabular resource decoding.
//!
//! # Responsibility
//! - Decode CSV or JSON-array bodies into ordered raw rows.
//! - Canonicalize header names so spelling variants read as one key.
//!
//! # Invariants
//! - Field values are never trimmed or rewritten here.
//! - Row order follows the source body.

use crate::model::person::RawFields;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static header regex must compile"));

/// Body encoding of one tabular resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Header row followed by records.
    Csv,
    /// Array of flat JSON objects.
    Json,
    /// Detect from the first non-whitespace character.
    #[default]
    Auto,
}

impl TableFormat {
    /// Guesses a format from a path or URL suffix.
    pub fn from_location(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".json") {
            Self::Json
        } else if lower.ends_with(".csv") {
            Self::Csv
        } else {
            Self::Auto
        }
    }

    fn resolve(self, body: &str) -> Self {
        match self {
            Self::Auto => {
                if body.trim_start_matches('\u{feff}').trim_start().starts_with('[') {
                    Self::Json
                } else {
                    Self::Csv
                }
            }
            other => other,
        }
    }
}

/// Decoded table: a label for diagnostics plus its rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub label: String,
    pub rows: Vec<RawFields>,
}

impl Table {
    pub fn new(label: impl Into<String>, rows: Vec<RawFields>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }

    pub fn empty(label: impl Into<String>) -> Self {
        Self::new(label, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Table decoding errors.
#[derive(Debug)]
pub enum TableError {
    /// CSV body could not be tokenized.
    Csv { table: String, source: csv::Error },
    /// JSON body is not valid JSON.
    Json {
        table: String,
        source: serde_json::Error,
    },
    /// JSON body is valid but not an array.
    NotAnArray { table: String },
    /// One JSON array element is not an object.
    RowNotObject { table: String, row: usize },
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv { table, source } => write!(f, "invalid CSV in `{table}`: {source}"),
            Self::Json { table, source } => write!(f, "invalid JSON in `{table}`: {source}"),
            Self::NotAnArray { table } => {
                write!(f, "JSON table `{table}` must be an array of objects")
            }
            Self::RowNotObject { table, row } => {
                write!(f, "JSON table `{table}` row {row} is not an object")
            }
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::NotAnArray { .. } => None,
            Self::RowNotObject { .. } => None,
        }
    }
}

/// Canonical header key: trimmed, lower-cased, separators collapsed to `_`.
pub fn canonical_header(raw: &str) -> String {
    let lowered = raw.trim_start_matches('\u{feff}').trim().to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// Decodes one table body.
///
/// # Errors
/// - Returns [`TableError`] when the body is not decodable in the chosen format.
pub fn decode_table(
    label: impl Into<String>,
    body: &str,
    format: TableFormat,
) -> Result<Table, TableError> {
    let label = label.into();
    let rows = match format.resolve(body) {
        TableFormat::Json => decode_json_rows(&label, body)?,
        _ => decode_csv_rows(&label, body)?,
    };
    Ok(Table::new(label, rows))
}

fn decode_csv_rows(label: &str, body: &str) -> Result<Vec<RawFields>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| TableError::Csv {
            table: label.to_string(),
            source,
        })?
        .iter()
        .map(canonical_header)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| TableError::Csv {
            table: label.to_string(),
            source,
        })?;
        // Ragged rows: missing trailing cells stay absent, extra cells are dropped.
        let row = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect::<RawFields>();
        rows.push(row);
    }
    Ok(rows)
}

fn decode_json_rows(label: &str, body: &str) -> Result<Vec<RawFields>, TableError> {
    let value: serde_json::Value = serde_json::from_str(body.trim_start_matches('\u{feff}'))
        .map_err(|source| TableError::Json {
            table: label.to_string(),
            source,
        })?;
    let serde_json::Value::Array(items) = value else {
        return Err(TableError::NotAnArray {
            table: label.to_string(),
        });
    };

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let serde_json::Value::Object(object) = item else {
            return Err(TableError::RowNotObject {
                table: label.to_string(),
                row: index + 1,
            });
        };
        let row = object
            .into_iter()
            .filter_map(|(key, value)| {
                let header = canonical_header(&key);
                if header.is_empty() {
                    return None;
                }
                json_field_text(value).map(|text| (header, text))
            })
            .collect::<RawFields>();
        rows.push(row);
    }
    Ok(rows)
}

fn json_field_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        nested => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{canonical_header, decode_table, TableError, TableFormat};

    #[test]
    fn canonical_header_collapses_variants() {
        assert_eq!(canonical_header(" Given Name "), "given_name");
        assert_eq!(canonical_header("given-name"), "given_name");
        assert_eq!(canonical_header("\u{feff}ID"), "id");
        assert_eq!(canonical_header("Person 1 ID"), "person_1_id");
        assert_eq!(canonical_header("  --  "), "");
    }

    #[test]
    fn csv_rows_keep_values_untrimmed() {
        let table = decode_table("people", "id,Name\n P1 , Ada \n", TableFormat::Csv)
            .expect("csv should decode");
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0]["id"], " P1 ");
        assert_eq!(table.rows[0]["name"], " Ada ");
    }

    #[test]
    fn csv_tolerates_ragged_rows() {
        let body = "id,name,surname\nP1,Ada\nP2,Bo,Gren,extra\n";
        let table = decode_table("people", body, TableFormat::Auto).expect("csv should decode");
        assert_eq!(table.len(), 2);
        assert!(!table.rows[0].contains_key("surname"));
        assert_eq!(table.rows[1]["surname"], "Gren");
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn auto_detects_json_arrays() {
        let body = r#" [{"id": "P1", "Birth Year": 1902, "alive": false, "notes": null}] "#;
        let table = decode_table("people", body, TableFormat::Auto).expect("json should decode");
        assert_eq!(table.rows[0]["id"], "P1");
        assert_eq!(table.rows[0]["birth_year"], "1902");
        assert_eq!(table.rows[0]["alive"], "false");
        assert!(!table.rows[0].contains_key("notes"));
    }

    #[test]
    fn json_must_be_array_of_objects() {
        let err = decode_table("people", r#"{"id": "P1"}"#, TableFormat::Json)
            .expect_err("object body must fail");
        assert!(matches!(err, TableError::NotAnArray { .. }));

        let err = decode_table("people", r#"[{"id": "P1"}, 3]"#, TableFormat::Json)
            .expect_err("scalar row must fail");
        assert!(matches!(err, TableError::RowNotObject { row: 2, .. }));
    }

    #[test]
    fn format_from_location_ignores_query() {
        assert_eq!(TableFormat::from_location("a/people.JSON"), TableFormat::Json);
        assert_eq!(
            TableFormat::from_location("https://x/pub.csv?gid=0"),
            TableFormat::Csv
        );
        assert_eq!(
            TableFormat::from_location("https://x/pub?output=csv"),
            TableFormat::Auto
        );
    }

    #[test]
    fn empty_body_is_an_empty_table() {
        let table = decode_table("people", "", TableFormat::Auto).expect("empty should decode");
        assert!(table.is_empty());
    }
}
