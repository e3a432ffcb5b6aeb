//! Lenient-parse bookkeeping.
//!
//! # Responsibility
//! - Record every row dropped during ingest with table, position and reason.
//! - Expose counts so callers can observe data quality without failing a load.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Row handling policy for malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Drop malformed rows and record them in [`IngestReport`].
    #[default]
    Lenient,
    /// Fail on the first malformed row.
    Strict,
}

/// Source table a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    People,
    Relationships,
    Events,
    Profiles,
}

impl TableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Relationships => "relationships",
            Self::Events => "events",
            Self::Profiles => "profiles",
        }
    }
}

/// Edge endpoint role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRole {
    Parent,
    Child,
}

impl EndpointRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Child => "child",
        }
    }
}

/// Why one row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Identifier column is missing or blank.
    MissingIdentifier,
    /// Edge endpoint column is missing or blank.
    MissingEndpoint { role: EndpointRole },
    /// Edge endpoint does not name an indexed person.
    UnresolvedEndpoint { role: EndpointRole, id: String },
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIdentifier => write!(f, "missing identifier"),
            Self::MissingEndpoint { role } => write!(f, "missing {} endpoint", role.as_str()),
            Self::UnresolvedEndpoint { role, id } => {
                write!(f, "unknown {} `{id}`", role.as_str())
            }
        }
    }
}

/// One dropped row. `row` is the 1-based data row position in its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub table: TableKind,
    pub row: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl Display for SkippedRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} row {}: {}", self.table.as_str(), self.row, self.reason)
    }
}

/// Outcome counters for one ingest pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub people_accepted: usize,
    /// Identifiers seen more than once; the later row won.
    pub duplicate_ids: Vec<String>,
    pub edges_accepted: usize,
    /// Relationship rows of a non-parent kind.
    pub relations_ignored: usize,
    pub events_accepted: usize,
    pub profiles_accepted: usize,
    pub skipped: Vec<SkippedRow>,
}

impl IngestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Number of dropped rows from one table.
    pub fn skipped_in(&self, table: TableKind) -> usize {
        self.skipped.iter().filter(|row| row.table == table).count()
    }

    pub(crate) fn record_skip(&mut self, skipped: SkippedRow) {
        self.skipped.push(skipped);
    }
}
