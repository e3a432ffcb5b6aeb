//! Table ingest: decoding, person normalization and edge filtering.
//!
//! # Responsibility
//! - Turn fetched table bodies into indexed people, parent edges and events.
//! - Apply the lenient-parse policy and record what was dropped.
//!
//! # Invariants
//! - Only whitespace trimming is applied to consulted field values.
//! - Lenient mode never fails on row content; it reports instead.

pub mod edges;
pub mod events;
pub mod normalize;
pub mod report;
pub mod table;

use report::SkippedRow;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ingest-layer errors. Decode failures surface earlier as `SourceError::Decode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Row rejected under strict parse mode.
    RejectedRow(SkippedRow),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RejectedRow(skipped) => write!(f, "rejected {skipped}"),
        }
    }
}

impl Error for IngestError {}
