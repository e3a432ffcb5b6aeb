//! Event rows to timeline records.

use crate::ingest::report::{IngestReport, ParseMode, SkipReason, SkippedRow, TableKind};
use crate::ingest::IngestError;
use crate::model::event::EventRecord;
use crate::model::person::RawFields;

/// Collects event rows that name a person.
///
/// # Errors
/// - In [`ParseMode::Strict`], returns [`IngestError::RejectedRow`] for the
///   first row without a person identifier.
pub fn collect_events(
    rows: &[RawFields],
    mode: ParseMode,
    report: &mut IngestReport,
) -> Result<Vec<EventRecord>, IngestError> {
    let mut events = Vec::new();
    for (position, row) in rows.iter().enumerate() {
        match EventRecord::from_fields(row) {
            Some(event) => events.push(event),
            None => {
                let skipped = SkippedRow {
                    table: TableKind::Events,
                    row: position + 1,
                    reason: SkipReason::MissingIdentifier,
                };
                if mode == ParseMode::Strict {
                    return Err(IngestError::RejectedRow(skipped));
                }
                report.record_skip(skipped);
            }
        }
    }
    report.events_accepted = events.len();
    Ok(events)
}
