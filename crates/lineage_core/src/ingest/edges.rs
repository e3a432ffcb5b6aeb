//! Edge filter: relationship rows to accepted parent edges.
//!
//! # Invariants
//! - Only rows whose relation kind is `parent` are considered.
//! - Emitted edges always reference two indexed people.
//! - Output order follows row order.

use crate::ingest::normalize::PersonIndex;
use crate::ingest::report::{
    EndpointRole, IngestReport, ParseMode, SkipReason, SkippedRow, TableKind,
};
use crate::ingest::IngestError;
use crate::model::edge::{is_parent_relation, ParentEdge};
use crate::model::person::{first_non_blank, RawFields};
use log::debug;

const RELATION_KIND_KEYS: &[&str] = &["relationship_type", "type", "relation"];
const PARENT_KEYS: &[&str] = &["person1_id", "parent_id", "parent"];
const CHILD_KEYS: &[&str] = &["person2_id", "child_id", "child"];

/// Filters relationship rows down to resolvable parent edges.
///
/// # Errors
/// - In [`ParseMode::Strict`], returns [`IngestError::RejectedRow`] for the
///   first parent-kind row with a missing or unknown endpoint.
pub fn filter_parent_edges(
    rows: &[RawFields],
    people: &PersonIndex,
    mode: ParseMode,
    report: &mut IngestReport,
) -> Result<Vec<ParentEdge>, IngestError> {
    let mut edges = Vec::new();
    for (position, row) in rows.iter().enumerate() {
        let kind = first_non_blank(row, RELATION_KIND_KEYS).unwrap_or_default();
        if !is_parent_relation(&kind) {
            report.relations_ignored += 1;
            continue;
        }

        match resolve_edge(row, people) {
            Ok(edge) => edges.push(edge),
            Err(reason) => {
                let skipped = SkippedRow {
                    table: TableKind::Relationships,
                    row: position + 1,
                    reason,
                };
                if mode == ParseMode::Strict {
                    return Err(IngestError::RejectedRow(skipped));
                }
                debug!("event=row_skipped module=ingest status=skipped detail=\"{skipped}\"");
                report.record_skip(skipped);
            }
        }
    }
    report.edges_accepted = edges.len();
    Ok(edges)
}

fn resolve_edge(row: &RawFields, people: &PersonIndex) -> Result<ParentEdge, SkipReason> {
    let parent_id = resolve_endpoint(row, PARENT_KEYS, EndpointRole::Parent, people)?;
    let child_id = resolve_endpoint(row, CHILD_KEYS, EndpointRole::Child, people)?;
    Ok(ParentEdge::new(parent_id, child_id))
}

fn resolve_endpoint(
    row: &RawFields,
    keys: &[&str],
    role: EndpointRole,
    people: &PersonIndex,
) -> Result<String, SkipReason> {
    let id = first_non_blank(row, keys).ok_or(SkipReason::MissingEndpoint { role })?;
    if !people.contains(&id) {
        return Err(SkipReason::UnresolvedEndpoint { role, id });
    }
    Ok(id)
}
