//! Extended per-person records for the profile panel.
//!
//! # Invariants
//! - A profile exists for every indexed person.
//! - Overlay rows from the profiles table win over person attributes.

use crate::ingest::normalize::PersonIndex;
use crate::ingest::report::{IngestReport, ParseMode, SkipReason, SkippedRow, TableKind};
use crate::ingest::IngestError;
use crate::model::event::EventRecord;
use crate::model::person::{derive_display_name, first_non_blank, PersonId, RawFields};
use indexmap::IndexMap;

/// Extended record backing one profile view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub id: PersonId,
    pub name: String,
    pub fields: RawFields,
    pub events: Vec<EventRecord>,
}

impl ProfileRecord {
    /// First non-blank trimmed value among `keys`.
    pub fn field(&self, keys: &[&str]) -> Option<String> {
        first_non_blank(&self.fields, keys)
    }
}

/// Identifier -> profile record lookup for one load cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileIndex {
    records: IndexMap<PersonId, ProfileRecord>,
}

impl ProfileIndex {
    pub fn get(&self, id: &str) -> Option<&ProfileRecord> {
        self.records.get(id.trim())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds profiles from people, overlay rows and events.
    ///
    /// Overlay rows are keyed by `id`, `uid` or `person_id`. Rows naming an
    /// unknown person create a standalone profile.
    ///
    /// # Errors
    /// - In [`ParseMode::Strict`], returns [`IngestError::RejectedRow`] for the
    ///   first overlay row without an identifier.
    pub fn build(
        people: &PersonIndex,
        overlay_rows: &[RawFields],
        events: &[EventRecord],
        mode: ParseMode,
        report: &mut IngestReport,
    ) -> Result<Self, IngestError> {
        let mut records = people
            .iter()
            .map(|person| {
                (
                    person.id.clone(),
                    ProfileRecord {
                        id: person.id.clone(),
                        name: person.name.clone(),
                        fields: person.attributes.clone(),
                        events: Vec::new(),
                    },
                )
            })
            .collect::<IndexMap<_, _>>();

        let mut accepted = 0;
        for (position, row) in overlay_rows.iter().enumerate() {
            let Some(id) = first_non_blank(row, &["id", "uid", "person_id"]) else {
                let skipped = SkippedRow {
                    table: TableKind::Profiles,
                    row: position + 1,
                    reason: SkipReason::MissingIdentifier,
                };
                if mode == ParseMode::Strict {
                    return Err(IngestError::RejectedRow(skipped));
                }
                report.record_skip(skipped);
                continue;
            };

            let record = records.entry(id.clone()).or_insert_with(|| ProfileRecord {
                id: id.clone(),
                name: String::new(),
                fields: RawFields::new(),
                events: Vec::new(),
            });
            for (key, value) in row {
                if !value.trim().is_empty() {
                    record.fields.insert(key.clone(), value.clone());
                }
            }
            record.name = derive_display_name(&record.fields, &record.id);
            accepted += 1;
        }
        report.profiles_accepted = accepted;

        for event in events {
            if let Some(record) = records.get_mut(&event.person_id) {
                record.events.push(event.clone());
            }
        }

        Ok(Self { records })
    }
}
