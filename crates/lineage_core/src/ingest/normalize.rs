//! Record normalizer: raw people rows to an ordered person index.
//!
//! # Invariants
//! - Rows without an identifier never enter the index.
//! - Duplicate identifiers: the later row replaces the earlier one but keeps
//!   the earlier row's position.

use crate::ingest::report::{IngestReport, ParseMode, SkipReason, SkippedRow, TableKind};
use crate::ingest::IngestError;
use crate::model::person::{Person, PersonId, RawFields};
use indexmap::IndexMap;
use log::debug;

/// Identifier -> person mapping for one load cycle, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonIndex {
    people: IndexMap<PersonId, Person>,
}

impl PersonIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a person. Returns `true` when the id was already present.
    pub fn insert(&mut self, person: Person) -> bool {
        self.people.insert(person.id.clone(), person).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.people.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.people.contains_key(id)
    }

    /// Position of `id` in index order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.people.get_index_of(id)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.people.keys().map(String::as_str)
    }
}

impl FromIterator<Person> for PersonIndex {
    fn from_iter<T: IntoIterator<Item = Person>>(iter: T) -> Self {
        let mut index = Self::new();
        for person in iter {
            index.insert(person);
        }
        index
    }
}

/// Normalizes people rows into a [`PersonIndex`].
///
/// # Errors
/// - In [`ParseMode::Strict`], returns [`IngestError::RejectedRow`] for the
///   first row without an identifier.
pub fn normalize_people(
    rows: &[RawFields],
    mode: ParseMode,
    report: &mut IngestReport,
) -> Result<PersonIndex, IngestError> {
    let mut index = PersonIndex::new();
    for (position, row) in rows.iter().enumerate() {
        let Some(person) = Person::from_fields(row.clone()) else {
            let skipped = SkippedRow {
                table: TableKind::People,
                row: position + 1,
                reason: SkipReason::MissingIdentifier,
            };
            if mode == ParseMode::Strict {
                return Err(IngestError::RejectedRow(skipped));
            }
            debug!("event=row_skipped module=ingest status=skipped detail=\"{skipped}\"");
            report.record_skip(skipped);
            continue;
        };

        let id = person.id.clone();
        if index.insert(person) {
            debug!("event=duplicate_person module=ingest status=replaced id={id}");
            report.duplicate_ids.push(id);
        }
    }
    report.people_accepted = index.len();
    Ok(index)
}
