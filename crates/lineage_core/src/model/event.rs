//! Life event model used by the profile timeline.

use crate::model::person::{first_non_blank, PersonId, RawFields};
use serde::{Deserialize, Serialize};

/// One event row attached to a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub person_id: PersonId,
    pub date: Option<String>,
    pub kind: Option<String>,
    pub place: Option<String>,
    pub description: Option<String>,
}

impl EventRecord {
    /// Builds an event from a row, returning `None` when no person id is present.
    pub fn from_fields(fields: &RawFields) -> Option<Self> {
        let person_id = first_non_blank(fields, &["person_id", "person1_id"])?;
        Some(Self {
            person_id,
            date: first_non_blank(fields, &["date", "year"]),
            kind: first_non_blank(fields, &["event_type", "type", "kind"]),
            place: first_non_blank(fields, &["place", "location"]),
            description: first_non_blank(fields, &["description", "notes"]),
        })
    }

    /// Single-line timeline rendering, e.g. `1902 birth (Oslo): note`.
    pub fn timeline_line(&self) -> String {
        let mut line = String::new();
        if let Some(date) = &self.date {
            line.push_str(date);
        }
        if let Some(kind) = &self.kind {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(kind);
        }
        if let Some(place) = &self.place {
            line.push_str(&format!(" ({place})"));
        }
        if let Some(description) = &self.description {
            if line.is_empty() {
                line.push_str(description);
            } else {
                line.push_str(&format!(": {description}"));
            }
        }
        if line.is_empty() {
            line.push_str("event");
        }
        line.trim().to_string()
    }
}
