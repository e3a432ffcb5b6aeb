//! Person record model.
//!
//! # Responsibility
//! - Hold one normalized person row and its opaque extra attributes.
//! - Derive the display name through the name fallback chain.
//!
//! # Invariants
//! - `id` is trimmed and never empty.
//! - `name` is never empty; it falls back to `id`.
//! - Records are immutable after normalization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stable person identifier as written in the source table.
pub type PersonId = String;

/// Raw field map of one source row, keyed by canonical header name.
pub type RawFields = IndexMap<String, String>;

/// Canonical person record produced by the record normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Trimmed identifier from the `id` (or `uid`) column.
    pub id: PersonId,
    /// Display name derived by [`derive_display_name`].
    pub name: String,
    /// Untouched source fields, carried through for presentation.
    pub attributes: RawFields,
}

impl Person {
    /// Builds a person from a row, returning `None` when the identifier is blank.
    pub fn from_fields(fields: RawFields) -> Option<Self> {
        let id = first_non_blank(&fields, &["id", "uid"])?;
        let name = derive_display_name(&fields, id.as_str());
        Some(Self {
            id,
            name,
            attributes: fields,
        })
    }

    /// Returns one trimmed attribute value, `None` when missing or blank.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Resolves the display name: `name`, then `given_name surname`, then `id`.
pub fn derive_display_name(fields: &RawFields, id: &str) -> String {
    if let Some(name) = trimmed(fields, "name") {
        return name.to_string();
    }

    let joined = ["given_name", "surname"]
        .iter()
        .filter_map(|key| trimmed(fields, key))
        .collect::<Vec<_>>()
        .join(" ");
    if !joined.is_empty() {
        return joined;
    }

    id.to_string()
}

/// Returns the first non-blank trimmed value among `keys`.
pub(crate) fn first_non_blank(fields: &RawFields, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| trimmed(fields, key))
        .map(str::to_string)
}

fn trimmed<'a>(fields: &'a RawFields, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
