//! Profile presenter and panel state.
//!
//! # Responsibility
//! - Format one profile record into the fixed, ordered set of sections.
//! - Track panel visibility and the single active tab.
//!
//! # Invariants
//! - Every section field renders a value; absent data becomes [`PLACEHOLDER`].
//! - Exactly one tab is active at any time.
//! - Showing an unknown id leaves panel state untouched.

use crate::profile::record::{ProfileIndex, ProfileRecord};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Placeholder rendered for missing values.
pub const PLACEHOLDER: &str = "—";

/// Named profile tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    #[default]
    Summary,
    SocioEconomic,
    History,
    Migration,
    Sources,
    GeneticEvidence,
}

impl ProfileSection {
    /// All sections in display order.
    pub const ALL: [ProfileSection; 6] = [
        Self::Summary,
        Self::SocioEconomic,
        Self::History,
        Self::Migration,
        Self::Sources,
        Self::GeneticEvidence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::SocioEconomic => "socio_economic",
            Self::History => "history",
            Self::Migration => "migration",
            Self::Sources => "sources",
            Self::GeneticEvidence => "genetic_evidence",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::SocioEconomic => "Socio-economic",
            Self::History => "History",
            Self::Migration => "Migration",
            Self::Sources => "Sources",
            Self::GeneticEvidence => "Genetic evidence",
        }
    }

    /// Parses a tab name; dashes, spaces and case are ignored.
    pub fn parse(value: &str) -> Result<Self, ProfileTabError> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if normalized.is_empty() {
            return Err(ProfileTabError::Empty);
        }
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == normalized)
            .ok_or(ProfileTabError::Unknown(normalized))
    }

    /// Field label -> source keys, in display order.
    fn field_sources(self) -> &'static [(&'static str, &'static [&'static str])] {
        match self {
            Self::Summary => &[
                ("Born", &["birth_year", "birth_date", "born"]),
                ("Died", &["death_year", "death_date", "died"]),
                ("Tags", &["tags"]),
                ("Notes", &["summary", "notes"]),
            ],
            Self::SocioEconomic => &[
                ("Occupation", &["occupation"]),
                ("Social class", &["social_class", "class"]),
                ("Education", &["education"]),
                ("Residence", &["residence"]),
            ],
            Self::History => &[("Narrative", &["history"])],
            Self::Migration => &[
                ("Origin", &["origin", "birth_place"]),
                ("Destination", &["destination"]),
                ("Year", &["migration_year"]),
                ("Details", &["migration"]),
            ],
            Self::Sources => &[
                ("Sources", &["sources"]),
                ("Citations", &["citations"]),
            ],
            Self::GeneticEvidence => &[
                ("Haplogroup", &["haplogroup"]),
                ("DNA matches", &["dna_matches", "dna_match"]),
                ("Notes", &["genetic_evidence"]),
            ],
        }
    }
}

/// Tab name parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileTabError {
    Empty,
    Unknown(String),
}

impl Display for ProfileTabError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "profile tab must not be empty"),
            Self::Unknown(value) => write!(
                f,
                "unknown profile tab `{value}`; expected summary|socio_economic|history|migration|sources|genetic_evidence"
            ),
        }
    }
}

impl Error for ProfileTabError {}

/// One labeled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileField {
    pub label: String,
    pub value: String,
}

/// One formatted section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    pub section: ProfileSection,
    pub title: String,
    pub fields: Vec<ProfileField>,
    /// Timeline lines; only filled for `history`.
    pub timeline: Vec<String>,
}

/// Fully formatted profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub sections: Vec<SectionView>,
}

impl ProfileView {
    pub fn section(&self, section: ProfileSection) -> Option<&SectionView> {
        self.sections.iter().find(|view| view.section == section)
    }
}

/// Formats one record into all sections.
pub fn present(record: &ProfileRecord) -> ProfileView {
    let sections = ProfileSection::ALL
        .into_iter()
        .map(|section| {
            let fields = section
                .field_sources()
                .iter()
                .map(|(label, keys)| ProfileField {
                    label: (*label).to_string(),
                    value: record
                        .field(keys)
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                })
                .collect();
            let timeline = if section == ProfileSection::History {
                record.events.iter().map(|event| event.timeline_line()).collect()
            } else {
                Vec::new()
            };
            SectionView {
                section,
                title: section.title().to_string(),
                fields,
                timeline,
            }
        })
        .collect();

    ProfileView {
        id: record.id.clone(),
        name: record.name.clone(),
        sections,
    }
}

/// Profile panel state: hidden or showing one profile with one active tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePanel {
    visible: bool,
    active: ProfileSection,
    view: Option<ProfileView>,
}

impl ProfilePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn active_section(&self) -> ProfileSection {
        self.active
    }

    pub fn view(&self) -> Option<&ProfileView> {
        self.view.as_ref()
    }

    /// Shows the profile for `id`. Returns `false` and changes nothing when unknown.
    pub fn show(&mut self, profiles: &ProfileIndex, id: &str) -> bool {
        let Some(record) = profiles.get(id) else {
            debug!("event=profile_missing module=profile status=noop id={id}");
            return false;
        };
        self.view = Some(present(record));
        self.visible = true;
        true
    }

    /// Hides the panel; the last view and tab are kept for the next show.
    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn select_tab(&mut self, section: ProfileSection) {
        self.active = section;
    }

    /// Active section of the visible profile.
    pub fn active_view(&self) -> Option<&SectionView> {
        if !self.visible {
            return None;
        }
        self.view.as_ref()?.section(self.active)
    }

    /// Plain-text rendering: header, tab strip, then the active section.
    pub fn render_text(&self) -> Option<String> {
        let view = self.view.as_ref().filter(|_| self.visible)?;
        let section = view.section(self.active)?;

        let mut out = format!("{} ({})\n", view.name, view.id);
        let tabs = ProfileSection::ALL
            .into_iter()
            .map(|tab| {
                if tab == self.active {
                    format!("[{}]", tab.title())
                } else {
                    tab.title().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&tabs);
        out.push('\n');

        for field in &section.fields {
            out.push_str(&format!("  {}: {}\n", field.label, field.value));
        }
        for line in &section.timeline {
            out.push_str(&format!("  - {line}\n"));
        }
        Some(out)
    }
}
