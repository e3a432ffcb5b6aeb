use lineage_core::source::SourceLocation;
use lineage_core::{
    LineageConfig, LineageService, LoadRequest, ProfilePanel, ProfileSection, SourceError,
    SourceFetcher, PLACEHOLDER,
};

struct StaticTables;

impl SourceFetcher for StaticTables {
    fn fetch_text(&self, location: &SourceLocation) -> Result<String, SourceError> {
        let body = match location.display_name().as_str() {
            "people.csv" => "id,given_name,surname,occupation\nP1,Ada,Berg,Smith\nP2,Bo,Berg,\n",
            "events.csv" => {
                "person_id,date,event_type,place\nP1,1880,birth,Oslo\nP1,1902,emigration,Bergen\nP9,1900,birth,\n"
            }
            "profiles.json" => {
                r#"[{"id": "P1", "haplogroup": "I1", "history": "Left the farm."},
                    {"id": "X7", "name": "Stranger"}]"#
            }
            _ => "",
        };
        Ok(body.to_string())
    }
}

fn load_profiles() -> lineage_core::ProfileIndex {
    let request = LoadRequest::new("people.csv")
        .with_events("events.csv")
        .with_profiles("profiles.json");
    LineageService::new(StaticTables, LineageConfig::default())
        .load(&request)
        .unwrap()
        .profiles
}

#[test]
fn unknown_identifier_leaves_panel_untouched() {
    let profiles = load_profiles();
    let mut panel = ProfilePanel::new();

    assert!(!panel.show(&profiles, "nobody"));
    assert!(!panel.is_visible());
    assert!(panel.view().is_none());

    assert!(panel.show(&profiles, "P2"));
    let before = panel.view().cloned();
    assert!(!panel.show(&profiles, "nobody"));
    assert!(panel.is_visible());
    assert_eq!(panel.view().cloned(), before);
}

#[test]
fn sections_merge_people_overlay_and_events() {
    let profiles = load_profiles();
    let mut panel = ProfilePanel::new();
    assert!(panel.show(&profiles, "P1"));

    let view = panel.view().unwrap();
    assert_eq!(view.name, "Ada Berg");
    assert_eq!(view.sections.len(), ProfileSection::ALL.len());

    let socio = view.section(ProfileSection::SocioEconomic).unwrap();
    assert_eq!(socio.fields[0].label, "Occupation");
    assert_eq!(socio.fields[0].value, "Smith");
    assert_eq!(socio.fields[1].value, PLACEHOLDER);

    let genetic = view.section(ProfileSection::GeneticEvidence).unwrap();
    assert_eq!(genetic.fields[0].value, "I1");

    let history = view.section(ProfileSection::History).unwrap();
    assert_eq!(history.fields[0].value, "Left the farm.");
    assert_eq!(history.timeline.len(), 2);
    assert!(history.timeline[0].starts_with("1880 birth"));
}

#[test]
fn person_without_extra_fields_shows_placeholders_everywhere() {
    let profiles = load_profiles();
    let mut panel = ProfilePanel::new();
    assert!(panel.show(&profiles, "P2"));

    let migration = panel
        .view()
        .unwrap()
        .section(ProfileSection::Migration)
        .unwrap();
    assert!(migration.fields.iter().all(|field| field.value == PLACEHOLDER));
}

#[test]
fn showing_same_person_twice_is_idempotent() {
    let profiles = load_profiles();
    let mut panel = ProfilePanel::new();
    panel.select_tab(ProfileSection::History);

    assert!(panel.show(&profiles, "P1"));
    let first = panel.render_text().unwrap();
    assert!(panel.show(&profiles, "P1"));
    let second = panel.render_text().unwrap();

    assert_eq!(first, second);
    assert!(first.contains("[History]"));
    assert!(first.contains("  - 1902 emigration (Bergen)"));
}

#[test]
fn close_hides_panel_and_keeps_selected_tab() {
    let profiles = load_profiles();
    let mut panel = ProfilePanel::new();
    panel.show(&profiles, "P1");
    panel.select_tab(ProfileSection::Sources);
    panel.close();

    assert!(!panel.is_visible());
    assert!(panel.render_text().is_none());
    assert!(panel.active_view().is_none());
    assert_eq!(panel.active_section(), ProfileSection::Sources);
}

#[test]
fn overlay_row_for_unknown_person_creates_standalone_profile() {
    let profiles = load_profiles();
    let mut panel = ProfilePanel::new();

    assert!(panel.show(&profiles, "X7"));
    assert_eq!(panel.view().unwrap().name, "Stranger");
}
