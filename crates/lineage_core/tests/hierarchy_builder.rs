use lineage_core::model::person::RawFields;
use lineage_core::{
    build_hierarchy, BuildOptions, CyclePolicy, HierarchyError, MultiParentPolicy, ParentEdge,
    Person, PersonIndex, RootDecision, VIRTUAL_ROOT_ID,
};

fn person(id: &str, name: &str) -> Person {
    let fields = [("id", id), ("name", name)]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<RawFields>();
    Person::from_fields(fields).unwrap()
}

fn people(ids: &[&str]) -> PersonIndex {
    ids.iter().map(|id| person(id, id)).collect()
}

fn edge(parent: &str, child: &str) -> ParentEdge {
    ParentEdge::new(parent, child)
}

#[test]
fn two_roots_are_wrapped_in_virtual_family_root() {
    let index = [person("A", "Alice"), person("B", "Bob"), person("C", "Carol")]
        .into_iter()
        .collect::<PersonIndex>();
    let built = build_hierarchy(&index, &[edge("A", "B")], &BuildOptions::default()).unwrap();

    assert_eq!(built.root.id, VIRTUAL_ROOT_ID);
    assert_eq!(built.root.name, "Family");
    assert!(built.root.is_virtual());
    assert_eq!(built.root.child_ids(), vec!["A", "C"]);
    assert_eq!(built.root.children[0].child_ids(), vec!["B"]);
    assert_eq!(built.root.children[0].children[0].name, "Bob");
    assert_eq!(
        built.report.decision,
        RootDecision::VirtualOverCandidates { count: 2 }
    );
}

#[test]
fn empty_input_yields_empty_virtual_root() {
    let built = build_hierarchy(&PersonIndex::new(), &[], &BuildOptions::default()).unwrap();

    assert!(built.root.is_virtual());
    assert!(built.root.children.is_empty());
    assert_eq!(
        built.report.decision,
        RootDecision::VirtualOverEveryone { count: 0 }
    );
}

#[test]
fn zero_edges_hang_everyone_under_root_in_input_order() {
    let index = people(&["P3", "P1", "P2"]);
    let built = build_hierarchy(&index, &[], &BuildOptions::default()).unwrap();

    assert!(built.root.is_virtual());
    assert_eq!(built.root.child_ids(), vec!["P3", "P1", "P2"]);
    assert!(built.root.children.iter().all(|child| child.children.is_empty()));
}

#[test]
fn single_natural_root_is_returned_unwrapped() {
    let index = people(&["A", "B", "C", "D"]);
    let edges = vec![edge("A", "B"), edge("A", "C"), edge("C", "D")];
    let built = build_hierarchy(&index, &edges, &BuildOptions::default()).unwrap();

    assert_eq!(built.root.id, "A");
    assert!(!built.root.is_virtual());
    assert_eq!(built.root.child_ids(), vec!["B", "C"]);
    assert_eq!(built.root.find("C").unwrap().child_ids(), vec!["D"]);
    assert_eq!(built.root.depth(), 3);
    assert_eq!(
        built.report.decision,
        RootDecision::SinglePerson {
            id: "A".to_string()
        }
    );
}

#[test]
fn children_keep_edge_order() {
    let index = people(&["A", "Z", "M", "B"]);
    let edges = vec![edge("A", "Z"), edge("A", "B"), edge("A", "M")];
    let built = build_hierarchy(&index, &edges, &BuildOptions::default()).unwrap();

    assert_eq!(built.root.child_ids(), vec!["Z", "B", "M"]);
}

#[test]
fn every_person_appears_once_without_multi_parent_edges() {
    let index = people(&["A", "B", "C", "D", "E"]);
    let edges = vec![edge("A", "B"), edge("B", "C"), edge("D", "E")];
    let built = build_hierarchy(&index, &edges, &BuildOptions::default()).unwrap();

    let mut ids = built.root.descendant_ids();
    ids.retain(|id| *id != VIRTUAL_ROOT_ID);
    ids.sort_unstable();
    assert_eq!(ids, vec!["A", "B", "C", "D", "E"]);
    assert_eq!(built.root.node_count(), 6);
}

#[test]
fn multi_parent_child_is_attached_under_each_parent_by_default() {
    let index = people(&["M", "F", "K"]);
    let edges = vec![edge("M", "K"), edge("F", "K")];
    let built = build_hierarchy(&index, &edges, &BuildOptions::default()).unwrap();

    assert_eq!(built.root.child_ids(), vec!["M", "F"]);
    assert_eq!(built.root.children[0].child_ids(), vec!["K"]);
    assert_eq!(built.root.children[1].child_ids(), vec!["K"]);
    assert_eq!(built.report.multi_parent_edges_skipped, 0);
}

#[test]
fn first_parent_wins_drops_later_parent_edges() {
    let index = people(&["M", "F", "K"]);
    let edges = vec![edge("M", "K"), edge("F", "K")];
    let options = BuildOptions {
        multi_parent: MultiParentPolicy::FirstParentWins,
        ..BuildOptions::default()
    };
    let built = build_hierarchy(&index, &edges, &options).unwrap();

    assert_eq!(built.root.children[0].child_ids(), vec!["K"]);
    assert!(built.root.children[1].children.is_empty());
    assert_eq!(built.report.multi_parent_edges_skipped, 1);
    assert_eq!(built.report.edges_attached, 1);
}

#[test]
fn edges_naming_unknown_people_do_not_change_the_tree() {
    let index = people(&["A", "B"]);
    let base = build_hierarchy(&index, &[edge("A", "B")], &BuildOptions::default()).unwrap();
    let noisy = build_hierarchy(
        &index,
        &[edge("X", "A"), edge("A", "B"), edge("B", "Y")],
        &BuildOptions::default(),
    )
    .unwrap();

    assert_eq!(base.root, noisy.root);
}

#[test]
fn fully_cyclic_input_falls_back_to_flat_root() {
    let index = people(&["A", "B"]);
    let edges = vec![edge("A", "B"), edge("B", "A")];
    let built = build_hierarchy(&index, &edges, &BuildOptions::default()).unwrap();

    assert!(built.root.is_virtual());
    assert_eq!(built.root.child_ids(), vec!["A", "B"]);
    assert!(built.root.children.iter().all(|child| child.children.is_empty()));
    assert_eq!(built.report.root_candidates, 0);
    assert_eq!(built.report.unreachable_people, 0);
}

#[test]
fn reject_policy_reports_cycle_below_a_root() {
    let index = people(&["R", "A", "B"]);
    let edges = vec![edge("R", "A"), edge("A", "B"), edge("B", "A")];
    let options = BuildOptions {
        cycles: CyclePolicy::Reject,
        ..BuildOptions::default()
    };
    let err = build_hierarchy(&index, &edges, &options).unwrap_err();

    assert_eq!(
        err,
        HierarchyError::CycleDetected {
            parent_id: "B".to_string(),
            child_id: "A".to_string(),
        }
    );
}

#[test]
fn custom_root_label_is_used_for_virtual_root() {
    let index = people(&["A", "B"]);
    let options = BuildOptions {
        root_label: "Gren".to_string(),
        ..BuildOptions::default()
    };
    let built = build_hierarchy(&index, &[], &options).unwrap();

    assert_eq!(built.root.name, "Gren");
}

#[test]
fn lone_person_without_edges_is_returned_as_root() {
    let index = people(&["A"]);
    let built = build_hierarchy(&index, &[], &BuildOptions::default()).unwrap();

    assert_eq!(built.root.id, "A");
    assert!(!built.root.is_virtual());
    assert!(built.root.children.is_empty());
    assert_eq!(
        built.report.decision,
        RootDecision::SinglePerson {
            id: "A".to_string()
        }
    );
}

fn chain(len: usize) -> (PersonIndex, Vec<ParentEdge>) {
    let index = (0..len)
        .map(|position| person(&format!("P{position}"), &format!("Person {position}")))
        .collect::<PersonIndex>();
    let edges = (1..len)
        .map(|position| edge(&format!("P{}", position - 1), &format!("P{position}")))
        .collect();
    (index, edges)
}

#[test]
fn very_deep_chain_builds_without_exhausting_the_stack() {
    let len = 50_000;
    let (index, edges) = chain(len);
    let built = build_hierarchy(&index, &edges, &BuildOptions::default()).unwrap();

    assert_eq!(built.root.id, "P0");
    assert_eq!(built.root.depth(), len);
    assert_eq!(built.root.node_count(), len);
    assert_eq!(built.report.edges_attached, len - 1);
    let last = built.root.find("P49999").unwrap();
    assert!(last.children.is_empty());
    assert_eq!(last.name, "Person 49999");
}

#[test]
fn back_edge_at_the_bottom_of_a_deep_chain_is_truncated() {
    let len = 50_000;
    let (index, mut edges) = chain(len);
    edges.push(edge("P49999", "P25000"));
    let built = build_hierarchy(&index, &edges, &BuildOptions::default()).unwrap();

    assert_eq!(built.root.depth(), len);
    assert_eq!(built.report.cycle_edges_truncated, 1);
    assert_eq!(built.report.unreachable_people, 0);

    let options = BuildOptions {
        cycles: CyclePolicy::Reject,
        ..BuildOptions::default()
    };
    let err = build_hierarchy(&index, &edges, &options).unwrap_err();
    assert_eq!(
        err,
        HierarchyError::CycleDetected {
            parent_id: "P49999".to_string(),
            child_id: "P25000".to_string(),
        }
    );
}
