use tak_tools::button::{ShelfButtonRecord, SourceType};
use tak_tools::registry::ShelfRegistry;
use tak_tools::search::{search, SEARCH_LIMIT};
use tak_tools::shelf::ShelfId;

fn rigging_registry() -> ShelfRegistry {
    let mut reg = ShelfRegistry::new();
    reg.add_shelf("Rigging", "Build").unwrap();
    reg.add_button(
        &ShelfId::task("Rigging", "Build"),
        ShelfButtonRecord::new("Create Controller", "make_ctrl()", SourceType::Python)
            .with_annotation("Build a control curve"),
    )
    .unwrap();
    reg
}

#[test]
fn substring_of_label_is_found() {
    let reg = rigging_registry();
    let hits = search(&reg, "control", SEARCH_LIMIT);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].shelf, ShelfId::task("Rigging", "Build"));
    assert_eq!(hits[0].record.label, "Create Controller");
    assert!(hits[0].score >= 50);
}

#[test]
fn empty_query_returns_nothing() {
    let reg = rigging_registry();
    assert!(search(&reg, "", SEARCH_LIMIT).is_empty());
    assert!(search(&reg, "   ", SEARCH_LIMIT).is_empty());
}

#[test]
fn exact_label_outranks_substring() {
    let mut reg = ShelfRegistry::new();
    let common = ShelfId::Common;
    for label in ["Bake Keys", "bake", "Rebake"] {
        reg.add_button(
            &common,
            ShelfButtonRecord::new(label, "pass", SourceType::Python),
        )
        .unwrap();
    }
    let hits = search(&reg, "Bake", SEARCH_LIMIT);
    let labels: Vec<&str> = hits.iter().map(|h| h.record.label.as_str()).collect();
    assert_eq!(labels, vec!["bake", "Bake Keys", "Rebake"]);
}

#[test]
fn command_only_match_is_found() {
    let mut reg = ShelfRegistry::new();
    reg.add_button(
        &ShelfId::Common,
        ShelfButtonRecord::new("Tool", "cmds.polyCube()", SourceType::Python),
    )
    .unwrap();
    let hits = search(&reg, "POLYCUBE", SEARCH_LIMIT);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 10);
}

#[test]
fn results_are_capped_after_ranking() {
    let mut reg = ShelfRegistry::new();
    let common = ShelfId::Common;
    // Weak matches first so an early cut would drop the strong ones.
    for i in 0..150 {
        reg.add_button(
            &common,
            ShelfButtonRecord::new(format!("Tool {i}"), "select_all()", SourceType::Mel),
        )
        .unwrap();
    }
    for i in 0..5 {
        reg.add_button(
            &common,
            ShelfButtonRecord::new(format!("Select {i}"), "pass", SourceType::Python),
        )
        .unwrap();
    }

    let hits = search(&reg, "select", SEARCH_LIMIT);
    assert_eq!(hits.len(), SEARCH_LIMIT);
    let strong: Vec<&str> = hits[..5].iter().map(|h| h.record.label.as_str()).collect();
    assert_eq!(strong, vec!["Select 0", "Select 1", "Select 2", "Select 3", "Select 4"]);
    assert!(hits[5..].iter().all(|h| h.score == 10));
}

#[test]
fn ties_keep_discovery_order() {
    let mut reg = ShelfRegistry::new();
    reg.add_shelf("Anim", "Keys").unwrap();
    let keys = ShelfId::task("Anim", "Keys");
    reg.add_button(&keys, ShelfButtonRecord::new("x", "run_tool()", SourceType::Python))
        .unwrap();
    reg.add_button(
        &ShelfId::Common,
        ShelfButtonRecord::new("y", "run_tool()", SourceType::Python),
    )
    .unwrap();
    let hits = search(&reg, "run_tool", SEARCH_LIMIT);
    let shelves: Vec<&ShelfId> = hits.iter().map(|h| &h.shelf).collect();
    assert_eq!(shelves, vec![&ShelfId::Common, &keys]);
}
