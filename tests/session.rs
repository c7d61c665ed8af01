use tak_tools::button::{ShelfButtonRecord, SourceType};
use tak_tools::error::ShelfError;
use tak_tools::executor::{Invocation, RecordingExecutor};
use tak_tools::session::{SessionOptions, ToolSession};
use tak_tools::shelf::{Direction, ShelfId};
use tak_tools::store::ShelfStore;
use tempfile::tempdir;

fn open(dir: &std::path::Path, options: SessionOptions) -> (ToolSession, RecordingExecutor) {
    let exec = RecordingExecutor::new();
    let session = ToolSession::open(ShelfStore::new(dir), Box::new(exec.clone()), options).unwrap();
    (session, exec)
}

#[test]
fn edits_are_saved_on_close_and_reloaded() {
    let dir = tempdir().unwrap();
    ShelfStore::init(dir.path()).unwrap();

    let (mut session, _) = open(dir.path(), SessionOptions::default());
    let id = session.add_shelf("Rigging", "Build").unwrap();
    session
        .add_button(
            &id,
            ShelfButtonRecord::new("Create Controller", "makeCtrl;", SourceType::Mel),
        )
        .unwrap();
    assert!(session.is_dirty());
    let expected = session.registry().clone();
    assert!(session.close().is_ok());

    let (session, _) = open(dir.path(), SessionOptions::default());
    assert_eq!(session.registry(), &expected);
    assert!(!session.is_dirty());
}

#[test]
fn running_a_search_result_executes_and_counts() {
    let dir = tempdir().unwrap();
    ShelfStore::init(dir.path()).unwrap();
    let (mut session, exec) = open(dir.path(), SessionOptions::default());
    session
        .add_button(
            &ShelfId::Common,
            ShelfButtonRecord::new("Reload Scene", "reload()", SourceType::Python),
        )
        .unwrap();

    let hit = session.run_first_result("reload").unwrap();
    assert_eq!(hit.record.label, "Reload Scene");
    assert_eq!(
        exec.invocations(),
        vec![Invocation {
            command: "reload()".into(),
            language: SourceType::Python,
        }]
    );
    assert_eq!(session.usage().count(&ShelfId::Common, "Reload Scene"), 1);
    assert_eq!(session.history().queries(), vec!["reload"]);

    assert!(session.run_first_result("nothing matches this").is_none());
    assert_eq!(exec.invocations().len(), 1);
}

#[test]
fn preview_does_not_touch_history() {
    let dir = tempdir().unwrap();
    ShelfStore::init(dir.path()).unwrap();
    let (mut session, _) = open(dir.path(), SessionOptions::default());
    session
        .add_button(
            &ShelfId::Common,
            ShelfButtonRecord::new("Bake", "bake()", SourceType::Python),
        )
        .unwrap();

    assert_eq!(session.preview("bak").len(), 1);
    assert!(session.history().is_empty());
    assert_eq!(session.search("bak").len(), 1);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn history_respects_configured_limit() {
    let dir = tempdir().unwrap();
    ShelfStore::init(dir.path()).unwrap();
    let options = SessionOptions {
        history_limit: 3,
        ..SessionOptions::default()
    };
    let (mut session, _) = open(dir.path(), options);
    for q in ["a", "b", "c", "d", "b"] {
        session.search(q);
    }
    assert_eq!(session.history().queries(), vec!["b", "d", "c"]);
}

#[test]
fn renaming_a_button_keeps_its_usage() {
    let dir = tempdir().unwrap();
    ShelfStore::init(dir.path()).unwrap();
    let (mut session, _) = open(dir.path(), SessionOptions::default());
    let common = ShelfId::Common;
    session
        .add_button(&common, ShelfButtonRecord::new("Old", "pass", SourceType::Python))
        .unwrap();
    session.run_button(&common, "Old").unwrap();
    session.run_button(&common, "Old").unwrap();
    session.rename_button(&common, "Old", "New").unwrap();
    assert_eq!(session.usage().count(&common, "New"), 2);
    assert_eq!(session.usage().count(&common, "Old"), 0);

    let copy = session.duplicate_button(&common, "New").unwrap();
    assert_eq!(copy, "New 1");
    assert_eq!(session.registry().common().len(), 2);
}

#[test]
fn failed_edit_leaves_session_clean() {
    let dir = tempdir().unwrap();
    ShelfStore::init(dir.path()).unwrap();
    let (mut session, _) = open(dir.path(), SessionOptions::default());
    assert!(session.delete_shelf(&ShelfId::Common).is_err());
    assert!(!session.is_dirty());
}

#[test]
fn opening_a_missing_folder_is_fatal() {
    let dir = tempdir().unwrap();
    let res = ToolSession::open(
        ShelfStore::new(dir.path().join("missing")),
        Box::new(RecordingExecutor::new()),
        SessionOptions::default(),
    );
    assert!(res.err().map(|e| e.is_fatal()).unwrap_or(false));
}

#[test]
fn failed_close_hands_the_session_back() {
    let root = tempdir().unwrap();
    let shelves = root.path().join("shelves");
    ShelfStore::init(&shelves).unwrap();
    let (mut session, _) = open(&shelves, SessionOptions::default());
    session
        .add_button(
            &ShelfId::Common,
            ShelfButtonRecord::new("Bake", "bake()", SourceType::Python),
        )
        .unwrap();

    std::fs::remove_dir_all(&shelves).unwrap();
    let Err((session, err)) = session.close() else {
        panic!("closing without a shelf folder should fail");
    };
    assert!(matches!(err, ShelfError::Io { .. }));
    assert!(session.is_dirty());

    std::fs::create_dir_all(&shelves).unwrap();
    assert!(session.close().is_ok());
    let (reopened, _) = open(&shelves, SessionOptions::default());
    assert!(reopened.registry().common().contains("Bake"));
}

#[test]
fn shelf_named_like_a_broken_file_is_refused() {
    let dir = tempdir().unwrap();
    ShelfStore::init(dir.path()).unwrap();
    let broken = dir.path().join("Rig_Build.json");
    std::fs::write(&broken, "{ trailing, }").unwrap();

    let (mut session, _) = open(dir.path(), SessionOptions::default());
    assert_eq!(session.skipped_files().len(), 1);
    let err = session.add_shelf("Rig", "Build").unwrap_err();
    assert!(matches!(err, ShelfError::OverwritesSkipped { .. }));

    let skin = session.add_shelf("Rig", "Skin").unwrap();
    let err = session.rename_shelf(&skin, "Rig", "Build").unwrap_err();
    assert!(matches!(err, ShelfError::OverwritesSkipped { .. }));
    assert!(session.registry().contains(&skin));

    session.save().unwrap();
    assert_eq!(std::fs::read_to_string(&broken).unwrap(), "{ trailing, }");
}

#[test]
fn moves_at_the_boundary_leave_session_clean() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("common.json"), r#"{"shelfButtonInfos": [{"label": "Bake"}]}"#)
        .unwrap();
    std::fs::write(
        dir.path().join("Rig_Build.json"),
        r#"{"order": "00", "tabName": "Rig", "frameName": "Build", "shelfButtonInfos": []}"#,
    )
    .unwrap();
    let (mut session, _) = open(dir.path(), SessionOptions::default());

    let build = ShelfId::task("Rig", "Build");
    assert!(!session.reorder_shelf(&build, Direction::Up).unwrap());
    assert!(!session
        .move_button(&ShelfId::Common, "Bake", Direction::Down)
        .unwrap());
    assert!(!session.is_dirty());
}
