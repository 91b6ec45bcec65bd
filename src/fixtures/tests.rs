use super::*;

#[test]
fn full_fixture_parses() {
    let fixture = FixtureDefinition::from_json(
        r#"{"startpos":"startA","moves":["m1","m2","m3"],"nodes":[{"depth":2,"nodes":20},{"depth":3,"nodes":180}]}"#,
    )
    .unwrap();
    assert_eq!(fixture.startpos, "startA");
    assert_eq!(fixture.moves, vec!["m1", "m2", "m3"]);
    assert_eq!(
        fixture.nodes,
        vec![
            NodeExpectation { depth: 2, nodes: 20 },
            NodeExpectation {
                depth: 3,
                nodes: 180
            },
        ]
    );
}

#[test]
fn moves_and_nodes_are_optional() {
    let fixture = FixtureDefinition::from_json(r#"{"startpos":"9/9/9 b - 1"}"#).unwrap();
    assert!(fixture.moves.is_empty());
    assert!(fixture.nodes.is_empty());
}

#[test]
fn null_lists_read_as_empty() {
    let fixture =
        FixtureDefinition::from_json(r#"{"startpos":"mate","moves":null,"nodes":null}"#).unwrap();
    assert_eq!(fixture.startpos, "mate");
    assert!(fixture.moves.is_empty());
    assert!(fixture.nodes.is_empty());
}

#[test]
fn wrongly_typed_lists_are_rejected() {
    assert!(FixtureDefinition::from_json(r#"{"startpos":"s","moves":"m1"}"#).is_err());
    assert!(FixtureDefinition::from_json(r#"{"startpos":"s","nodes":{"depth":2}}"#).is_err());
}

#[test]
fn startpos_is_required() {
    assert!(FixtureDefinition::from_json(r#"{"moves":["m1"]}"#).is_err());
}

#[test]
fn discover_lists_files_sorted_and_skips_directories() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.json"), "{}").unwrap();
    fs::write(dir.path().join("a.json"), "{}").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();

    let entries = FixtureCatalog::new(dir.path()).discover().unwrap();
    let labels: Vec<&str> = entries.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, vec!["a.json", "b.json"]);
    assert_eq!(entries[0].path, dir.path().join("a.json"));
}

#[test]
fn discover_on_missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = FixtureCatalog::new(dir.path().join("absent"))
        .discover()
        .unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn single_entry_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("startpos.json"), "{}").unwrap();
    let catalog = FixtureCatalog::new(dir.path());

    let entry = catalog.entry("startpos.json").unwrap();
    assert_eq!(entry.label, "startpos.json");

    let err = catalog.entry("missing.json").unwrap_err();
    assert!(matches!(err, SuiteError::EnumerationFailed { .. }));
}

#[test]
fn single_entry_that_is_a_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested.json")).unwrap();

    let err = FixtureCatalog::new(dir.path()).entry("nested.json").unwrap_err();
    assert!(err.is_fatal());
}

#[cfg(unix)]
#[test]
fn single_entry_that_cannot_be_opened_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked.json");
    fs::write(&locked, r#"{"startpos":"s"}"#).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&locked).is_ok() {
        // permission bits are not enforced for this user (root)
        return;
    }

    let err = FixtureCatalog::new(dir.path()).entry("locked.json").unwrap_err();
    match err {
        SuiteError::EnumerationFailed { path, details } => {
            assert_eq!(path, locked);
            assert!(details.contains("ermission denied"), "details: {details}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn load_distinguishes_unreadable_from_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"startpos\":").unwrap();

    let err = FixtureEntry::from_path(&broken).load().unwrap_err();
    assert!(matches!(err, SuiteError::FixtureMalformed { .. }));
    assert!(!err.is_fatal());

    let err = FixtureEntry::from_path(dir.path().join("gone.json"))
        .load()
        .unwrap_err();
    assert!(matches!(err, SuiteError::FixtureUnreadable { .. }));
}
