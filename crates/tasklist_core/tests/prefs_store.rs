use std::collections::BTreeSet;
use tasklist_core::{PreferenceFile, PreferenceTaskStore, StoreError, TaskStore};

fn prefs_in(dir: &tempfile::TempDir) -> PreferenceFile {
    PreferenceFile::new(dir.path().join("myDatabase.json"), "tasks_value")
}

fn as_set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().collect()
}

#[test]
fn load_returns_empty_when_nothing_stored() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = prefs_in(&dir);

    assert!(prefs.load().unwrap().is_empty());
}

#[test]
fn save_then_load_round_trips_as_a_set() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = prefs_in(&dir);

    prefs.save(["Walk dog", "Buy milk", "Walk dog"]).unwrap();
    let loaded = prefs.load().unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(
        as_set(loaded.clone()),
        as_set(vec!["Buy milk".to_string(), "Walk dog".to_string()])
    );

    prefs.save(&loaded).unwrap();
    assert_eq!(as_set(prefs.load().unwrap()), as_set(loaded));
}

#[test]
fn save_overwrites_previous_collection_and_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = prefs_in(&dir);
    std::fs::write(prefs.path(), r#"{"theme":"dark","tasks_value":["old"]}"#).unwrap();

    prefs.save(["new"]).unwrap();

    assert_eq!(prefs.load().unwrap(), vec!["new".to_string()]);
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(prefs.path()).unwrap()).unwrap();
    assert_eq!(raw["theme"], "dark");
}

#[test]
fn load_rejects_wrong_value_shape() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = prefs_in(&dir);
    std::fs::write(prefs.path(), r#"{"tasks_value":"not a set"}"#).unwrap();

    assert!(matches!(prefs.load(), Err(StoreError::Format { .. })));
}

#[test]
fn task_store_assigns_session_ids_and_persists_each_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = PreferenceTaskStore::new(prefs_in(&dir));
    assert!(store.load().unwrap().is_empty());

    let milk = store.add("Buy milk").unwrap();
    let dog = store.add("Walk dog").unwrap();
    assert_ne!(milk, dog);

    assert!(store.update(dog, "Walk the dog").unwrap());
    assert!(!store.update(999, "nothing").unwrap());
    store.delete(milk).unwrap();
    store.delete(milk).unwrap();

    assert_eq!(prefs_in(&dir).load().unwrap(), vec!["Walk the dog".to_string()]);
}

#[test]
fn task_store_rejects_duplicates_without_touching_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = PreferenceTaskStore::new(prefs_in(&dir));
    store.load().unwrap();
    store.add("A").unwrap();
    let b = store.add("B").unwrap();

    assert!(matches!(store.add(" A "), Err(StoreError::DuplicateDescription)));
    assert!(matches!(
        store.update(b, "A"),
        Err(StoreError::DuplicateDescription)
    ));
    assert_eq!(
        as_set(prefs_in(&dir).load().unwrap()),
        as_set(vec!["A".to_string(), "B".to_string()])
    );
}

#[test]
fn task_store_load_normalizes_legacy_values() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = prefs_in(&dir);
    prefs.save(["  padded ", "", "padded", "ok"]).unwrap();

    let mut store = PreferenceTaskStore::new(prefs_in(&dir));
    let tasks = store.load().unwrap();

    let descriptions: BTreeSet<String> =
        tasks.into_iter().map(|task| task.description).collect();
    assert_eq!(
        descriptions,
        as_set(vec!["ok".to_string(), "padded".to_string()])
    );
    assert_eq!(as_set(prefs.load().unwrap()), descriptions);
}

#[test]
fn task_store_load_writes_back_trimmed_values_when_count_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = prefs_in(&dir);
    prefs.save(["  Buy milk ", "Walk dog"]).unwrap();

    let mut store = PreferenceTaskStore::new(prefs_in(&dir));
    let in_memory: BTreeSet<String> = store
        .load()
        .unwrap()
        .into_iter()
        .map(|task| task.description)
        .collect();

    assert_eq!(
        in_memory,
        as_set(vec!["Buy milk".to_string(), "Walk dog".to_string()])
    );
    assert_eq!(as_set(prefs.load().unwrap()), in_memory);
}
