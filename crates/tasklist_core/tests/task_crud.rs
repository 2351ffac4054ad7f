use tasklist_core::db::open_db_in_memory;
use tasklist_core::{RepoError, SqliteTaskRepository, Task, TaskRepository, TaskValidationError};

#[test]
fn add_returns_monotonic_ids_and_list_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let first = repo.add("Buy milk").unwrap();
    let second = repo.add("  Walk dog  ").unwrap();
    assert!(second > first);

    let tasks = repo.list().unwrap();
    assert_eq!(
        tasks,
        vec![Task::new(first, "Buy milk"), Task::new(second, "Walk dog")]
    );
}

#[test]
fn update_replaces_description_of_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let a = repo.add("A").unwrap();
    let b = repo.add("B").unwrap();

    assert!(repo.update(b, "B2").unwrap());

    assert_eq!(
        repo.list().unwrap(),
        vec![Task::new(a, "A"), Task::new(b, "B2")]
    );
}

#[test]
fn update_missing_row_returns_false() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    assert!(!repo.update(42, "ghost").unwrap());
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn update_with_blank_text_fails_and_keeps_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let id = repo.add("keep me").unwrap();

    let err = repo.update(id, "   ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TaskValidationError::EmptyDescription)
    ));
    assert_eq!(repo.get(id).unwrap().unwrap().description, "keep me");
}

#[test]
fn add_with_blank_text_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    assert!(matches!(repo.add("\t\n"), Err(RepoError::Validation(_))));
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn delete_removes_row_and_ignores_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let a = repo.add("A").unwrap();
    let b = repo.add("B").unwrap();

    repo.delete(a).unwrap();
    repo.delete(a).unwrap();
    repo.delete(999).unwrap();

    assert_eq!(repo.list().unwrap(), vec![Task::new(b, "B")]);
    assert!(repo.get(a).unwrap().is_none());
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let a = repo.add("A").unwrap();
    let b = repo.add("B").unwrap();
    repo.delete(b).unwrap();

    let c = repo.add("C").unwrap();
    assert!(c > b);
    assert!(c > a);
}

#[test]
fn list_rejects_null_description_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO tasks (description) VALUES (NULL);", [])
        .unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let err = repo.list().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("NULL")));
}
