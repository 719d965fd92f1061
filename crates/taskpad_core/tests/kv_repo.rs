use rusqlite::Connection;
use taskpad_core::db::migrations::latest_version;
use taskpad_core::db::open_db_in_memory;
use taskpad_core::{
    KeyValueRepository, MemoryKeyValueRepository, RepoError, SqliteKeyValueRepository,
};

#[test]
fn get_missing_key_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();

    assert_eq!(repo.get_item("tasks").unwrap(), None);
}

#[test]
fn set_item_upserts_single_row_per_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();

    repo.set_item("tasks", "[]").unwrap();
    repo.set_item("tasks", r#"[{"id":"a"}]"#).unwrap();

    assert_eq!(
        repo.get_item("tasks").unwrap().as_deref(),
        Some(r#"[{"id":"a"}]"#)
    );
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn remove_item_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();

    repo.set_item("tasks", "[]").unwrap();
    repo.remove_item("tasks").unwrap();
    repo.remove_item("tasks").unwrap();

    assert_eq!(repo.get_item("tasks").unwrap(), None);
}

#[test]
fn keys_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();

    repo.set_item("tasks", "one").unwrap();
    repo.set_item("archive", "two").unwrap();

    assert_eq!(repo.get_item("tasks").unwrap().as_deref(), Some("one"));
    assert_eq!(repo.get_item("archive").unwrap().as_deref(), Some("two"));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKeyValueRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteKeyValueRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("kv_entries"))
    ));
}

#[test]
fn memory_repository_follows_same_contract() {
    let repo = MemoryKeyValueRepository::new();
    assert!(repo.is_empty());

    repo.set_item("tasks", "[]").unwrap();
    repo.set_item("tasks", "[1]").unwrap();
    assert_eq!(repo.len(), 1);
    assert_eq!(repo.get_item("tasks").unwrap().as_deref(), Some("[1]"));

    repo.remove_item("tasks").unwrap();
    repo.remove_item("tasks").unwrap();
    assert_eq!(repo.get_item("tasks").unwrap(), None);
}
