use folio_core::db::open_db_in_memory;
use folio_core::{MessageStore, SqliteKvRepository, StoreError};
use rusqlite::Connection;

fn store(conn: &Connection) -> MessageStore<SqliteKvRepository<'_>> {
    let repo = SqliteKvRepository::try_new(conn).unwrap();
    MessageStore::load(repo).unwrap()
}

#[test]
fn append_assigns_ids_and_dates() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let first = store.append("Ada", "ada@example.com", "hello").unwrap();
    let second = store.append("Bob", "bob@example.com", "hi").unwrap();

    assert!(second.id > first.id);
    assert!(!first.date.is_empty());
    assert_eq!(store.messages().len(), 2);
}

#[test]
fn append_requires_every_field() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    assert!(matches!(
        store.append(" ", "a@b.c", "x").unwrap_err(),
        StoreError::MissingField("name")
    ));
    assert!(matches!(
        store.append("A", "", "x").unwrap_err(),
        StoreError::MissingField("email")
    ));
    assert!(matches!(
        store.append("A", "a@b.c", "  ").unwrap_err(),
        StoreError::MissingField("message")
    ));
    assert!(store.messages().is_empty());
}

#[test]
fn delete_is_hard_and_by_id() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let message = store.append("Ada", "ada@example.com", "hello").unwrap();
    let removed = store.delete(message.id).unwrap();
    assert_eq!(removed.id, message.id);
    assert!(store.messages().is_empty());

    let err = store.delete(message.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn messages_persist_across_reload() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);
    store.append("Ada", "ada@example.com", "hello").unwrap();

    let reloaded = self::store(&conn);
    assert_eq!(reloaded.messages().len(), 1);
    assert_eq!(reloaded.messages()[0].name, "Ada");
}
