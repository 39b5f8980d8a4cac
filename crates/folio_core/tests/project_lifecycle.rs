use folio_core::db::open_db_in_memory;
use folio_core::{
    Project, ProjectDraft, ProjectId, ProjectStore, SqliteKvRepository, StoreError,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn store(conn: &Connection) -> ProjectStore<SqliteKvRepository<'_>> {
    let repo = SqliteKvRepository::try_new(conn).unwrap();
    ProjectStore::load(repo).unwrap()
}

fn draft(title: &str, description: &str) -> ProjectDraft {
    ProjectDraft {
        title: title.to_string(),
        description: description.to_string(),
        ..ProjectDraft::default()
    }
}

fn id_union(store: &ProjectStore<SqliteKvRepository<'_>>) -> HashSet<ProjectId> {
    store
        .active()
        .iter()
        .chain(store.recycled().iter())
        .map(|project: &Project| project.id)
        .collect()
}

#[test]
fn create_assigns_unique_ids_and_persists() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let first = store.create(draft("One", "first")).unwrap();
    let second = store.create(draft("Two", "second")).unwrap();
    assert_ne!(first.id, second.id);
    assert!(second.id > first.id);

    // A fresh store over the same connection sees the persisted data.
    let reloaded = self::store(&conn);
    assert_eq!(reloaded.active().len(), 2);
    assert_eq!(reloaded.active()[0].title, "One");
}

#[test]
fn duplicate_create_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let mut portfolio = draft("Portfolio", "demo site");
    portfolio.technologies = vec!["HTML".to_string(), "CSS".to_string()];
    store.create(portfolio).unwrap();

    let err = store.create(draft("Portfolio", "demo site")).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));
    assert_eq!(store.active().len(), 1);
}

#[test]
fn duplicate_check_considers_images() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let mut with_image = draft("Site", "desc");
    with_image.image = Some("a.png".to_string());
    store.create(with_image).unwrap();

    // Same text but a different image is a distinct project.
    let mut other_image = draft("Site", "desc");
    other_image.image = Some("b.png".to_string());
    store.create(other_image).unwrap();

    // No image at all still collides with the existing text.
    let err = store.create(draft("Site", "desc")).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));
}

#[test]
fn blank_required_fields_are_rejected_without_state_change() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let err = store.create(draft("  ", "desc")).unwrap_err();
    assert!(matches!(err, StoreError::MissingField("title")));
    let err = store.create(draft("title", " ")).unwrap_err();
    assert!(matches!(err, StoreError::MissingField("description")));
    assert!(store.active().is_empty());
}

#[test]
fn update_replaces_fields_and_preserves_id() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let created = store.create(draft("Old", "old desc")).unwrap();
    let mut edit = draft("New", "new desc");
    edit.demo = Some("https://example.com".to_string());
    let updated = store.update(created.id, edit).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "New");
    assert_eq!(updated.demo.as_deref(), Some("https://example.com"));
    assert_eq!(store.active().len(), 1);
}

#[test]
fn update_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let err = store.update(12345, draft("a", "b")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn records_are_conserved_across_operations() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let a = store.create(draft("A", "a")).unwrap();
    let b = store.create(draft("B", "b")).unwrap();
    let before = id_union(&store);

    store.delete(a.id).unwrap();
    assert_eq!(id_union(&store), before);

    store.update(b.id, draft("B2", "b2")).unwrap();
    assert_eq!(id_union(&store), before);

    store.restore().unwrap();
    assert_eq!(id_union(&store), before);

    let c = store.create(draft("C", "c")).unwrap();
    let mut expected = before.clone();
    expected.insert(c.id);
    assert_eq!(id_union(&store), expected);
}

#[test]
fn delete_then_restore_round_trips_and_second_restore_rejects() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    store.create(draft("Keep", "stays")).unwrap();
    let doomed = store.create(draft("Doomed", "goes")).unwrap();
    let active_before: Vec<ProjectId> =
        store.active().iter().map(|project| project.id).collect();

    let outcome = store.delete(doomed.id).unwrap();
    assert!(outcome.restorable);
    assert!(store.restore_available());

    let restored = store.restore().unwrap();
    assert_eq!(restored.id, doomed.id);
    let active_after: Vec<ProjectId> =
        store.active().iter().map(|project| project.id).collect();
    assert_eq!(active_after, active_before);

    let err = store.restore().unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn restore_applies_to_most_recent_deletion_only() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let a = store.create(draft("A", "a")).unwrap();
    let b = store.create(draft("B", "b")).unwrap();

    store.delete(a.id).unwrap();
    store.delete(b.id).unwrap();

    let restored = store.restore().unwrap();
    assert_eq!(restored.id, b.id);

    // A is reachable only through the recycle bin now.
    assert!(store.active().iter().all(|project| project.id != a.id));
    assert!(store.recycled().iter().any(|project| project.id == a.id));
}

#[test]
fn deletes_after_a_used_restore_are_not_restorable() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let a = store.create(draft("A", "a")).unwrap();
    let b = store.create(draft("B", "b")).unwrap();

    store.delete(a.id).unwrap();
    store.restore().unwrap();

    let outcome = store.delete(b.id).unwrap();
    assert!(!outcome.restorable);
    assert!(!store.restore_available());
    assert!(matches!(
        store.restore().unwrap_err(),
        StoreError::NotFound(_)
    ));
}

#[test]
fn saving_a_project_rearms_the_undo_cycle() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let a = store.create(draft("A", "a")).unwrap();
    store.delete(a.id).unwrap();
    store.restore().unwrap();

    // A fresh save resets the consumed cycle...
    let b = store.create(draft("B", "b")).unwrap();
    assert!(!store.restore_available());

    // ...so the next single delete is restorable again.
    let outcome = store.delete(b.id).unwrap();
    assert!(outcome.restorable);
    assert_eq!(store.restore().unwrap().id, b.id);
}

#[test]
fn restored_project_remains_in_recycle_bin() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let a = store.create(draft("A", "a")).unwrap();
    store.delete(a.id).unwrap();
    store.restore().unwrap();

    assert!(store.active().iter().any(|project| project.id == a.id));
    assert!(store.recycled().iter().any(|project| project.id == a.id));
}

#[test]
fn clear_all_moves_everything_and_logs_each_project() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    store.create(draft("A", "a")).unwrap();
    store.create(draft("B", "b")).unwrap();
    store.create(draft("C", "c")).unwrap();

    let moved = store.clear_all().unwrap();
    assert_eq!(moved, 3);
    assert!(store.active().is_empty());
    assert_eq!(store.recycled().len(), 3);
    assert_eq!(store.logs().len(), 3);
    assert_eq!(store.logs()[0].title, "A");

    // Bulk clear itself is not restorable, but it re-arms the cycle.
    assert!(!store.restore_available());
    let d = store.create(draft("D", "d")).unwrap();
    let outcome = store.delete(d.id).unwrap();
    assert!(outcome.restorable);
}

#[test]
fn delete_appends_exactly_one_log_entry() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let a = store.create(draft("Logged", "entry")).unwrap();
    store.delete(a.id).unwrap();

    assert_eq!(store.logs().len(), 1);
    assert_eq!(store.logs()[0].title, "Logged");
    assert!(!store.logs()[0].time.is_empty());
}

#[test]
fn purge_and_clear_log_are_irreversible() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let a = store.create(draft("A", "a")).unwrap();
    store.delete(a.id).unwrap();

    assert_eq!(store.purge_recycle_bin().unwrap(), 1);
    assert!(store.recycled().is_empty());

    store.clear_log().unwrap();
    assert!(store.logs().is_empty());

    let reloaded = self::store(&conn);
    assert!(reloaded.recycled().is_empty());
    assert!(reloaded.logs().is_empty());
}

#[test]
fn filter_matches_title_description_and_technologies() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let mut site = draft("Portfolio", "personal site");
    site.technologies = vec!["HTML".to_string(), "CSS".to_string()];
    store.create(site).unwrap();
    store.create(draft("Compiler", "toy language")).unwrap();

    assert_eq!(store.filtered("css").len(), 1);
    assert_eq!(store.filtered("TOY").len(), 1);
    assert_eq!(store.filtered("").len(), 2);
    assert!(store.filtered("python").is_empty());
}

#[test]
fn id_generator_is_seeded_past_recycled_records() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store(&conn);

    let a = store.create(draft("A", "a")).unwrap();
    store.delete(a.id).unwrap();

    // Reload: the only record lives in the recycle bin, yet new ids must
    // still advance past it.
    let mut reloaded = self::store(&conn);
    let b = reloaded.create(draft("B", "b")).unwrap();
    assert!(b.id > a.id);
}
