use rollcall::config::Config;
use rollcall::core::event_data::{EventDataLogic, parse_field};
use rollcall::core::log::LogLogic;
use rollcall::db::migrate::{Schema, run_pending_migrations};
use rollcall::db::pool::DbPool;
use rollcall::errors::{AppError, StoreTier};
use rollcall::store::live::{attendees_key, checked_in_key};
use rollcall::store::memory::{MemoryRecordStore, MemorySetStore};
use rollcall::store::sqlite::{SqliteRecordStore, SqliteSetStore};
use rollcall::store::{IdentityStore, LiveWindow, RecordStore, SetStore};
use serde_json::{Map, Value, json};
use std::sync::Arc;

mod common;
use common::{REGISTERED_A, WALK_IN, seeded_identity};

fn exercise_set_store(sets: &dyn SetStore) {
    assert!(!sets.exists("k").unwrap());
    assert!(sets.add("k", 1).unwrap());
    assert!(!sets.add("k", 1).unwrap());
    assert!(sets.add("k", 2).unwrap());
    assert!(sets.contains("k", 2).unwrap());
    assert_eq!(sets.members("k").unwrap().into_iter().collect::<Vec<_>>(), vec![1, 2]);

    assert!(sets.remove("k", 1).unwrap());
    assert!(!sets.remove("k", 1).unwrap());
    assert!(!sets.remove("missing", 1).unwrap());

    sets.delete("k").unwrap();
    assert!(!sets.exists("k").unwrap());
    assert!(sets.members("k").unwrap().is_empty());
}

#[test]
fn test_memory_set_store_semantics() {
    exercise_set_store(&MemorySetStore::new());
}

#[test]
fn test_sqlite_set_store_semantics() {
    exercise_set_store(&SqliteSetStore::in_memory().unwrap());
}

#[test]
fn test_live_window_uses_two_named_sets() {
    let sets = Arc::new(MemorySetStore::new());
    let window = LiveWindow::new(sets.clone());

    window.add_present(1, 10).unwrap();
    window.add_present(1, 20).unwrap();
    window.remove_present(1, 10).unwrap();

    assert_eq!(checked_in_key(1), "event:1:checkedIn");
    assert_eq!(attendees_key(1), "event:1:attendees");
    assert!(!sets.contains(&checked_in_key(1), 10).unwrap());
    assert!(sets.contains(&attendees_key(1), 10).unwrap());
    assert!(window.is_present(1, 20).unwrap());

    // other events are untouched
    assert!(!window.has_window(2).unwrap());

    window.clear_window(1).unwrap();
    assert!(!window.has_window(1).unwrap());
    assert!(window.list_ever_present(1).unwrap().is_empty());
}

#[test]
fn test_live_window_survives_reopen_of_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("live.sqlite").to_string_lossy().to_string();

    {
        let window = LiveWindow::new(Arc::new(SqliteSetStore::open(&path).unwrap()));
        window.add_present(5, 10).unwrap();
    }

    let window = LiveWindow::new(Arc::new(SqliteSetStore::open(&path).unwrap()));
    assert!(window.is_present(5, 10).unwrap());
}

#[test]
fn test_migrations_are_applied_once() {
    for schema in [Schema::Identity, Schema::Records, Schema::Live] {
        let pool = DbPool::in_memory().unwrap();
        let first = run_pending_migrations(&pool.conn, schema).unwrap();
        assert!(first > 0, "{} had no migrations", schema.name());
        assert_eq!(run_pending_migrations(&pool.conn, schema).unwrap(), 0);
    }
}

#[test]
fn test_open_fails_as_store_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    // a directory cannot be opened as a database file
    let path = dir.path().to_string_lossy().to_string();

    match SqliteRecordStore::open(&path) {
        Err(AppError::StoreUnavailable { tier, .. }) => assert_eq!(tier.to_string(), "records"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("opening a directory should fail"),
    }
}

#[test]
fn test_custom_fields_roundtrip_and_merge() {
    let (identity, event) = seeded_identity();
    let records = MemoryRecordStore::new();

    let loaded = EventDataLogic::load(&*identity, &records, event).unwrap();
    assert_eq!(loaded.location, "Main hall");
    assert!(loaded.custom_fields.is_empty());

    let mut set = Map::new();
    set.insert("capacity".into(), json!(120));
    set.insert("catering".into(), json!("pizza"));
    let updated =
        EventDataLogic::update(&*identity, &records, event, set, &[], false).unwrap();
    assert_eq!(updated.custom_fields["capacity"], json!(120));

    let mut set = Map::new();
    set.insert("room".into(), json!("B2"));
    let updated = EventDataLogic::update(
        &*identity,
        &records,
        event,
        set,
        &["catering".to_string()],
        false,
    )
    .unwrap();
    assert_eq!(updated.custom_fields.len(), 2);
    assert!(updated.custom_fields.get("catering").is_none());

    let cleared =
        EventDataLogic::update(&*identity, &records, event, Map::new(), &[], true)
            .unwrap();
    assert!(cleared.custom_fields.is_empty());
    assert!(records.custom_fields(event).unwrap().is_none());
}

#[test]
fn test_custom_fields_in_sqlite_record_store() {
    let (identity, event) = seeded_identity();
    let records = SqliteRecordStore::in_memory().unwrap();

    let mut set = Map::new();
    set.insert("tags".into(), json!(["intro", "social"]));
    EventDataLogic::update(&*identity, &records, event, set, &[], false).unwrap();

    let fields = records.custom_fields(event).unwrap().unwrap();
    assert_eq!(fields["tags"], json!(["intro", "social"]));

    let err = EventDataLogic::load(&*identity, &records, 404).unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[test]
fn test_parse_field_reads_json_or_text() {
    assert_eq!(parse_field("seats=40").unwrap(), ("seats".to_string(), json!(40)));
    assert_eq!(
        parse_field("note=bring a laptop").unwrap(),
        ("note".to_string(), Value::String("bring a laptop".into()))
    );
    assert_eq!(parse_field("open=true").unwrap().1, json!(true));
    assert!(parse_field("novalue").is_err());
    assert!(parse_field("=1").is_err());
}

#[test]
fn test_audit_log_records_operations() {
    let (identity, event) = seeded_identity();
    let session = rollcall::core::AttendanceSession::new(
        identity.clone(),
        Arc::new(MemoryRecordStore::new()),
        Arc::new(MemorySetStore::new()),
    );

    session.check_in(event, REGISTERED_A).unwrap();
    session.check_in(event, WALK_IN).unwrap();
    session.check_out(event, WALK_IN).unwrap();
    session.finalize(event).unwrap();

    let entries = identity.log_entries().unwrap();
    let ops: Vec<&str> = entries
        .iter()
        .filter(|e| e.operation != "migration_applied")
        .map(|e| e.operation.as_str())
        .collect();
    assert_eq!(ops, vec!["checkin", "checkin", "checkout", "finalize"]);

    let finalize_only = LogLogic::filter(entries.clone(), Some("^finalize$")).unwrap();
    assert_eq!(finalize_only.len(), 1);
    assert!(finalize_only[0].message.contains("1 registered"));

    assert_eq!(LogLogic::render(&finalize_only).len(), 1);
    assert!(LogLogic::filter(entries, Some("(")).is_err());
    assert!(identity.event_exists(event).unwrap());
}

#[test]
fn test_corrupt_documents_are_records_tier_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.sqlite").to_string_lossy().to_string();
    let records = SqliteRecordStore::open(&path).unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    for collection in ["walk_ins", "event_data"] {
        raw.execute(
            "INSERT INTO documents (collection, event_id, person_id, body, created_at)
             VALUES (?1, 7, 30, '{not json', '2025-09-01T18:30:00+00:00')",
            [collection],
        )
        .unwrap();
    }

    let failures = [
        records.find_walk_ins(7).unwrap_err(),
        records.find_walk_in(30, 7).unwrap_err(),
        records.custom_fields(7).unwrap_err(),
    ];
    for err in failures {
        match err {
            AppError::StoreUnavailable { tier, .. } => assert_eq!(tier, StoreTier::Records),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_lock_dir_sits_next_to_live_database() {
    let mut cfg = Config::default();
    cfg.override_database("/data/rollcall.sqlite");
    assert_eq!(
        cfg.lock_dir(),
        std::path::PathBuf::from("/data/rollcall-live.locks")
    );

    cfg.live_database = Some("/run/live.sqlite".to_string());
    assert_eq!(cfg.lock_dir(), std::path::PathBuf::from("/run/live.locks"));
}
