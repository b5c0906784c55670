#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveTime};
use rollcall::core::AttendanceSession;
use rollcall::models::event::NewEvent;
use rollcall::models::person::Person;
use rollcall::store::RecordStore;
use rollcall::store::memory::{MemoryRecordStore, MemorySetStore};
use rollcall::store::sqlite::SqliteIdentityStore;
use std::sync::Arc;
use tempfile::TempDir;

pub const REGISTERED_A: i64 = 10;
pub const REGISTERED_B: i64 = 20;
pub const WALK_IN: i64 = 30;

pub fn rc() -> Command {
    cargo_bin_cmd!("rollcall")
}

/// A temp directory holding the three database files of one test.
pub struct TestDb {
    pub dir: TempDir,
    pub db: String,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let db = dir
            .path()
            .join("rollcall.sqlite")
            .to_string_lossy()
            .to_string();
        Self { dir, db }
    }

    /// `rollcall --db <db> <args...>`
    pub fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = rc();
        cmd.env("HOME", self.dir.path());
        cmd.args(["--db", &self.db]).args(args);
        cmd
    }

    pub fn out_file(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().to_string()
    }
}

/// Init the databases and seed persons 10, 20, 30 plus event 1 with
/// registrations for 10 and 20.
pub fn init_with_roster(t: &TestDb) {
    t.cmd(&["--test", "init"]).assert().success();

    for (id, first, last) in [
        ("10", "Ada", "Lovelace"),
        ("20", "Alan", "Turing"),
        ("30", "Grace", "Hopper"),
    ] {
        t.cmd(&["roster", "person", id, first, last])
            .assert()
            .success();
    }

    t.cmd(&["roster", "event", "Main hall", "2025-09-01", "18:30", "--name", "Kickoff"])
        .assert()
        .success();

    for person in ["10", "20"] {
        t.cmd(&["roster", "register", "1", person])
            .assert()
            .success();
    }
}

/// In-memory identity store seeded like [`init_with_roster`]. Returns the
/// store and the event id.
pub fn seeded_identity() -> (Arc<SqliteIdentityStore>, i64) {
    let identity = SqliteIdentityStore::in_memory().expect("identity store");

    for (id, first, last) in [
        (REGISTERED_A, "Ada", "Lovelace"),
        (REGISTERED_B, "Alan", "Turing"),
        (WALK_IN, "Grace", "Hopper"),
    ] {
        identity
            .add_person(&Person::new(id, first, last))
            .expect("add person");
    }

    let event_id = identity
        .add_event(&NewEvent {
            name: Some("Kickoff".to_string()),
            location: "Main hall".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 1).expect("date"),
            time: NaiveTime::from_hms_opt(18, 30, 0).expect("time"),
        })
        .expect("add event");

    identity.register(REGISTERED_A, event_id).expect("register");
    identity.register(REGISTERED_B, event_id).expect("register");

    (Arc::new(identity), event_id)
}

/// Session over the seeded identity store, in-memory sets and the given
/// record store.
pub fn session_with_records(records: Arc<dyn RecordStore>) -> (AttendanceSession, i64) {
    let (identity, event_id) = seeded_identity();
    let session = AttendanceSession::new(identity, records, Arc::new(MemorySetStore::new()));
    (session, event_id)
}

pub fn session() -> (AttendanceSession, i64) {
    session_with_records(Arc::new(MemoryRecordStore::new()))
}
