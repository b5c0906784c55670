//! SQLite-backed implementations of the three tiers.
//!
//! Each store owns one connection behind a mutex and runs its schema
//! migrations when opened. Backend failures surface as
//! [`AppError::StoreUnavailable`] tagged with the store's tier.

use super::{IdentityStore, RecordStore, SetStore};
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::migrate::Schema;
use crate::db::models::LogEntry;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult, StoreTier};
use crate::models::attendance::AttendanceRecord;
use crate::models::event::{Event, NewEvent};
use crate::models::person::Person;
use crate::models::{EventId, PersonId};
use chrono::Local;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

const WALK_INS: &str = "walk_ins";
const EVENT_DATA: &str = "event_data";

fn open_pool(path: Option<&str>, schema: Schema, tier: StoreTier) -> AppResult<Mutex<DbPool>> {
    let pool = match path {
        Some(p) => DbPool::new(p),
        None => DbPool::in_memory(),
    }
    .map_err(|e| AppError::unavailable(tier, e))?;

    init_db(&pool.conn, schema).map_err(|e| AppError::unavailable(tier, e))?;
    Ok(Mutex::new(pool))
}

/// Run `f` against the pool's connection, tagging failures with `tier`.
fn with_tier<T>(
    pool: &Mutex<DbPool>,
    tier: StoreTier,
    f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
) -> AppResult<T> {
    let guard = pool.lock();
    f(&guard.conn).map_err(|e| AppError::unavailable(tier, e))
}

// ---------------------------
// Live tier
// ---------------------------

pub struct SqliteSetStore {
    pool: Mutex<DbPool>,
}

impl SqliteSetStore {
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self {
            pool: open_pool(Some(path), Schema::Live, StoreTier::Live)?,
        })
    }

    pub fn in_memory() -> AppResult<Self> {
        Ok(Self {
            pool: open_pool(None, Schema::Live, StoreTier::Live)?,
        })
    }

    fn run<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> AppResult<T> {
        with_tier(&self.pool, StoreTier::Live, f)
    }
}

impl SetStore for SqliteSetStore {
    fn add(&self, key: &str, member: PersonId) -> AppResult<bool> {
        self.run(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO live_sets (set_key, member) VALUES (?1, ?2)",
                params![key, member],
            )
            .map(|n| n > 0)
        })
    }

    fn remove(&self, key: &str, member: PersonId) -> AppResult<bool> {
        self.run(|conn| {
            conn.execute(
                "DELETE FROM live_sets WHERE set_key = ?1 AND member = ?2",
                params![key, member],
            )
            .map(|n| n > 0)
        })
    }

    fn contains(&self, key: &str, member: PersonId) -> AppResult<bool> {
        self.run(|conn| {
            conn.prepare_cached("SELECT 1 FROM live_sets WHERE set_key = ?1 AND member = ?2")?
                .query_row(params![key, member], |_| Ok(()))
                .optional()
                .map(|found| found.is_some())
        })
    }

    fn members(&self, key: &str) -> AppResult<BTreeSet<PersonId>> {
        self.run(|conn| {
            let mut stmt = conn.prepare_cached("SELECT member FROM live_sets WHERE set_key = ?1")?;
            let rows = stmt.query_map([key], |row| row.get::<_, PersonId>(0))?;

            let mut out = BTreeSet::new();
            for r in rows {
                out.insert(r?);
            }
            Ok(out)
        })
    }

    fn exists(&self, key: &str) -> AppResult<bool> {
        self.run(|conn| {
            conn.prepare_cached("SELECT 1 FROM live_sets WHERE set_key = ?1 LIMIT 1")?
                .query_row([key], |_| Ok(()))
                .optional()
                .map(|found| found.is_some())
        })
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        self.run(|conn| {
            conn.execute("DELETE FROM live_sets WHERE set_key = ?1", [key])
                .map(|_| ())
        })
    }
}

// ---------------------------
// Identity tier
// ---------------------------

pub struct SqliteIdentityStore {
    pool: Mutex<DbPool>,
}

impl SqliteIdentityStore {
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self {
            pool: open_pool(Some(path), Schema::Identity, StoreTier::Identity)?,
        })
    }

    pub fn in_memory() -> AppResult<Self> {
        Ok(Self {
            pool: open_pool(None, Schema::Identity, StoreTier::Identity)?,
        })
    }

    fn run<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> AppResult<T> {
        with_tier(&self.pool, StoreTier::Identity, f)
    }

    /// Roster seeding: create or overwrite a person.
    pub fn add_person(&self, person: &Person) -> AppResult<()> {
        self.run(|conn| queries::upsert_person(conn, person))
    }

    /// Roster seeding: create an event and return its id.
    pub fn add_event(&self, event: &NewEvent) -> AppResult<EventId> {
        self.run(|conn| queries::insert_event(conn, event))
    }

    /// Roster seeding: register a person for an event.
    pub fn register(&self, person_id: PersonId, event_id: EventId) -> AppResult<()> {
        if !self.event_exists(event_id)? {
            return Err(AppError::event_not_found(event_id));
        }
        if !self.person_exists(person_id)? {
            return Err(AppError::person_not_found(person_id));
        }
        self.run(|conn| queries::insert_registration(conn, person_id, event_id))
    }

    pub fn log_entries(&self) -> AppResult<Vec<LogEntry>> {
        self.run(log::load_log)
    }
}

impl IdentityStore for SqliteIdentityStore {
    fn event_exists(&self, event_id: EventId) -> AppResult<bool> {
        self.run(|conn| queries::event_exists(conn, event_id))
    }

    fn person_exists(&self, person_id: PersonId) -> AppResult<bool> {
        self.run(|conn| queries::person_exists(conn, person_id))
    }

    fn is_registered(&self, person_id: PersonId, event_id: EventId) -> AppResult<bool> {
        self.run(|conn| queries::is_registered(conn, person_id, event_id))
    }

    fn has_registered_attendance(
        &self,
        person_id: PersonId,
        event_id: EventId,
    ) -> AppResult<bool> {
        self.run(|conn| queries::attendance_exists(conn, person_id, event_id))
    }

    fn insert_registered_attendance(&self, record: &AttendanceRecord) -> AppResult<()> {
        self.run(|conn| queries::insert_attendance(conn, record))
    }

    fn delete_registered_attendance(
        &self,
        person_id: PersonId,
        event_id: EventId,
    ) -> AppResult<usize> {
        self.run(|conn| queries::delete_attendance(conn, person_id, event_id))
    }

    fn registered_attendance(&self, event_id: EventId) -> AppResult<Vec<AttendanceRecord>> {
        self.run(|conn| queries::load_attendance(conn, event_id))
    }

    fn person(&self, person_id: PersonId) -> AppResult<Option<Person>> {
        self.run(|conn| queries::load_person(conn, person_id))
    }

    fn people(&self, ids: &[PersonId]) -> AppResult<HashMap<PersonId, Person>> {
        let rows = self.run(|conn| queries::load_people(conn, ids))?;
        Ok(rows.into_iter().map(|p| (p.id, p)).collect())
    }

    fn event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        self.run(|conn| queries::load_event(conn, event_id))
    }

    fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        self.run(|conn| log::audit(conn, operation, target, message))
    }
}

// ---------------------------
// Record tier
// ---------------------------

#[derive(Serialize, Deserialize)]
struct EventDataDoc {
    #[serde(rename = "eventID")]
    event_id: EventId,
    #[serde(rename = "customFields")]
    custom_fields: Map<String, Value>,
}

pub struct SqliteRecordStore {
    pool: Mutex<DbPool>,
}

impl SqliteRecordStore {
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self {
            pool: open_pool(Some(path), Schema::Records, StoreTier::Records)?,
        })
    }

    pub fn in_memory() -> AppResult<Self> {
        Ok(Self {
            pool: open_pool(None, Schema::Records, StoreTier::Records)?,
        })
    }

    fn run<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> AppResult<T> {
        with_tier(&self.pool, StoreTier::Records, f)
    }

    fn load_bodies(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<String>> {
        self.run(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt.query_map(args, |row| row.get::<_, String>(0))?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }
}

/// A document body that does not parse is a records-tier failure.
fn decode<T: serde::de::DeserializeOwned>(body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| AppError::unavailable(StoreTier::Records, e))
}

fn encode<T: Serialize>(doc: &T) -> AppResult<String> {
    serde_json::to_string(doc).map_err(|e| AppError::unavailable(StoreTier::Records, e))
}

impl RecordStore for SqliteRecordStore {
    fn delete_walk_in(&self, person_id: PersonId, event_id: EventId) -> AppResult<usize> {
        self.run(|conn| {
            conn.execute(
                "DELETE FROM documents
                 WHERE collection = ?1 AND event_id = ?2 AND person_id = ?3",
                params![WALK_INS, event_id, person_id],
            )
        })
    }

    fn insert_walk_in(&self, record: &AttendanceRecord) -> AppResult<()> {
        let body = encode(record)?;
        self.run(|conn| {
            conn.execute(
                "INSERT INTO documents (collection, event_id, person_id, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    WALK_INS,
                    record.event_id,
                    record.person_id,
                    body,
                    Local::now().to_rfc3339()
                ],
            )
            .map(|_| ())
        })
    }

    fn find_walk_ins(&self, event_id: EventId) -> AppResult<Vec<AttendanceRecord>> {
        let bodies = self.load_bodies(
            "SELECT body FROM documents
             WHERE collection = ?1 AND event_id = ?2
             ORDER BY id ASC",
            &[&WALK_INS, &event_id],
        )?;

        let mut out = Vec::with_capacity(bodies.len());
        for body in bodies {
            out.push(decode(&body)?);
        }
        Ok(out)
    }

    fn find_walk_in(
        &self,
        person_id: PersonId,
        event_id: EventId,
    ) -> AppResult<Option<AttendanceRecord>> {
        let bodies = self.load_bodies(
            "SELECT body FROM documents
             WHERE collection = ?1 AND event_id = ?2 AND person_id = ?3
             ORDER BY id ASC LIMIT 1",
            &[&WALK_INS, &event_id, &person_id],
        )?;

        match bodies.first() {
            Some(body) => Ok(Some(decode(body)?)),
            None => Ok(None),
        }
    }

    fn custom_fields(&self, event_id: EventId) -> AppResult<Option<Map<String, Value>>> {
        let bodies = self.load_bodies(
            "SELECT body FROM documents
             WHERE collection = ?1 AND event_id = ?2
             ORDER BY id DESC LIMIT 1",
            &[&EVENT_DATA, &event_id],
        )?;

        match bodies.first() {
            Some(body) => {
                let doc: EventDataDoc = decode(body)?;
                Ok(Some(doc.custom_fields))
            }
            None => Ok(None),
        }
    }

    fn set_custom_fields(&self, event_id: EventId, fields: &Map<String, Value>) -> AppResult<()> {
        let body = encode(&EventDataDoc {
            event_id,
            custom_fields: fields.clone(),
        })?;

        self.run(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "DELETE FROM documents WHERE collection = ?1 AND event_id = ?2",
                params![EVENT_DATA, event_id],
            )?;
            if !fields.is_empty() {
                tx.execute(
                    "INSERT INTO documents (collection, event_id, person_id, body, created_at)
                     VALUES (?1, ?2, NULL, ?3, ?4)",
                    params![EVENT_DATA, event_id, body, Local::now().to_rfc3339()],
                )?;
            }
            tx.commit()
        })
    }
}
