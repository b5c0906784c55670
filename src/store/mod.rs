//! The storage tiers the attendance engine composes.
//!
//! * [`SetStore`] is the ephemeral tier: named sets of person ids with
//!   per-operation atomicity and nothing more. [`LiveWindow`] gives those sets
//!   their attendance meaning.
//! * [`IdentityStore`] is the authoritative relational tier (persons, events,
//!   registrations, registered attendance).
//! * [`RecordStore`] is the schema-flexible durable tier (walk-ins, event
//!   custom fields).
//!
//! Each trait has a SQLite implementation in [`sqlite`]; the set and record
//! tiers also have in-memory implementations in [`memory`].

pub mod live;
pub mod memory;
pub mod sqlite;

pub use live::LiveWindow;

use crate::config::{Config, LiveBackend};
use crate::core::AttendanceSession;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::event::Event;
use crate::models::person::Person;
use crate::models::{EventId, PersonId};
use serde_json::{Map, Value};
use memory::MemorySetStore;
use sqlite::{SqliteIdentityStore, SqliteRecordStore, SqliteSetStore};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// A set-capable cache.
///
/// All operations are idempotent: adding a present member or removing an
/// absent one succeeds and reports `false`.
pub trait SetStore: Send + Sync {
    /// Returns `true` when the member was not already in the set.
    fn add(&self, key: &str, member: PersonId) -> AppResult<bool>;

    /// Returns `true` when the member was in the set.
    fn remove(&self, key: &str, member: PersonId) -> AppResult<bool>;

    fn contains(&self, key: &str, member: PersonId) -> AppResult<bool>;

    fn members(&self, key: &str) -> AppResult<BTreeSet<PersonId>>;

    /// A set exists while it has at least one member.
    fn exists(&self, key: &str) -> AppResult<bool>;

    fn delete(&self, key: &str) -> AppResult<()>;
}

pub trait IdentityStore: Send + Sync {
    fn event_exists(&self, event_id: EventId) -> AppResult<bool>;

    fn person_exists(&self, person_id: PersonId) -> AppResult<bool>;

    fn is_registered(&self, person_id: PersonId, event_id: EventId) -> AppResult<bool>;

    fn has_registered_attendance(&self, person_id: PersonId, event_id: EventId)
    -> AppResult<bool>;

    fn insert_registered_attendance(&self, record: &AttendanceRecord) -> AppResult<()>;

    /// Drop every registered-attendance row of the pair; returns how many went.
    fn delete_registered_attendance(&self, person_id: PersonId, event_id: EventId)
    -> AppResult<usize>;

    /// Raw rows, possibly with several rows per person.
    fn registered_attendance(&self, event_id: EventId) -> AppResult<Vec<AttendanceRecord>>;

    fn person(&self, person_id: PersonId) -> AppResult<Option<Person>>;

    /// Batch name lookup. Unknown ids are absent from the map.
    fn people(&self, ids: &[PersonId]) -> AppResult<HashMap<PersonId, Person>> {
        let mut out = HashMap::with_capacity(ids.len());
        for &id in ids {
            if let Some(p) = self.person(id)? {
                out.insert(id, p);
            }
        }
        Ok(out)
    }

    /// The event row, with an empty custom-field map.
    fn event(&self, event_id: EventId) -> AppResult<Option<Event>>;

    /// Append an operational audit line. Stores without an audit trail ignore it.
    fn audit(&self, _operation: &str, _target: &str, _message: &str) -> AppResult<()> {
        Ok(())
    }
}

pub trait RecordStore: Send + Sync {
    /// Drop every walk-in document of the pair; returns how many went.
    fn delete_walk_in(&self, person_id: PersonId, event_id: EventId) -> AppResult<usize>;

    fn insert_walk_in(&self, record: &AttendanceRecord) -> AppResult<()>;

    /// Raw documents, possibly with duplicates per person.
    fn find_walk_ins(&self, event_id: EventId) -> AppResult<Vec<AttendanceRecord>>;

    fn find_walk_in(
        &self,
        person_id: PersonId,
        event_id: EventId,
    ) -> AppResult<Option<AttendanceRecord>>;

    fn custom_fields(&self, event_id: EventId) -> AppResult<Option<Map<String, Value>>>;

    /// Upsert the event's custom fields; an empty map removes the document.
    fn set_custom_fields(&self, event_id: EventId, fields: &Map<String, Value>) -> AppResult<()>;
}

/// The three tiers as configured, opened and migrated.
pub struct Stores {
    pub identity: Arc<SqliteIdentityStore>,
    pub records: Arc<SqliteRecordStore>,
    pub sets: Arc<dyn SetStore>,
}

impl Stores {
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let identity = Arc::new(SqliteIdentityStore::open(&cfg.database)?);
        let records = Arc::new(SqliteRecordStore::open(&cfg.records_path())?);
        let sets: Arc<dyn SetStore> = match cfg.live_backend {
            LiveBackend::Sqlite => Arc::new(SqliteSetStore::open(&cfg.live_path())?),
            LiveBackend::Memory => Arc::new(MemorySetStore::new()),
        };

        Ok(Self {
            identity,
            records,
            sets,
        })
    }

    /// The live sets of the SQLite backend are shared between processes, so
    /// its sessions also lock events through files next to the live database.
    pub fn session(&self, cfg: &Config) -> AttendanceSession {
        let session = AttendanceSession::new(
            self.identity.clone(),
            self.records.clone(),
            self.sets.clone(),
        )
        .with_placeholder(cfg.unknown_name_label.as_str());

        match cfg.live_backend {
            LiveBackend::Sqlite => session.with_lock_dir(cfg.lock_dir()),
            LiveBackend::Memory => session,
        }
    }
}
