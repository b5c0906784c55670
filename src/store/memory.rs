//! Process-local implementations of the set and record tiers.

use super::{RecordStore, SetStore};
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::{EventId, PersonId};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

#[derive(Default)]
pub struct MemorySetStore {
    sets: RwLock<HashMap<String, BTreeSet<PersonId>>>,
}

impl MemorySetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SetStore for MemorySetStore {
    fn add(&self, key: &str, member: PersonId) -> AppResult<bool> {
        Ok(self
            .sets
            .write()
            .entry(key.to_string())
            .or_default()
            .insert(member))
    }

    fn remove(&self, key: &str, member: PersonId) -> AppResult<bool> {
        let mut sets = self.sets.write();
        let Some(set) = sets.get_mut(key) else {
            return Ok(false);
        };
        let removed = set.remove(&member);
        // Like a Redis set, an emptied set stops existing.
        if set.is_empty() {
            sets.remove(key);
        }
        Ok(removed)
    }

    fn contains(&self, key: &str, member: PersonId) -> AppResult<bool> {
        Ok(self
            .sets
            .read()
            .get(key)
            .is_some_and(|set| set.contains(&member)))
    }

    fn members(&self, key: &str) -> AppResult<BTreeSet<PersonId>> {
        Ok(self.sets.read().get(key).cloned().unwrap_or_default())
    }

    fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.sets.read().get(key).is_some_and(|set| !set.is_empty()))
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        self.sets.write().remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct Documents {
    walk_ins: Vec<AttendanceRecord>,
    event_data: HashMap<EventId, Map<String, Value>>,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    docs: RwLock<Documents>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn delete_walk_in(&self, person_id: PersonId, event_id: EventId) -> AppResult<usize> {
        let mut docs = self.docs.write();
        let before = docs.walk_ins.len();
        docs.walk_ins
            .retain(|w| !(w.event_id == event_id && w.person_id == person_id));
        Ok(before - docs.walk_ins.len())
    }

    fn insert_walk_in(&self, record: &AttendanceRecord) -> AppResult<()> {
        self.docs.write().walk_ins.push(record.clone());
        Ok(())
    }

    fn find_walk_ins(&self, event_id: EventId) -> AppResult<Vec<AttendanceRecord>> {
        Ok(self
            .docs
            .read()
            .walk_ins
            .iter()
            .filter(|w| w.event_id == event_id)
            .cloned()
            .collect())
    }

    fn find_walk_in(
        &self,
        person_id: PersonId,
        event_id: EventId,
    ) -> AppResult<Option<AttendanceRecord>> {
        Ok(self
            .docs
            .read()
            .walk_ins
            .iter()
            .find(|w| w.event_id == event_id && w.person_id == person_id)
            .cloned())
    }

    fn custom_fields(&self, event_id: EventId) -> AppResult<Option<Map<String, Value>>> {
        Ok(self.docs.read().event_data.get(&event_id).cloned())
    }

    fn set_custom_fields(&self, event_id: EventId, fields: &Map<String, Value>) -> AppResult<()> {
        let mut docs = self.docs.write();
        if fields.is_empty() {
            docs.event_data.remove(&event_id);
        } else {
            docs.event_data.insert(event_id, fields.clone());
        }
        Ok(())
    }
}
