//! Live attendance window on top of a [`SetStore`].
//!
//! Two sets per event: `event:{id}:checkedIn` holds who is present right now,
//! `event:{id}:attendees` holds everyone who checked in at least once. The
//! second is a superset of the first at all times.

use super::SetStore;
use crate::errors::AppResult;
use crate::models::{EventId, PersonId};
use std::collections::BTreeSet;
use std::sync::Arc;

pub fn checked_in_key(event_id: EventId) -> String {
    format!("event:{event_id}:checkedIn")
}

pub fn attendees_key(event_id: EventId) -> String {
    format!("event:{event_id}:attendees")
}

#[derive(Clone)]
pub struct LiveWindow {
    sets: Arc<dyn SetStore>,
}

impl LiveWindow {
    pub fn new(sets: Arc<dyn SetStore>) -> Self {
        Self { sets }
    }

    /// Mark the person present. The ever-present set is written first so a
    /// failure between the two writes cannot break the subset relation.
    pub fn add_present(&self, event_id: EventId, person_id: PersonId) -> AppResult<()> {
        self.sets.add(&attendees_key(event_id), person_id)?;
        self.sets.add(&checked_in_key(event_id), person_id)?;
        Ok(())
    }

    /// Removes from the current-presence set only.
    pub fn remove_present(&self, event_id: EventId, person_id: PersonId) -> AppResult<()> {
        self.sets.remove(&checked_in_key(event_id), person_id)?;
        Ok(())
    }

    pub fn is_present(&self, event_id: EventId, person_id: PersonId) -> AppResult<bool> {
        self.sets.contains(&checked_in_key(event_id), person_id)
    }

    pub fn list_present(&self, event_id: EventId) -> AppResult<BTreeSet<PersonId>> {
        self.sets.members(&checked_in_key(event_id))
    }

    pub fn list_ever_present(&self, event_id: EventId) -> AppResult<BTreeSet<PersonId>> {
        self.sets.members(&attendees_key(event_id))
    }

    /// Whether any live data exists for the event.
    pub fn has_window(&self, event_id: EventId) -> AppResult<bool> {
        Ok(self.sets.exists(&checked_in_key(event_id))?
            || self.sets.exists(&attendees_key(event_id))?)
    }

    pub fn clear_window(&self, event_id: EventId) -> AppResult<()> {
        self.sets.delete(&checked_in_key(event_id))?;
        self.sets.delete(&attendees_key(event_id))?;
        Ok(())
    }
}
