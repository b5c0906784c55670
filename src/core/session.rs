//! Attendance session manager: check-in, check-out, finalize and the two
//! attendance views for every event.
//!
//! Mutating operations run under the event's lock from [`EventLocks`], which
//! stands in for a transaction spanning the live tier and the two durable
//! tiers. Views read without locking.

use crate::core::locks::EventLocks;
use crate::core::view;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceKind, AttendanceRecord};
use crate::models::views::{FinalizeReport, FinalizedView, LiveView, PresenceReceipt};
use crate::models::{EventId, PersonId};
use crate::store::{IdentityStore, LiveWindow, RecordStore, SetStore};
use chrono::{DateTime, Local};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct AttendanceSession {
    identity: Arc<dyn IdentityStore>,
    records: Arc<dyn RecordStore>,
    live: LiveWindow,
    locks: EventLocks,
    placeholder: String,
}

impl AttendanceSession {
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        records: Arc<dyn RecordStore>,
        sets: Arc<dyn SetStore>,
    ) -> Self {
        Self {
            identity,
            records,
            live: LiveWindow::new(sets),
            locks: EventLocks::new(),
            placeholder: view::DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    /// Also serialize mutations across processes through lock files in `dir`.
    pub fn with_lock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.locks = EventLocks::with_dir(dir);
        self
    }

    /// Label used in the live view for persons the identity store does not know.
    pub fn with_placeholder(mut self, label: impl Into<String>) -> Self {
        self.placeholder = label.into();
        self
    }

    pub fn identity(&self) -> &dyn IdentityStore {
        self.identity.as_ref()
    }

    pub fn records(&self) -> &dyn RecordStore {
        self.records.as_ref()
    }

    pub fn live_window(&self) -> &LiveWindow {
        &self.live
    }

    // ---------------------------
    // Mutations
    // ---------------------------

    /// Idempotent: checking in a present person is not an error.
    pub fn check_in(&self, event_id: EventId, person_id: PersonId) -> AppResult<PresenceReceipt> {
        self.locks.with_event(event_id, || -> AppResult<PresenceReceipt> {
            self.require_event(event_id)?;
            self.require_person(person_id)?;

            self.live.add_present(event_id, person_id)?;

            debug!(event_id, person_id, "checked in");
            self.audit(
                "checkin",
                event_id,
                &format!("Person {person_id} checked in"),
            );
            Ok(PresenceReceipt::checked_in(event_id, person_id))
        })
    }

    /// Strict: the person must currently be checked in. The ever-present set
    /// is never touched.
    pub fn check_out(&self, event_id: EventId, person_id: PersonId) -> AppResult<PresenceReceipt> {
        self.locks.with_event(event_id, || -> AppResult<PresenceReceipt> {
            if !self.live.is_present(event_id, person_id)? {
                return Err(AppError::InvalidState(format!(
                    "Person {person_id} is not checked in to event {event_id}"
                )));
            }

            self.live.remove_present(event_id, person_id)?;

            debug!(event_id, person_id, "checked out");
            self.audit(
                "checkout",
                event_id,
                &format!("Person {person_id} checked out"),
            );
            Ok(PresenceReceipt::checked_out(event_id, person_id))
        })
    }

    /// Convert the live window into durable, classified attendance records.
    ///
    /// Attendees are everyone in the ever-present set plus everyone already
    /// holding a finalized record for the event, so finalizing again after the
    /// window was cleared reproduces the same result. Previously finalized
    /// persons keep their earliest recorded check-in time.
    ///
    /// Records are upserted per person. A failure partway leaves every earlier
    /// record in place and the window uncleared.
    pub fn finalize(&self, event_id: EventId) -> AppResult<FinalizeReport> {
        self.locks
            .with_event(event_id, || self.finalize_locked(event_id))
    }

    fn finalize_locked(&self, event_id: EventId) -> AppResult<FinalizeReport> {
        self.require_event(event_id)?;

        let ever_present = self.live.list_ever_present(event_id)?;
        let prior = self.prior_check_ins(event_id)?;

        let attendees: BTreeSet<PersonId> =
            ever_present.iter().chain(prior.keys()).copied().collect();
        let total = attendees.len();

        debug!(event_id, total, already_finalized = prior.len(), "finalizing");

        let mut registered = Vec::new();
        let mut walk_ins = Vec::new();

        for &person_id in &attendees {
            let at = prior.get(&person_id).copied().unwrap_or_else(Local::now);
            let kind = self
                .persist_attendee(AttendanceRecord::new(person_id, event_id, at))
                .map_err(|err| {
                    let saved = registered.len() + walk_ins.len();
                    if saved == 0 {
                        err
                    } else {
                        AppError::PartialFinalizeFailure {
                            event_id,
                            saved,
                            total,
                            reason: err.to_string(),
                        }
                    }
                })?;

            match kind {
                AttendanceKind::Registered => registered.push(person_id),
                AttendanceKind::WalkIn => walk_ins.push(person_id),
            }
        }

        // Only once every durable write landed.
        self.live.clear_window(event_id)?;

        let report = FinalizeReport::new(event_id, registered, walk_ins);
        info!(
            event_id,
            registered = report.total_registered,
            walk_ins = report.total_walk_ins,
            "event finalized"
        );
        self.audit(
            "finalize",
            event_id,
            &format!(
                "{} registered, {} walk-ins",
                report.total_registered, report.total_walk_ins
            ),
        );
        Ok(report)
    }

    /// Earliest finalized check-in per person across both durable stores.
    fn prior_check_ins(&self, event_id: EventId) -> AppResult<BTreeMap<PersonId, DateTime<Local>>> {
        let mut prior = self.identity.registered_attendance(event_id)?;
        prior.extend(self.records.find_walk_ins(event_id)?);

        Ok(view::dedupe_earliest(&prior)
            .into_iter()
            .map(|r| (r.person_id, r.check_in_time))
            .collect())
    }

    /// Classify one attendee and make sure exactly one record of that kind
    /// exists. The new record is written before a record of the other kind is
    /// dropped, so a failure in between never loses the person.
    fn persist_attendee(&self, record: AttendanceRecord) -> AppResult<AttendanceKind> {
        let (person_id, event_id) = (record.person_id, record.event_id);

        if self.identity.is_registered(person_id, event_id)? {
            if !self
                .identity
                .has_registered_attendance(person_id, event_id)?
            {
                self.identity.insert_registered_attendance(&record)?;
            }
            if self.records.find_walk_in(person_id, event_id)?.is_some() {
                self.records.delete_walk_in(person_id, event_id)?;
                debug!(event_id, person_id, "walk-in reclassified as registered");
            }
            Ok(AttendanceKind::Registered)
        } else {
            if self.records.find_walk_in(person_id, event_id)?.is_none() {
                self.records.insert_walk_in(&record)?;
            }
            if self
                .identity
                .has_registered_attendance(person_id, event_id)?
            {
                self.identity
                    .delete_registered_attendance(person_id, event_id)?;
                debug!(event_id, person_id, "registered attendance reclassified as walk-in");
            }
            Ok(AttendanceKind::WalkIn)
        }
    }

    // ---------------------------
    // Views
    // ---------------------------

    /// Who is checked in right now. Reads the current-presence set only.
    pub fn live_view(&self, event_id: EventId) -> AppResult<LiveView> {
        let ids: Vec<PersonId> = self.live.list_present(event_id)?.into_iter().collect();
        let people = self.identity.people(&ids)?;

        Ok(view::live_view(event_id, &ids, &people, &self.placeholder))
    }

    /// Durable attendance with a computed status. Live counts are never
    /// reported here.
    pub fn finalized_view(&self, event_id: EventId) -> AppResult<FinalizedView> {
        self.require_event(event_id)?;

        let registered = self.identity.registered_attendance(event_id)?;
        let walk_ins = self.records.find_walk_ins(event_id)?;
        let has_window = self.live.has_window(event_id)?;

        let people = self
            .identity
            .people(&view::referenced_people(&registered, &walk_ins))?;

        Ok(view::finalized_view(
            event_id,
            has_window,
            &registered,
            &walk_ins,
            &people,
        ))
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    fn require_event(&self, event_id: EventId) -> AppResult<()> {
        if self.identity.event_exists(event_id)? {
            Ok(())
        } else {
            Err(AppError::event_not_found(event_id))
        }
    }

    fn require_person(&self, person_id: PersonId) -> AppResult<()> {
        if self.identity.person_exists(person_id)? {
            Ok(())
        } else {
            Err(AppError::person_not_found(person_id))
        }
    }

    /// Audit writes never fail the operation they describe.
    fn audit(&self, operation: &str, event_id: EventId, message: &str) {
        let target = format!("event {event_id}");
        if let Err(e) = self.identity.audit(operation, &target, message) {
            warn!(operation, event_id, error = %e, "failed to write audit log");
        }
    }
}
