//! Attendance view builder.
//!
//! Pure functions: they receive what the stores returned and assemble the
//! payloads handed to the transport layer. No store access happens here.

use crate::models::attendance::AttendanceRecord;
use crate::models::person::Person;
use crate::models::status::AttendanceStatus;
use crate::models::views::{CheckedInPerson, FinalizedAttendee, FinalizedView, LiveView};
use crate::models::{EventId, PersonId};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_PLACEHOLDER: &str = "Person";

/// Name used in the live view when the identity store has no such person.
pub fn placeholder_name(label: &str, person_id: PersonId) -> String {
    format!("{label} {person_id}")
}

pub fn live_view(
    event_id: EventId,
    checked_in: &[PersonId],
    people: &HashMap<PersonId, Person>,
    placeholder: &str,
) -> LiveView {
    let checked_in_students = checked_in
        .iter()
        .map(|&id| CheckedInPerson {
            person_id: id,
            name: people
                .get(&id)
                .map(Person::display_name)
                .unwrap_or_else(|| placeholder_name(placeholder, id)),
        })
        .collect();

    LiveView {
        event_id,
        checked_in: checked_in.to_vec(),
        count: checked_in.len(),
        checked_in_students,
    }
}

/// One record per person, keeping the earliest check-in time, ordered by
/// person id.
pub fn dedupe_earliest(records: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
    let mut by_person: BTreeMap<PersonId, &AttendanceRecord> = BTreeMap::new();

    for r in records {
        by_person
            .entry(r.person_id)
            .and_modify(|kept| {
                if r.check_in_time < kept.check_in_time {
                    *kept = r;
                }
            })
            .or_insert(r);
    }

    by_person.into_values().cloned().collect()
}

fn attendee(
    record: &AttendanceRecord,
    people: &HashMap<PersonId, Person>,
    is_walk_in: bool,
) -> FinalizedAttendee {
    let (first_name, last_name) = match people.get(&record.person_id) {
        Some(p) => (p.first_name.clone(), p.last_name.clone()),
        None => ("Unknown".to_string(), String::new()),
    };

    FinalizedAttendee {
        person_id: record.person_id,
        first_name,
        last_name,
        is_walk_in,
        check_in_time: record.check_in_time,
    }
}

/// Build the finalized view. Lists and totals are only populated when the
/// status is `finalized`; counts always come from the returned lists.
pub fn finalized_view(
    event_id: EventId,
    has_live_window: bool,
    registered: &[AttendanceRecord],
    walk_ins: &[AttendanceRecord],
    people: &HashMap<PersonId, Person>,
) -> FinalizedView {
    let registered = dedupe_earliest(registered);
    let walk_ins = dedupe_earliest(walk_ins);

    let has_finalized = !registered.is_empty() || !walk_ins.is_empty();
    let status = AttendanceStatus::classify(has_live_window, has_finalized);

    let (registered, walk_ins) = match status {
        AttendanceStatus::Finalized => (
            registered
                .iter()
                .map(|r| attendee(r, people, false))
                .collect::<Vec<_>>(),
            walk_ins
                .iter()
                .map(|r| attendee(r, people, true))
                .collect::<Vec<_>>(),
        ),
        AttendanceStatus::NotStarted | AttendanceStatus::InProgress => (Vec::new(), Vec::new()),
    };

    let total_registered = registered.len();
    let total_walk_ins = walk_ins.len();

    FinalizedView {
        event_id,
        status,
        message: status.message().to_string(),
        registered,
        walk_ins,
        total_registered,
        total_walk_ins,
        total_attendees: total_registered + total_walk_ins,
        has_finalized_data: has_finalized,
    }
}

/// Person ids whose names the finalized view needs.
pub fn referenced_people(registered: &[AttendanceRecord], walk_ins: &[AttendanceRecord]) -> Vec<PersonId> {
    let mut ids: Vec<PersonId> = registered
        .iter()
        .chain(walk_ins)
        .map(|r| r.person_id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
