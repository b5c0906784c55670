//! Payloads returned upward to the transport layer.
//! Field names follow the camelCase wire shape clients already consume.

use super::status::AttendanceStatus;
use super::{EventId, PersonId};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Confirmation of a check-in or check-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceReceipt {
    pub message: String,
    #[serde(rename = "eventID")]
    pub event_id: EventId,
    #[serde(rename = "personID")]
    pub person_id: PersonId,
}

impl PresenceReceipt {
    pub fn checked_in(event_id: EventId, person_id: PersonId) -> Self {
        Self {
            message: "checked in".to_string(),
            event_id,
            person_id,
        }
    }

    pub fn checked_out(event_id: EventId, person_id: PersonId) -> Self {
        Self {
            message: "checked out".to_string(),
            event_id,
            person_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedInPerson {
    #[serde(rename = "personID")]
    pub person_id: PersonId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveView {
    #[serde(rename = "eventID")]
    pub event_id: EventId,
    pub checked_in: Vec<PersonId>,
    pub count: usize,
    pub checked_in_students: Vec<CheckedInPerson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeReport {
    pub message: String,
    #[serde(rename = "eventID")]
    pub event_id: EventId,
    pub registered_saved: Vec<PersonId>,
    pub walk_ins_logged: Vec<PersonId>,
    pub total_registered: usize,
    pub total_walk_ins: usize,
    pub total_attendees: usize,
}

impl FinalizeReport {
    pub fn new(event_id: EventId, registered: Vec<PersonId>, walk_ins: Vec<PersonId>) -> Self {
        let total_registered = registered.len();
        let total_walk_ins = walk_ins.len();
        Self {
            message: "Event finalized successfully".to_string(),
            event_id,
            registered_saved: registered,
            walk_ins_logged: walk_ins,
            total_registered,
            total_walk_ins,
            total_attendees: total_registered + total_walk_ins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedAttendee {
    #[serde(rename = "personID")]
    pub person_id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub is_walk_in: bool,
    pub check_in_time: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedView {
    #[serde(rename = "eventID")]
    pub event_id: EventId,
    pub status: AttendanceStatus,
    pub message: String,
    pub registered: Vec<FinalizedAttendee>,
    pub walk_ins: Vec<FinalizedAttendee>,
    pub total_registered: usize,
    pub total_walk_ins: usize,
    pub total_attendees: usize,
    pub has_finalized_data: bool,
}

impl FinalizedView {
    pub fn registered_ids(&self) -> Vec<PersonId> {
        self.registered.iter().map(|a| a.person_id).collect()
    }

    pub fn walk_in_ids(&self) -> Vec<PersonId> {
        self.walk_ins.iter().map(|a| a.person_id).collect()
    }
}
