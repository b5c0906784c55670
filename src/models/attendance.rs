use super::{EventId, PersonId};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Which durable store a finalized attendance record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceKind {
    /// Person had a registration; record kept in the identity store.
    Registered,
    /// No registration at finalize time; record kept in the record store.
    WalkIn,
}

impl AttendanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceKind::Registered => "registered",
            AttendanceKind::WalkIn => "walk_in",
        }
    }
}

/// Durable (person, event, check-in time) fact produced by finalize.
///
/// The same shape is used for both kinds; walk-ins are serialized as-is into
/// the `walk_ins` document collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "personID")]
    pub person_id: PersonId,
    #[serde(rename = "eventID")]
    pub event_id: EventId,
    #[serde(rename = "checkInTime")]
    pub check_in_time: DateTime<Local>,
}

impl AttendanceRecord {
    pub fn new(person_id: PersonId, event_id: EventId, check_in_time: DateTime<Local>) -> Self {
        Self {
            person_id,
            event_id,
            check_in_time,
        }
    }
}
