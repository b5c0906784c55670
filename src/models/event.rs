use super::EventId;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::{Map, Value};

/// An event as stored in the identity database, optionally joined with the
/// custom fields kept in the record store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(rename = "eventID")]
    pub id: EventId,
    pub name: Option<String>,
    pub location: String,
    pub date: NaiveDate, // ⇔ event.date (TEXT "YYYY-MM-DD")
    pub time: NaiveTime, // ⇔ event.time (TEXT "HH:MM:SS")
    #[serde(rename = "customFields")]
    pub custom_fields: Map<String, Value>,
}

impl Event {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }
}

/// Input for the roster seeding helper; the id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: Option<String>,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}
