//! SQL for the identity database.
//!
//! Functions return plain `rusqlite::Result`; the store adapter decides how a
//! backend failure surfaces to callers.

use crate::models::attendance::AttendanceRecord;
use crate::models::event::{Event, NewEvent};
use crate::models::person::Person;
use crate::models::{EventId, PersonId};
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};
use serde_json::Map;

fn conversion_error(col: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, msg.into())
}

pub fn parse_timestamp(col: usize, raw: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| conversion_error(col, format!("Invalid timestamp: {raw}")))
}

fn exists(conn: &Connection, sql: &str, args: impl rusqlite::Params) -> Result<bool> {
    let mut stmt = conn.prepare_cached(sql)?;
    Ok(stmt.query_row(args, |_| Ok(())).optional()?.is_some())
}

pub fn event_exists(conn: &Connection, event_id: EventId) -> Result<bool> {
    exists(conn, "SELECT 1 FROM event WHERE event_id = ?1", [event_id])
}

pub fn person_exists(conn: &Connection, person_id: PersonId) -> Result<bool> {
    exists(conn, "SELECT 1 FROM person WHERE person_id = ?1", [person_id])
}

pub fn is_registered(conn: &Connection, person_id: PersonId, event_id: EventId) -> Result<bool> {
    exists(
        conn,
        "SELECT 1 FROM registration WHERE person_id = ?1 AND event_id = ?2",
        [person_id, event_id],
    )
}

pub fn attendance_exists(
    conn: &Connection,
    person_id: PersonId,
    event_id: EventId,
) -> Result<bool> {
    exists(
        conn,
        "SELECT 1 FROM attendance WHERE person_id = ?1 AND event_id = ?2",
        [person_id, event_id],
    )
}

pub fn insert_attendance(conn: &Connection, record: &AttendanceRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO attendance (person_id, event_id, check_in_time) VALUES (?1, ?2, ?3)",
        params![
            record.person_id,
            record.event_id,
            record.check_in_time.to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn delete_attendance(conn: &Connection, person_id: PersonId, event_id: EventId) -> Result<usize> {
    conn.execute(
        "DELETE FROM attendance WHERE person_id = ?1 AND event_id = ?2",
        [person_id, event_id],
    )
}

fn map_attendance_row(row: &Row) -> Result<AttendanceRecord> {
    let raw: String = row.get("check_in_time")?;
    Ok(AttendanceRecord {
        person_id: row.get("person_id")?,
        event_id: row.get("event_id")?,
        check_in_time: parse_timestamp(2, &raw)?,
    })
}

/// All stored attendance rows for the event, in insertion order.
pub fn load_attendance(conn: &Connection, event_id: EventId) -> Result<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT person_id, event_id, check_in_time FROM attendance
         WHERE event_id = ?1
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([event_id], map_attendance_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn map_person_row(row: &Row) -> Result<Person> {
    Ok(Person {
        id: row.get("person_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
    })
}

pub fn load_person(conn: &Connection, person_id: PersonId) -> Result<Option<Person>> {
    let mut stmt = conn.prepare_cached(
        "SELECT person_id, first_name, last_name, email FROM person WHERE person_id = ?1",
    )?;
    stmt.query_row([person_id], map_person_row).optional()
}

/// Batch lookup; ids that do not exist are simply absent from the result.
pub fn load_people(conn: &Connection, ids: &[PersonId]) -> Result<Vec<Person>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(",");
    let sql = format!(
        "SELECT person_id, first_name, last_name, email FROM person
         WHERE person_id IN ({placeholders})"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids.iter()), map_person_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn map_event_row(row: &Row) -> Result<Event> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("time")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(3, format!("Invalid date: {date_str}")))?;

    let time = NaiveTime::parse_from_str(&time_str, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&time_str, "%H:%M"))
        .map_err(|_| conversion_error(4, format!("Invalid time: {time_str}")))?;

    Ok(Event {
        id: row.get("event_id")?,
        name: row.get("name")?,
        location: row.get("location")?,
        date,
        time,
        custom_fields: Map::new(),
    })
}

pub fn load_event(conn: &Connection, event_id: EventId) -> Result<Option<Event>> {
    let mut stmt = conn.prepare_cached(
        "SELECT event_id, name, location, date, time FROM event WHERE event_id = ?1",
    )?;
    stmt.query_row([event_id], map_event_row).optional()
}

// ---------------------------
// Roster seeding
// ---------------------------

/// Insert or replace a person row.
pub fn upsert_person(conn: &Connection, person: &Person) -> Result<()> {
    conn.execute(
        "INSERT INTO person (person_id, first_name, last_name, email)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(person_id) DO UPDATE SET
            first_name = excluded.first_name,
            last_name  = excluded.last_name,
            email      = excluded.email",
        params![
            person.id,
            person.first_name,
            person.last_name,
            person.email
        ],
    )?;
    Ok(())
}

pub fn insert_event(conn: &Connection, event: &NewEvent) -> Result<EventId> {
    conn.execute(
        "INSERT INTO event (name, location, date, time) VALUES (?1, ?2, ?3, ?4)",
        params![
            event.name,
            event.location,
            event.date.format("%Y-%m-%d").to_string(),
            event.time.format("%H:%M:%S").to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Registering twice is a no-op.
pub fn insert_registration(conn: &Connection, person_id: PersonId, event_id: EventId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO registration (person_id, event_id) VALUES (?1, ?2)",
        [person_id, event_id],
    )?;
    Ok(())
}
