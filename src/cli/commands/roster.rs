use crate::cli::parser::{Commands, RosterAction};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::event::NewEvent;
use crate::models::person::Person;
use crate::store::{IdentityStore, Stores};
use crate::ui::messages::success;
use chrono::{NaiveDate, NaiveTime};
use tracing::warn;

fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

fn parse_time(s: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

fn audit(identity: &dyn IdentityStore, operation: &str, target: &str, message: &str) {
    if let Err(e) = identity.audit(operation, target, message) {
        warn!(operation, error = %e, "failed to write audit log");
    }
}

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    let Commands::Roster { action } = cmd else {
        return Ok(());
    };

    let stores = Stores::open(cfg)?;
    let identity = &*stores.identity;

    match action {
        RosterAction::Person {
            id,
            first_name,
            last_name,
            email,
        } => {
            let person = Person {
                email: email.clone(),
                ..Person::new(*id, first_name, last_name)
            };
            identity.add_person(&person)?;
            audit(identity, "roster_person", &format!("person {id}"), &person.display_name());

            if json {
                println!("{}", serde_json::to_string_pretty(&person)?);
            } else {
                success(format!("Person {} saved: {}", id, person.display_name()));
            }
        }
        RosterAction::Event {
            location,
            date,
            time,
            name,
        } => {
            let new_event = NewEvent {
                name: name.clone(),
                location: location.clone(),
                date: parse_date(date)?,
                time: parse_time(time)?,
            };
            let event_id = identity.add_event(&new_event)?;
            audit(identity, "roster_event", &format!("event {event_id}"), location);

            if json {
                println!("{}", serde_json::json!({ "eventID": event_id }));
            } else {
                success(format!("Event {event_id} created."));
            }
        }
        RosterAction::Register { event, person } => {
            identity.register(*person, *event)?;
            audit(
                identity,
                "roster_register",
                &format!("event {event}"),
                &format!("Person {person} registered"),
            );

            if json {
                println!(
                    "{}",
                    serde_json::json!({ "eventID": event, "personID": person })
                );
            } else {
                success(format!("Person {person} registered for event {event}."));
            }
        }
    }

    Ok(())
}
