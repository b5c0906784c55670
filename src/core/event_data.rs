//! Events joined with their custom fields from the record store.

use crate::errors::{AppError, AppResult};
use crate::models::EventId;
use crate::models::event::Event;
use crate::store::{IdentityStore, RecordStore};
use serde_json::{Map, Value};
use tracing::debug;

pub struct EventDataLogic;

impl EventDataLogic {
    pub fn load(
        identity: &dyn IdentityStore,
        records: &dyn RecordStore,
        event_id: EventId,
    ) -> AppResult<Event> {
        let mut event = identity
            .event(event_id)?
            .ok_or_else(|| AppError::event_not_found(event_id))?;

        event.custom_fields = records.custom_fields(event_id)?.unwrap_or_default();
        Ok(event)
    }

    /// Merge `set` into the event's custom fields, then drop `unset` keys.
    /// With `replace` the existing fields are discarded first. An empty result
    /// removes the custom-field document altogether.
    pub fn update(
        identity: &dyn IdentityStore,
        records: &dyn RecordStore,
        event_id: EventId,
        set: Map<String, Value>,
        unset: &[String],
        replace: bool,
    ) -> AppResult<Event> {
        if !identity.event_exists(event_id)? {
            return Err(AppError::event_not_found(event_id));
        }

        let mut fields = if replace {
            Map::new()
        } else {
            records.custom_fields(event_id)?.unwrap_or_default()
        };
        fields.extend(set);
        for key in unset {
            fields.remove(key);
        }

        records.set_custom_fields(event_id, &fields)?;
        debug!(event_id, fields = fields.len(), "custom fields updated");

        if let Err(e) = identity.audit(
            "event_fields",
            &format!("event {event_id}"),
            &format!("{} custom field(s) stored", fields.len()),
        ) {
            tracing::warn!(event_id, error = %e, "failed to write audit log");
        }

        Self::load(identity, records, event_id)
    }
}

/// Parse `key=value`; the value is read as JSON and falls back to a plain
/// string when it is not valid JSON.
pub fn parse_field(raw: &str) -> AppResult<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| AppError::Other(format!("Expected key=value, got '{raw}'")))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::Other(format!("Empty field name in '{raw}'")));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
