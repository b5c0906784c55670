use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceKind;
use crate::models::views::FinalizedView;
use csv::Writer;
use std::path::Path;

/// One row per attendee, registered first, then walk-ins.
pub fn write_csv(path: &Path, view: &FinalizedView) -> AppResult<()> {
    let mut wtr = Writer::from_path(path).map_err(|e| AppError::Export(e.to_string()))?;

    wtr.write_record([
        "event_id",
        "person_id",
        "first_name",
        "last_name",
        "kind",
        "check_in_time",
    ])
    .map_err(|e| AppError::Export(e.to_string()))?;

    for a in view.registered.iter().chain(view.walk_ins.iter()) {
        let kind = if a.is_walk_in {
            AttendanceKind::WalkIn
        } else {
            AttendanceKind::Registered
        };
        wtr.write_record(&[
            view.event_id.to_string(),
            a.person_id.to_string(),
            a.first_name.clone(),
            a.last_name.clone(),
            kind.as_str().to_string(),
            a.check_in_time.to_rfc3339(),
        ])
        .map_err(|e| AppError::Export(e.to_string()))?;
    }

    wtr.flush()?;
    Ok(())
}
