use serde::Serialize;

/// Derived attendance status of an event; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    NotStarted,
    InProgress,
    Finalized,
}

impl AttendanceStatus {
    /// Status is evaluated in order: nothing at all, then finalized records,
    /// then a live window without records.
    pub fn classify(has_live_window: bool, has_finalized_records: bool) -> Self {
        if !has_live_window && !has_finalized_records {
            AttendanceStatus::NotStarted
        } else if has_finalized_records {
            AttendanceStatus::Finalized
        } else {
            AttendanceStatus::InProgress
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::NotStarted => "not_started",
            AttendanceStatus::InProgress => "in_progress",
            AttendanceStatus::Finalized => "finalized",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AttendanceStatus::NotStarted => "The event hasn't been started yet.",
            AttendanceStatus::InProgress => {
                "Event is in progress. Finalize to view attendance data."
            }
            AttendanceStatus::Finalized => "Finalized attendance data",
        }
    }
}
