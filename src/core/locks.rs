//! Per-event mutual exclusion for state-mutating operations.
//!
//! Threads of one process contend on an in-memory mutex per event. When a
//! lock directory is configured, the holder also takes an exclusive advisory
//! lock on `event-{id}.lock` in that directory, which serializes separate
//! processes (one per CLI invocation) working on the same event.

use crate::errors::{AppError, AppResult, StoreTier};
use crate::models::EventId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

#[derive(Default)]
pub struct EventLocks {
    slots: Mutex<HashMap<EventId, Arc<Mutex<()>>>>,
    dir: Option<PathBuf>,
}

/// Exclusive lock on an event's lock file; released when the file is closed.
fn lock_file(dir: &Path, event_id: EventId) -> AppResult<File> {
    let path = dir.join(format!("event-{event_id}.lock"));
    let unavailable = |e: std::io::Error| {
        AppError::unavailable(StoreTier::Live, format!("{}: {e}", path.display()))
    };

    fs::create_dir_all(dir).map_err(unavailable)?;
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&path)
        .map_err(unavailable)?;

    // Blocks while another process holds the event.
    file.lock().map_err(unavailable)?;
    Ok(file)
}

impl EventLocks {
    /// In-process locking only.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-process locking plus one lock file per event under `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            slots: Mutex::default(),
            dir: Some(dir.into()),
        }
    }

    /// Run `f` while holding the lock of `event_id`. Different events never
    /// contend; the registry lock is only held long enough to fetch the slot.
    pub fn with_event<T>(
        &self,
        event_id: EventId,
        f: impl FnOnce() -> AppResult<T>,
    ) -> AppResult<T> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(event_id).or_default())
        };

        let _guard = slot.lock();
        // The file lock is taken inside the mutex so threads of this process
        // never queue on their own lock file.
        let _file = match &self.dir {
            Some(dir) => Some(lock_file(dir, event_id)?),
            None => None,
        };
        trace!(event_id, "event lock acquired");

        f()
    }
}
