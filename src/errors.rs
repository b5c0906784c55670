//! Unified application error type.
//! Store adapters, the attendance engine and the CLI all return AppError so
//! the transport layer has a single taxonomy to map onto its own responses.

use std::fmt;
use std::io;
use thiserror::Error;

/// Storage tier an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTier {
    Live,
    Identity,
    Records,
}

impl fmt::Display for StoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreTier::Live => "live",
            StoreTier::Identity => "identity",
            StoreTier::Records => "records",
        })
    }
}

/// Kind of entity a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Event,
    Person,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Event => "Event",
            EntityKind::Person => "Person",
        })
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database plumbing
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Attendance engine
    // ---------------------------
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("{tier} store unavailable: {reason}")]
    StoreUnavailable { tier: StoreTier, reason: String },

    #[error(
        "Finalize of event {event_id} stopped after saving {saved} of {total} attendees: {reason}"
    )]
    PartialFinalizeFailure {
        event_id: i64,
        saved: usize,
        total: usize,
        reason: String,
    },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    pub fn event_not_found(id: i64) -> Self {
        AppError::NotFound {
            kind: EntityKind::Event,
            id,
        }
    }

    pub fn person_not_found(id: i64) -> Self {
        AppError::NotFound {
            kind: EntityKind::Person,
            id,
        }
    }

    /// Wrap a backend failure as an unavailable storage tier.
    pub fn unavailable(tier: StoreTier, err: impl fmt::Display) -> Self {
        AppError::StoreUnavailable {
            tier,
            reason: err.to_string(),
        }
    }

    /// Process exit code used by the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NotFound { .. } => 2,
            AppError::InvalidState(_) => 3,
            AppError::StoreUnavailable { .. } | AppError::PartialFinalizeFailure { .. } => 4,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
