//! Versioned schema migrations for the three SQLite files.
//!
//! Each tier keeps its own `log` table; an applied migration is recorded there
//! as a `migration_applied` row whose target is the migration version, so
//! re-running the engine on an up-to-date database is a no-op.

use rusqlite::{Connection, OptionalExtension, Result, params};
use tracing::info;

/// Which database a connection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Persons, events, registrations and registered attendance.
    Identity,
    /// Schema-flexible JSON documents (walk-ins, event custom fields).
    Records,
    /// Ephemeral named sets backing the live attendance window.
    Live,
}

impl Schema {
    pub fn name(&self) -> &'static str {
        match self {
            Schema::Identity => "identity",
            Schema::Records => "records",
            Schema::Live => "live",
        }
    }

    fn migrations(&self) -> &'static [Migration] {
        match self {
            Schema::Identity => IDENTITY_MIGRATIONS,
            Schema::Records => RECORDS_MIGRATIONS,
            Schema::Live => LIVE_MIGRATIONS,
        }
    }
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const IDENTITY_MIGRATIONS: &[Migration] = &[Migration {
    version: "20250301_0001_identity_core",
    description: "Create person, event, registration and attendance tables",
    sql: r#"
        CREATE TABLE IF NOT EXISTS person (
            person_id   INTEGER PRIMARY KEY,
            first_name  TEXT NOT NULL,
            last_name   TEXT NOT NULL DEFAULT '',
            email       TEXT
        );

        CREATE TABLE IF NOT EXISTS event (
            event_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT,
            location    TEXT NOT NULL,
            date        TEXT NOT NULL,
            time        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS registration (
            person_id   INTEGER NOT NULL REFERENCES person(person_id) ON DELETE CASCADE,
            event_id    INTEGER NOT NULL REFERENCES event(event_id) ON DELETE CASCADE,
            PRIMARY KEY (person_id, event_id)
        );

        CREATE TABLE IF NOT EXISTS attendance (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            person_id     INTEGER NOT NULL REFERENCES person(person_id) ON DELETE CASCADE,
            event_id      INTEGER NOT NULL REFERENCES event(event_id) ON DELETE CASCADE,
            check_in_time TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_event_person ON attendance(event_id, person_id);
        CREATE INDEX IF NOT EXISTS idx_event_date_time ON event(date, time);
    "#,
}];

const RECORDS_MIGRATIONS: &[Migration] = &[Migration {
    version: "20250301_0001_documents",
    description: "Create the documents table",
    sql: r#"
        CREATE TABLE IF NOT EXISTS documents (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            collection  TEXT NOT NULL,
            event_id    INTEGER NOT NULL,
            person_id   INTEGER,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_lookup
            ON documents(collection, event_id, person_id);
    "#,
}];

const LIVE_MIGRATIONS: &[Migration] = &[Migration {
    version: "20250301_0001_live_sets",
    description: "Create the live_sets table",
    sql: r#"
        CREATE TABLE IF NOT EXISTS live_sets (
            set_key  TEXT NOT NULL,
            member   INTEGER NOT NULL,
            PRIMARY KEY (set_key, member)
        ) WITHOUT ROWID;
    "#,
}];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![migration.version, migration.description],
    )?;

    tx.commit()
}

/// Public entry point: run all pending migrations for `schema`.
///
/// Returns how many migrations were applied by this call.
pub fn run_pending_migrations(conn: &Connection, schema: Schema) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for migration in schema.migrations() {
        if is_applied(conn, migration.version)? {
            continue;
        }

        apply(conn, migration)?;
        applied += 1;

        info!(
            schema = schema.name(),
            version = migration.version,
            "migration applied"
        );
    }

    Ok(applied)
}
