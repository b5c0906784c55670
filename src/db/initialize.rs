use crate::db::migrate::{Schema, run_pending_migrations};
use crate::errors::AppResult;
use rusqlite::Connection;
use tracing::debug;

/// Initialize one tier's database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &Connection, schema: Schema) -> AppResult<()> {
    let applied = run_pending_migrations(conn, schema)?;
    debug!(schema = schema.name(), applied, "database initialized");
    Ok(())
}
