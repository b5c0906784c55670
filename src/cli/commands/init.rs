use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::{IdentityStore, Stores};
use crate::ui::messages::{success, warning};
use std::fs;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the identity, record and live databases
///  - all pending migrations of each database
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if !cli.test {
        let path = Config::config_file();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        cfg.save_to(&path)?;
        success(format!("Config file : {}", path.display()));
    }

    // Opening runs the migrations.
    let stores = Stores::open(cfg)?;

    success(format!("Identity DB : {}", cfg.database));
    success(format!("Records DB  : {}", cfg.records_path()));
    success(format!("Live DB     : {}", cfg.live_path()));

    if let Err(e) = stores.identity.audit(
        "init",
        "Database initialized",
        &format!("Database initialized at {}", cfg.database),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    success("rollcall initialization completed!");
    Ok(())
}
