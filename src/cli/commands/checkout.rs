use crate::cli::commands::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::Stores;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::CheckOut { event, person } = cmd {
        let stores = Stores::open(cfg)?;
        let receipt = stores.session(cfg).check_out(*event, *person)?;

        emit(json, &receipt, |r| {
            success(format!(
                "Person {} checked out of event {}.",
                r.person_id, r.event_id
            ))
        })?;
    }

    Ok(())
}
