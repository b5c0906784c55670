use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;
use crate::store::Stores;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Log { print: true, grep } = cmd {
        let stores = Stores::open(cfg)?;
        let entries = LogLogic::filter(stores.identity.log_entries()?, grep.as_deref())?;

        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        if entries.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        println!("📜 Internal log:\n");
        for line in LogLogic::render(&entries) {
            println!("{line}");
        }
    }

    Ok(())
}
