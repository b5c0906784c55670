use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::store::Stores;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        event,
        format,
        file,
        force,
    } = cmd
    {
        let stores = Stores::open(cfg)?;
        let view = stores.session(cfg).finalized_view(*event)?;
        ExportLogic::write(&view, *format, Path::new(file), *force)?;
    }

    Ok(())
}
