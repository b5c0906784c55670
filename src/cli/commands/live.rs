use crate::cli::commands::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::views::LiveView;
use crate::store::Stores;
use crate::ui::messages::{header, info};
use crate::utils::table::Table;

fn print_live(view: &LiveView) {
    header(format!(
        "Live attendance for event {} ({} checked in)",
        view.event_id, view.count
    ));

    if view.checked_in_students.is_empty() {
        info("Nobody is checked in.");
        return;
    }

    let mut table = Table::new(["ID", "Name"]);
    for p in &view.checked_in_students {
        table.add_row(vec![p.person_id.to_string(), p.name.clone()]);
    }
    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Live { event } = cmd {
        let stores = Stores::open(cfg)?;
        let view = stores.session(cfg).live_view(*event)?;
        emit(json, &view, print_live)?;
    }

    Ok(())
}
