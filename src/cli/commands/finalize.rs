use crate::cli::commands::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::views::FinalizeReport;
use crate::store::Stores;
use crate::ui::messages::success;

fn join_ids(ids: &[i64]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_report(report: &FinalizeReport) {
    success(format!(
        "Event {} finalized: {} attendees ({} registered, {} walk-ins).",
        report.event_id, report.total_attendees, report.total_registered, report.total_walk_ins
    ));
    println!("  registered : {}", join_ids(&report.registered_saved));
    println!("  walk-ins   : {}", join_ids(&report.walk_ins_logged));
}

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Finalize { event } = cmd {
        let stores = Stores::open(cfg)?;
        let report = stores.session(cfg).finalize(*event)?;
        emit(json, &report, print_report)?;
    }

    Ok(())
}
