use crate::cli::commands::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::views::{FinalizedAttendee, FinalizedView};
use crate::store::Stores;
use crate::ui::messages::{header, status_badge};
use crate::utils::table::Table;

fn attendee_table(attendees: &[FinalizedAttendee]) -> Table {
    let mut table = Table::new(["ID", "First name", "Last name", "Kind", "Check-in"]);
    for a in attendees {
        table.add_row(vec![
            a.person_id.to_string(),
            a.first_name.clone(),
            a.last_name.clone(),
            if a.is_walk_in { "walk-in" } else { "registered" }.to_string(),
            a.check_in_time.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table
}

fn print_view(view: &FinalizedView) {
    header(format!("Attendance for event {}", view.event_id));
    println!("{} {}", status_badge(view.status), view.message);

    if !view.has_finalized_data {
        return;
    }

    println!();
    let all: Vec<FinalizedAttendee> = view
        .registered
        .iter()
        .chain(view.walk_ins.iter())
        .cloned()
        .collect();
    print!("{}", attendee_table(&all).render());
    println!(
        "\nTotal: {} ({} registered, {} walk-ins)",
        view.total_attendees, view.total_registered, view.total_walk_ins
    );
}

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Attendance { event } = cmd {
        let stores = Stores::open(cfg)?;
        let view = stores.session(cfg).finalized_view(*event)?;
        emit(json, &view, print_view)?;
    }

    Ok(())
}
