use crate::cli::commands::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::event_data::{EventDataLogic, parse_field};
use crate::errors::AppResult;
use crate::models::event::Event;
use crate::store::Stores;
use crate::ui::messages::{header, info};
use serde_json::Map;

fn print_event(event: &Event) {
    header(format!(
        "Event {}: {}",
        event.id,
        event.name.as_deref().unwrap_or("(unnamed)")
    ));
    println!("  location : {}", event.location);
    println!("  date     : {} {}", event.date_str(), event.time_str());

    if event.custom_fields.is_empty() {
        info("No custom fields.");
        return;
    }

    println!("  custom fields:");
    for (key, value) in &event.custom_fields {
        println!("    {key} = {value}");
    }
}

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Event {
        event,
        fields,
        unset,
        clear,
    } = cmd
    {
        let stores = Stores::open(cfg)?;

        let loaded = if fields.is_empty() && unset.is_empty() && !*clear {
            EventDataLogic::load(&*stores.identity, &*stores.records, *event)?
        } else {
            let mut set = Map::new();
            for raw in fields {
                let (key, value) = parse_field(raw)?;
                set.insert(key, value);
            }
            EventDataLogic::update(
                &*stores.identity,
                &*stores.records,
                *event,
                set,
                unset,
                *clear,
            )?
        };

        emit(json, &loaded, print_event)?;
    }

    Ok(())
}
