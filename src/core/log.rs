use crate::db::models::LogEntry;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const MAX_OP_WIDTH: usize = 40;

/// Colour for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "checkin" => Colour::Green,
        "checkout" => Colour::Yellow,
        "finalize" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("roster_") => Colour::Blue,
        other if other.starts_with("event_") => Colour::Blue,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Keep entries whose operation, target or message match `pattern`.
    pub fn filter(entries: Vec<LogEntry>, pattern: Option<&str>) -> AppResult<Vec<LogEntry>> {
        let Some(pattern) = pattern else {
            return Ok(entries);
        };

        let re = Regex::new(pattern)
            .map_err(|e| AppError::Other(format!("Invalid log filter '{pattern}': {e}")))?;

        Ok(entries
            .into_iter()
            .filter(|e| {
                re.is_match(&e.operation) || re.is_match(&e.target) || re.is_match(&e.message)
            })
            .collect())
    }

    /// One line per entry: `id: date | op (target) => message`.
    pub fn render(entries: &[LogEntry]) -> Vec<String> {
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);

        let dates: Vec<String> = entries
            .iter()
            .map(|e| {
                chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone())
            })
            .collect();
        let date_w = dates.iter().map(String::len).max().unwrap_or(10);

        entries
            .iter()
            .zip(dates)
            .map(|(e, date)| {
                let mut label = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                if label.chars().count() > MAX_OP_WIDTH {
                    label = label.chars().take(MAX_OP_WIDTH - 3).collect::<String>() + "...";
                }

                // padding is computed on the visible text, before colouring
                let padding = " ".repeat(MAX_OP_WIDTH.saturating_sub(label.chars().count()));
                let colored = match label.split_once(' ') {
                    Some((op, rest)) => {
                        format!("{} {rest}", color_for_operation(&e.operation).paint(op))
                    }
                    None => color_for_operation(&e.operation)
                        .paint(label.as_str())
                        .to_string(),
                };

                format!(
                    "{:>id_w$}: {:<date_w$} | {}{} => {}",
                    e.id,
                    date,
                    colored,
                    padding,
                    e.message,
                    id_w = id_w,
                    date_w = date_w
                )
            })
            .collect()
    }
}
