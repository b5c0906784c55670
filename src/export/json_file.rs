use crate::errors::AppResult;
use crate::models::views::FinalizedView;
use std::path::Path;

/// Pretty-printed JSON, same shape as the `attendance --json` payload.
pub fn write_json(path: &Path, view: &FinalizedView) -> AppResult<()> {
    let json = serde_json::to_string_pretty(view)?;
    std::fs::write(path, json)?;
    Ok(())
}
