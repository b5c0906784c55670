//! Export of a finalized attendance view.

mod csv_file;
mod fs_utils;
mod json_file;

use crate::errors::AppResult;
use crate::models::views::FinalizedView;
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Write `view` to `path`. Without `force` an existing file is only
    /// overwritten after interactive confirmation.
    pub fn write(view: &FinalizedView, format: ExportFormat, path: &Path, force: bool) -> AppResult<()> {
        fs_utils::ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => csv_file::write_csv(path, view)?,
            ExportFormat::Json => json_file::write_json(path, view)?,
        }

        success(format!(
            "{} export completed: {}",
            format.as_str().to_uppercase(),
            path.display()
        ));
        Ok(())
    }
}
