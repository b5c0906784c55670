use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Answers that allow replacing an earlier attendance export.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Make sure the attendance export may be written to `path`.
///
/// A fresh path, or `--force`, passes straight through. An existing export is
/// only replaced when the operator confirms on stdin.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if force || !path.exists() {
        return Ok(());
    }
    confirm_replace(path, &mut io::stdin().lock())
}

fn confirm_replace(path: &Path, input: &mut impl BufRead) -> AppResult<()> {
    warning(format!("An attendance export already exists at '{}'.", path.display()));
    print!("Replace it with the current finalized attendance? [y/N]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    if !is_yes(&answer) {
        return Err(AppError::Export(format!(
            "kept the existing attendance export at '{}'",
            path.display()
        )));
    }

    info("Replacing the previous attendance export.");
    Ok(())
}
