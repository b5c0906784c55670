pub mod attendance;
pub mod checkin;
pub mod checkout;
pub mod config;
pub mod event;
pub mod export;
pub mod finalize;
pub mod init;
pub mod live;
pub mod log;
pub mod roster;

use crate::errors::AppResult;
use serde::Serialize;

/// Print `payload` as JSON when requested, otherwise hand it to `human`.
pub(crate) fn emit<T: Serialize>(json: bool, payload: &T, human: impl FnOnce(&T)) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(payload)?);
    } else {
        human(payload);
    }
    Ok(())
}
