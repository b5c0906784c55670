//! Domain types shared by the stores, the engine and the CLI.

pub mod attendance;
pub mod event;
pub mod person;
pub mod status;
pub mod views;

pub type EventId = i64;
pub type PersonId = i64;
