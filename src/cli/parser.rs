use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rollcall
/// Live event check-in and attendance finalization backed by SQLite
#[derive(Parser)]
#[command(
    name = "rollcall",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track live event check-ins and finalize attendance into registered and walk-in records",
    long_about = None
)]
pub struct Cli {
    /// Override the identity database path (record and live files are placed next to it)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the supplemental record database path
    #[arg(global = true, long = "records")]
    pub records: Option<String>,

    /// Override the live window database path
    #[arg(global = true, long = "live")]
    pub live: Option<String>,

    /// Print results as JSON instead of tables
    #[arg(global = true, long = "json")]
    pub json: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and all databases
    Init,

    /// Show the effective configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        /// Only show rows whose operation, target or message match this regex
        #[arg(long = "grep", value_name = "REGEX")]
        grep: Option<String>,
    },

    /// Check a person in to an event
    #[command(name = "checkin")]
    CheckIn { event: i64, person: i64 },

    /// Check a person out of an event
    #[command(name = "checkout")]
    CheckOut { event: i64, person: i64 },

    /// Show who is checked in right now
    Live { event: i64 },

    /// Split everyone who attended into registered and walk-in records
    Finalize { event: i64 },

    /// Show finalized attendance and the event's attendance status
    #[command(alias = "finalized")]
    Attendance { event: i64 },

    /// Show an event with its custom fields, or edit those fields
    Event {
        event: i64,

        /// Set a custom field (value parsed as JSON, plain text otherwise)
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,

        /// Remove a custom field
        #[arg(long = "unset", value_name = "KEY")]
        unset: Vec<String>,

        /// Drop all existing custom fields before applying --field
        #[arg(long = "clear-fields")]
        clear: bool,
    },

    /// Seed persons, events and registrations
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },

    /// Export finalized attendance for an event
    Export {
        event: i64,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum RosterAction {
    /// Add or update a person
    Person {
        id: i64,
        first_name: String,
        #[arg(default_value = "")]
        last_name: String,
        #[arg(long)]
        email: Option<String>,
    },

    /// Add an event; prints the new event id
    Event {
        /// Location of the event
        location: String,
        /// Date (YYYY-MM-DD)
        date: String,
        /// Start time (HH:MM or HH:MM:SS)
        time: String,
        #[arg(long)]
        name: Option<String>,
    },

    /// Register a person for an event
    Register { event: i64, person: i64 },
}
