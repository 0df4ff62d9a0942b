use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "queasy",
    version,
    about = "Motion-sickness relief overlay: state store and service control"
)]
pub struct Args {
    /// Use this store directory instead of the per-user default
    #[arg(long = "store-dir", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the background overlay service
    Serve,
    /// Ask the service to bring the overlay up
    Start,
    /// Ask the service to take the overlay down
    Stop,
    /// Show the current settings and whether the overlay is running
    Status,
    /// Print one field's effective value
    Get {
        /// Field name; unknown names list the available fields
        field: String,
    },
    /// Write one field
    Set {
        field: String,
        value: String,
    },
    /// Reset all settings to defaults
    Reset,
}

pub fn parse_args() -> Args {
    Args::parse()
}
