//! CLI module for the `ais` binary
//!
//! Provides command-line access to the record store:
//! - headers: print the schema, optionally with a dictionary
//! - box / track: non-destructive selections
//! - sort: time ordering
//! - vessels: distinct vessels
//! - geohash: derived Geohash field

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{bounding_box, geohash, headers, run, run_command, sort, track, vessels};
pub use errors::{CliError, CliErrorCode, CliResult};
