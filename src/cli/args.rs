//! CLI argument definitions using clap
//!
//! Commands:
//! - ais headers <input> [--dictionary <json>]
//! - ais box <input> --min-lat --max-lat --min-lon --max-lon [--limit n] [-o out]
//! - ais track <input> --mmsi <n> [--start <ts>] [--hours <h>] [-o out]
//! - ais sort <input> [-o out]
//! - ais vessels <input>
//! - ais geohash <input> [-o out]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ais - filter, sort and enrich AIS vessel position files
#[derive(Parser, Debug)]
#[command(name = "ais")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Store configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log store operations to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the headers of a file, optionally with a field dictionary
    Headers {
        /// Input file
        input: PathBuf,

        /// JSON array of {"Fieldname", "Description"} entries
        #[arg(long)]
        dictionary: Option<PathBuf>,
    },

    /// Keep reports inside a latitude/longitude box
    #[command(name = "box")]
    Bbox {
        /// Input file
        input: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        min_lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        max_lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        min_lon: f64,

        #[arg(long, allow_negative_numbers = true)]
        max_lon: f64,

        /// Stop collecting after this many matches
        #[arg(long)]
        limit: Option<usize>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Keep the reports of one vessel inside a time window
    Track {
        /// Input file
        input: PathBuf,

        /// Vessel MMSI
        #[arg(long)]
        mmsi: i64,

        /// Window start, YYYY-MM-DDThh:mm:ss (default: 1940-01-01T01:00:00)
        #[arg(long)]
        start: Option<String>,

        /// Window length in hours (default: unbounded)
        #[arg(long)]
        hours: Option<i64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Order reports by BaseDateTime
    Sort {
        /// Input file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List distinct vessels as mmsi,name lines
    Vessels {
        /// Input file
        input: PathBuf,
    },

    /// Append a Geohash field computed from LAT and LON
    Geohash {
        /// Input file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_box_accepts_negative_bounds() {
        let cli = Cli::try_parse_from([
            "ais", "box", "in.csv", "--min-lat", "30", "--max-lat", "40", "--min-lon", "-80",
            "--max-lon", "-70",
        ])
        .unwrap();
        match cli.command {
            Command::Bbox { min_lon, max_lon, limit, .. } => {
                assert_eq!((min_lon, max_lon), (-80.0, -70.0));
                assert!(limit.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ais", "sort", "in.csv", "--verbose", "--config", "c.json"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
    }
}
