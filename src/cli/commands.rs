//! CLI command implementations
//!
//! Each command opens its input read-only, runs one store operation and
//! writes the result to the output file or stdout. Logs go to stderr.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::Duration;

use crate::generator::{Geohasher, GEOHASH_FIELD};
use crate::matching::{all, beginning, BoundingBox};
use crate::observability::{Logger, Severity};
use crate::record::{parse_timestamp, RowWriter, TIME_LAYOUT};
use crate::schema::{LAT, LON};
use crate::store::{RecordSet, Resource, Selection, StoreConfig};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}

/// Run a parsed command line
pub fn run_command(cli: Cli) -> CliResult<()> {
    if cli.verbose {
        Logger::set_min_severity(Severity::Info);
    }
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Headers { input, dictionary } => headers(&input, dictionary.as_deref(), &config),
        Command::Bbox {
            input,
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            limit,
            output,
        } => bounding_box(
            &input,
            [min_lat, max_lat, min_lon, max_lon],
            limit,
            output.as_deref(),
            &config,
        ),
        Command::Track {
            input,
            mmsi,
            start,
            hours,
            output,
        } => track(&input, mmsi, start.as_deref(), hours, output.as_deref(), &config),
        Command::Sort { input, output } => sort(&input, output.as_deref(), &config),
        Command::Vessels { input } => vessels(&input, &config),
        Command::Geohash { input, output } => geohash(&input, output.as_deref(), &config),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<StoreConfig> {
    match path {
        Some(p) => Ok(StoreConfig::load(p)?),
        None => Ok(StoreConfig::default()),
    }
}

fn open_input(input: &Path, config: &StoreConfig) -> CliResult<RecordSet> {
    let resource = Resource::open_read_only(input)
        .map_err(|e| CliError::io_error(format!("{}: {}", input.display(), e)))?;
    Ok(RecordSet::open_with_config(resource, config.clone())?)
}

/// Writes `set` (headers line first) to `output`, or stdout when `None`.
fn emit(set: &mut RecordSet, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            set.save(path)?;
        }
        None => {
            let stdout = io::stdout();
            set.write_to(stdout.lock())?;
        }
    }
    Ok(())
}

fn emit_selection(selection: Selection, output: Option<&Path>) -> CliResult<()> {
    if selection.is_empty() {
        eprintln!("no matching records");
        return Ok(());
    }
    let mut set = selection.into_inner();
    emit(&mut set, output)?;
    set.close()?;
    Ok(())
}

/// Print the headers, one indexed line per field
pub fn headers(input: &Path, dictionary: Option<&Path>, config: &StoreConfig) -> CliResult<()> {
    let mut set = open_input(input, config)?;
    if let Some(path) = dictionary {
        let blob = fs::read(path)?;
        set.set_dictionary(&blob)?;
    }

    let mut stdout = io::stdout();
    write!(stdout, "{}", set.headers())?;
    stdout.flush()?;

    set.close()?;
    Ok(())
}

/// Select reports inside `[min_lat, max_lat, min_lon, max_lon]`
pub fn bounding_box(
    input: &Path,
    bounds: [f64; 4],
    limit: Option<usize>,
    output: Option<&Path>,
    config: &StoreConfig,
) -> CliResult<()> {
    let [min_lat, max_lat, min_lon, max_lon] = bounds;
    if min_lat > max_lat || min_lon > max_lon {
        return Err(CliError::invalid_argument(
            "minimum bound is greater than maximum bound",
        ));
    }

    let mut set = open_input(input, config)?;
    let b = BoundingBox::for_headers(set.headers(), min_lat, max_lat, min_lon, max_lon)
        .map_err(|e| CliError::store_error(e.to_string()))?;
    let selection = set.subset_limit(&b, limit)?;
    set.close()?;
    emit_selection(selection, output)
}

/// Select one vessel's reports inside a time window
pub fn track(
    input: &Path,
    mmsi: i64,
    start: Option<&str>,
    hours: Option<i64>,
    output: Option<&Path>,
    config: &StoreConfig,
) -> CliResult<()> {
    let start = match start {
        Some(s) => parse_timestamp(s).map_err(|e| {
            CliError::invalid_argument(format!(
                "start {:?} does not match {}: {}",
                s, TIME_LAYOUT, e
            ))
        })?,
        None => beginning(),
    };
    let dur = match hours {
        Some(h) if h <= 0 => {
            return Err(CliError::invalid_argument("hours must be > 0"));
        }
        Some(h) => Duration::try_hours(h)
            .ok_or_else(|| CliError::invalid_argument("hours out of range"))?,
        None => all(),
    };

    let mut set = open_input(input, config)?;
    let selection = set.track(mmsi, start, dur)?;
    set.close()?;
    emit_selection(selection, output)
}

/// Order reports by time
pub fn sort(input: &Path, output: Option<&Path>, config: &StoreConfig) -> CliResult<()> {
    let mut set = open_input(input, config)?;
    let mut sorted = set.sort_by_time()?;
    set.close()?;
    emit(&mut sorted, output)?;
    sorted.close()?;
    Ok(())
}

/// Print distinct vessels ordered by MMSI
pub fn vessels(input: &Path, config: &StoreConfig) -> CliResult<()> {
    let mut set = open_input(input, config)?;
    let vessels = set.unique_vessels()?;
    set.close()?;

    let stdout = io::stdout();
    let mut out = RowWriter::new(stdout.lock(), config.dialect());
    for v in vessels.sorted() {
        out.write_row(&[v.mmsi.clone(), v.vessel_name.clone()])?;
    }
    out.flush()?;
    Ok(())
}

/// Append a Geohash field
pub fn geohash(input: &Path, output: Option<&Path>, config: &StoreConfig) -> CliResult<()> {
    let mut set = open_input(input, config)?;
    let mut hashed = set.append_field(GEOHASH_FIELD, &[LAT, LON], &Geohasher::new())?;
    set.close()?;
    emit(&mut hashed, output)?;
    hashed.close()?;
    Ok(())
}
