//! Line-oriented text format for a whole directory.
//!
//! ```text
//! Office:            1-28 | 100
//! Hotel Suite:       2-14 |   2  Unavailable
//!
//! #Anton Nikulsin (AN@123)
//!    000004 | 2020-04-01 to 2020-04-30 |   3 | Office:            1-28
//! ```
//!
//! Unit lines come first, then a blank line, then one `#name (id)` header per
//! client followed by that client's leases.

use std::io;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::directory::Directory;
use crate::engine::EngineError;
use crate::model::{ConfirmationNumber, Location};
use crate::observability::RENTAL_FILES_TOTAL;

const LEASE_INDENT: &str = "   ";
const UNAVAILABLE: &str = "unavailable";

#[derive(Debug)]
pub enum RentalFileError {
    Io(io::Error),
    /// Line could not be split into the expected fields.
    Parse { line: usize, reason: &'static str },
    /// Line was well formed but the directory refused it.
    Rejected { line: usize, error: EngineError },
    Engine(EngineError),
}

impl std::fmt::Display for RentalFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RentalFileError::Io(e) => write!(f, "I/O error: {e}"),
            RentalFileError::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            RentalFileError::Rejected { line, error } => write!(f, "line {line}: {error}"),
            RentalFileError::Engine(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RentalFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RentalFileError::Io(e) => Some(e),
            RentalFileError::Rejected { error, .. } => Some(error),
            RentalFileError::Engine(e) => Some(e),
            RentalFileError::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for RentalFileError {
    fn from(e: io::Error) -> Self {
        RentalFileError::Io(e)
    }
}

impl From<EngineError> for RentalFileError {
    fn from(e: EngineError) -> Self {
        RentalFileError::Engine(e)
    }
}

// ── Reading ─────────────────────────────────────────────────────

pub fn read_rental_file(
    path: impl AsRef<Path>,
    directory: &mut Directory,
) -> Result<(), RentalFileError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    parse_rental_data(&text, directory)?;
    metrics::counter!(RENTAL_FILES_TOTAL, "direction" => "read").increment(1);
    info!(
        "loaded {} rental units and {} clients from {}",
        directory.units().count(),
        directory.clients().count(),
        path.display()
    );
    Ok(())
}

/// Replace the directory's contents with `text`. On error the directory is left empty.
pub fn parse_rental_data(text: &str, directory: &mut Directory) -> Result<(), RentalFileError> {
    directory.flush_all_data();
    let result = load_lines(text, directory);
    if result.is_err() {
        directory.flush_all_data();
    }
    result
}

fn load_lines(text: &str, directory: &mut Directory) -> Result<(), RentalFileError> {
    let mut current_client: Option<String> = None;
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let content = raw.trim();
        if content.is_empty() {
            continue;
        }
        let rejected = |error| RentalFileError::Rejected { line, error };
        let malformed = |reason| RentalFileError::Parse { line, reason };

        if let Some(header) = content.strip_prefix('#') {
            let (name, id) = parse_client_header(header).map_err(malformed)?;
            let key = directory.add_new_client(name, id).map_err(rejected)?;
            current_client = Some(key.id);
        } else if let Some(client_id) = &current_client {
            let lease = parse_lease_line(content).map_err(malformed)?;
            directory
                .add_lease_from_file(
                    client_id,
                    lease.number,
                    lease.location,
                    lease.start,
                    lease.end,
                    lease.occupants,
                )
                .map_err(rejected)?;
        } else {
            let unit = parse_unit_line(content).map_err(malformed)?;
            let location = directory
                .add_new_unit(unit.kind, unit.location, unit.capacity)
                .map_err(rejected)?;
            if unit.unavailable {
                directory.take_out_of_service_at(location).map_err(rejected)?;
            }
        }
    }
    Ok(())
}

struct UnitLine<'a> {
    kind: &'a str,
    location: &'a str,
    capacity: u32,
    unavailable: bool,
}

struct LeaseLine {
    number: ConfirmationNumber,
    start: NaiveDate,
    end: NaiveDate,
    occupants: u32,
    location: Location,
}

fn parse_client_header(header: &str) -> Result<(&str, &str), &'static str> {
    let (name, rest) = header
        .split_once('(')
        .ok_or("client header needs an id in parentheses")?;
    let id = rest
        .trim()
        .strip_suffix(')')
        .ok_or("client header must end with ')'")?;
    Ok((name.trim(), id.trim()))
}

fn parse_unit_line(line: &str) -> Result<UnitLine<'_>, &'static str> {
    let mut fields = line.split([':', '|']);
    let (Some(kind), Some(location), Some(rest), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err("unit line needs kind, location and capacity");
    };

    let mut words = rest.split_whitespace();
    let capacity = words
        .next()
        .and_then(|w| w.parse::<u32>().ok())
        .ok_or("invalid capacity")?;
    let unavailable = match words.next() {
        None => false,
        Some(w) if w.eq_ignore_ascii_case(UNAVAILABLE) => true,
        Some(_) => return Err("unexpected text after capacity"),
    };
    if words.next().is_some() {
        return Err("unexpected text after capacity");
    }
    Ok(UnitLine {
        kind: kind.trim(),
        location: location.trim(),
        capacity,
        unavailable,
    })
}

fn parse_lease_line(line: &str) -> Result<LeaseLine, &'static str> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    let [number, dates, occupants, unit] = fields[..] else {
        return Err("lease line needs four '|'-separated fields");
    };

    let number: ConfirmationNumber = number.parse().map_err(|_| "invalid confirmation number")?;
    let (start, end) = match dates.split_whitespace().collect::<Vec<_>>()[..] {
        [start, "to", end] => (start, end),
        _ => return Err("lease dates must read 'start to end'"),
    };
    let start: NaiveDate = start.parse().map_err(|_| "invalid start date")?;
    let end: NaiveDate = end.parse().map_err(|_| "invalid end date")?;
    let occupants: u32 = occupants.parse().map_err(|_| "invalid occupant count")?;
    let location = unit
        .split_once(':')
        .and_then(|(_, loc)| loc.parse::<Location>().ok())
        .ok_or("invalid rental unit location")?;

    Ok(LeaseLine {
        number,
        start,
        end,
        occupants,
        location,
    })
}

// ── Writing ─────────────────────────────────────────────────────

/// Render every unit (ignoring the listing filter) and every client's leases.
pub fn render_rental_data(directory: &Directory) -> Result<String, EngineError> {
    let mut out = String::new();
    for unit in directory.units() {
        out.push_str(&unit.description());
        out.push('\n');
    }
    out.push('\n');
    for (index, client) in directory.clients().enumerate() {
        out.push('#');
        out.push_str(&client.key().to_string());
        out.push('\n');
        for lease in directory.list_client_leases(index)? {
            out.push_str(LEASE_INDENT);
            out.push_str(&lease);
            out.push('\n');
        }
    }
    Ok(out)
}

pub fn write_rental_file(path: impl AsRef<Path>, directory: &Directory) -> Result<(), RentalFileError> {
    let path = path.as_ref();
    std::fs::write(path, render_rental_data(directory)?)?;
    metrics::counter!(RENTAL_FILES_TOTAL, "direction" => "write").increment(1);
    info!("saved rental data to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_header_fields() {
        assert_eq!(
            parse_client_header("Sandy Shelton Biggs (hb2$32)"),
            Ok(("Sandy Shelton Biggs", "hb2$32"))
        );
        assert!(parse_client_header("No Id Here").is_err());
        assert!(parse_client_header("Bad (id) trailing").is_err());
    }

    #[test]
    fn unit_line_fields() {
        let unit = parse_unit_line("Hotel Suite:      37-10 |   2  Unavailable").unwrap();
        assert_eq!(unit.kind, "Hotel Suite");
        assert_eq!(unit.location, "37-10");
        assert_eq!(unit.capacity, 2);
        assert!(unit.unavailable);

        let unit = parse_unit_line("Office:            5-10 |  75").unwrap();
        assert!(!unit.unavailable);
        assert!(parse_unit_line("Office:            5-10").is_err());
        assert!(parse_unit_line("Office:            5-10 | lots").is_err());
        assert!(parse_unit_line("Office:            5-10 |  75  Closed").is_err());
    }

    #[test]
    fn lease_line_fields() {
        let lease =
            parse_lease_line("000005 | 2020-04-19 to 2020-05-10 |   2 | Hotel Suite:      35-18")
                .unwrap();
        assert_eq!(lease.number.get(), 5);
        assert_eq!(lease.start, NaiveDate::from_ymd_opt(2020, 4, 19).unwrap());
        assert_eq!(lease.end, NaiveDate::from_ymd_opt(2020, 5, 10).unwrap());
        assert_eq!(lease.occupants, 2);
        assert_eq!(lease.location.to_string(), "35-18");

        assert!(parse_lease_line("000005 | 2020-04-19 2020-05-10 | 2 | Hotel Suite: 35-18").is_err());
        assert!(parse_lease_line("000005 | 2020-04-19 to 2020-05-10 | 2").is_err());
        assert!(parse_lease_line("x | 2020-04-19 to 2020-05-10 | 2 | Hotel Suite: 35-18").is_err());
    }

    #[test]
    fn malformed_line_reports_line_number_and_empties_directory() {
        let text = "Office:            1-28 | 100\n\n#Anton Nikulsin (AN@123)\n   000004 | 2020-04-01 | 3\n";
        let mut dir = Directory::new();
        match parse_rental_data(text, &mut dir) {
            Err(RentalFileError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(dir.units().count(), 0);
        assert_eq!(dir.clients().count(), 0);
    }

    #[test]
    fn rejected_line_carries_engine_error() {
        let text = "Office:            1-28 | 100\nOffice:            1-28 |  50\n";
        let mut dir = Directory::new();
        match parse_rental_data(text, &mut dir) {
            Err(RentalFileError::Rejected { line, error }) => {
                assert_eq!(line, 2);
                assert!(matches!(error, EngineError::LocationConflict(_)));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
