use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::EngineError;
use crate::limits::*;

/// Floor/room pair, the identity of a rental unit. Orders by floor, then room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub floor: u8,
    pub room: u8,
}

impl Location {
    pub fn new(floor: u8, room: u8) -> Result<Self, EngineError> {
        if !(MIN_FLOOR..=MAX_FLOOR).contains(&floor) || !(MIN_ROOM..=MAX_ROOM).contains(&room) {
            return Err(EngineError::InvalidRequest("invalid floor/room"));
        }
        Ok(Self { floor, room })
    }
}

impl FromStr for Location {
    type Err = EngineError;

    /// Parses `floor-room`, e.g. `12-15`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (floor, room) = s
            .trim()
            .split_once('-')
            .ok_or(EngineError::InvalidRequest("invalid location string"))?;
        let floor = floor
            .parse()
            .map_err(|_| EngineError::InvalidRequest("invalid location string"))?;
        let room = room
            .parse()
            .map_err(|_| EngineError::InvalidRequest("invalid location string"))?;
        Self::new(floor, room)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.floor, self.room)
    }
}

/// Closed date interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EngineError> {
        if start > end {
            return Err(EngineError::InvalidDateRange("end date before start date"));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Spans share at least one calendar day (touching counts).
    pub fn intersects(&self, other: &DateSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Spans overlap as open intervals; sharing only a boundary day does not count.
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Six-digit reservation identifier, `000000..=999999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfirmationNumber(u32);

impl ConfirmationNumber {
    pub const MAX: ConfirmationNumber = ConfirmationNumber(MAX_CONFIRMATION);

    pub fn new(value: u32) -> Result<Self, EngineError> {
        if value > MAX_CONFIRMATION {
            return Err(EngineError::InvalidRequest("confirmation number out of range"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl FromStr for ConfirmationNumber {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse()
            .map_err(|_| EngineError::InvalidRequest("invalid confirmation number"))?;
        Self::new(value)
    }
}

impl fmt::Display for ConfirmationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// The three kinds of rentable space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnitKind {
    /// Leased by whole calendar months.
    TimedOffice,
    /// Leased by the day, up to a week.
    ShortStayRoom,
    /// Leased by whole weeks, Sunday to Sunday.
    WeeklySuite,
}

impl UnitKind {
    pub fn label(self) -> &'static str {
        match self {
            UnitKind::TimedOffice => "Office",
            UnitKind::ShortStayRoom => "Conference Room",
            UnitKind::WeeklySuite => "Hotel Suite",
        }
    }

    pub fn max_capacity(self) -> u32 {
        match self {
            UnitKind::TimedOffice => MAX_OFFICE_CAPACITY,
            UnitKind::ShortStayRoom => MAX_CONFERENCE_CAPACITY,
            UnitKind::WeeklySuite => MAX_SUITE_CAPACITY,
        }
    }
}

impl FromStr for UnitKind {
    type Err = EngineError;

    /// Chooses the kind by leading letter: `O`ffice, `C`onference room, `H`otel suite.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('O') => Ok(UnitKind::TimedOffice),
            Some('C') => Ok(UnitKind::ShortStayRoom),
            Some('H') => Ok(UnitKind::WeeklySuite),
            _ => Err(EngineError::InvalidRequest("invalid kind")),
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lookup key for the client that owns a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClientKey {
    pub name: String,
    pub id: String,
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Lookup key for the unit a reservation is booked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UnitKey {
    pub kind: UnitKind,
    pub location: Location,
}

impl fmt::Display for UnitKey {
    /// Kind label left-aligned in 16 columns, location right-aligned in 7.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16}{:>7}",
            format!("{}:", self.kind),
            self.location.to_string()
        )
    }
}

/// A confirmed, date-ranged occupancy of one unit by one client.
///
/// Ordered by start date, then confirmation number. Equality uses the same
/// fields, so two reservations are interchangeable in an `OrderedSequence`
/// exactly when they would sort to the same position.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    confirmation: ConfirmationNumber,
    span: DateSpan,
    occupants: u32,
    client: ClientKey,
    unit: UnitKey,
}

impl Reservation {
    pub fn new(
        confirmation: ConfirmationNumber,
        span: DateSpan,
        occupants: u32,
        client: ClientKey,
        unit: UnitKey,
    ) -> Self {
        Self {
            confirmation,
            span,
            occupants,
            client,
            unit,
        }
    }

    pub fn confirmation(&self) -> ConfirmationNumber {
        self.confirmation
    }

    pub fn span(&self) -> DateSpan {
        self.span
    }

    pub fn start(&self) -> NaiveDate {
        self.span.start
    }

    pub fn end(&self) -> NaiveDate {
        self.span.end
    }

    pub fn occupants(&self) -> u32 {
        self.occupants
    }

    pub fn client(&self) -> &ClientKey {
        &self.client
    }

    pub fn unit(&self) -> UnitKey {
        self.unit
    }

    /// Move the end date earlier. Never extends and never crosses the start.
    pub fn shorten_end(&mut self, new_end: NaiveDate) -> Result<(), EngineError> {
        if new_end < self.span.start {
            return Err(EngineError::InvalidDateRange("end date before start date"));
        }
        if new_end > self.span.end {
            return Err(EngineError::InvalidDateRange("end date can only move earlier"));
        }
        self.span.end = new_end;
        Ok(())
    }

    pub fn fields(&self) -> LeaseFields {
        LeaseFields {
            confirmation: self.confirmation.to_string(),
            dates: self.span.to_string(),
            occupants: self.occupants.to_string(),
            location: self.unit.to_string(),
            client_name: self.client.name.clone(),
            client_id: self.client.id.clone(),
        }
    }
}

impl PartialEq for Reservation {
    fn eq(&self, other: &Self) -> bool {
        self.span.start == other.span.start && self.confirmation == other.confirmation
    }
}

impl Eq for Reservation {}

impl PartialOrd for Reservation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reservation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.span
            .start
            .cmp(&other.span.start)
            .then(self.confirmation.cmp(&other.confirmation))
    }
}

/// Report-ready strings for one reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaseFields {
    /// Zero-padded to six digits.
    pub confirmation: String,
    /// `start to end`
    pub dates: String,
    pub occupants: String,
    /// Kind-labeled location, e.g. `Office:            1-28`.
    pub location: String,
    pub client_name: String,
    pub client_id: String,
}

impl LeaseFields {
    /// Line shown when listing a unit's leases.
    pub fn unit_line(&self) -> String {
        format!(
            "{} | {} | {:>3} | {} ({})",
            self.confirmation, self.dates, self.occupants, self.client_name, self.client_id
        )
    }

    /// Line shown when listing a client's leases.
    pub fn client_line(&self) -> String {
        format!(
            "{} | {} | {:>29}",
            self.confirmation,
            self.dates,
            format!("{} | {}", self.occupants, self.location)
        )
    }
}
