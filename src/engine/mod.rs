mod conflict;
mod error;
mod mutations;
mod occupancy;
pub mod policy;
mod queries;

pub use error::EngineError;

use crate::collections::OrderedSequence;
use crate::model::*;

use occupancy::OccupancyCalendar;

/// A leasable office, conference room or hotel suite and its reservations.
///
/// Units are equal by location and order by floor, then room. The reservation
/// sequence is only ever touched through the unit's own operations, which keep
/// it sorted and free of conflicts under the kind's rules.
#[derive(Debug)]
pub struct Unit {
    kind: UnitKind,
    location: Location,
    capacity: u32,
    in_service: bool,
    leases: OrderedSequence<Reservation>,
    /// Offices only.
    occupancy: Option<OccupancyCalendar>,
}

impl Unit {
    pub fn new(kind: UnitKind, location: &str, capacity: u32) -> Result<Self, EngineError> {
        if capacity == 0 {
            return Err(EngineError::InvalidRequest("invalid capacity"));
        }
        let location: Location = location.parse()?;
        if capacity > kind.max_capacity() {
            return Err(EngineError::InvalidRequest("capacity over max"));
        }
        let occupancy = match kind {
            UnitKind::TimedOffice => Some(OccupancyCalendar::new()),
            UnitKind::ShortStayRoom | UnitKind::WeeklySuite => None,
        };
        Ok(Self {
            kind,
            location,
            capacity,
            in_service: true,
            leases: OrderedSequence::new(),
            occupancy,
        })
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn floor(&self) -> u8 {
        self.location.floor
    }

    pub fn room(&self) -> u8 {
        self.location.room
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn key(&self) -> UnitKey {
        UnitKey {
            kind: self.kind,
            location: self.location,
        }
    }

    pub fn is_in_service(&self) -> bool {
        self.in_service
    }

    pub fn take_out_of_service(&mut self) {
        self.in_service = false;
    }

    pub fn return_to_service(&mut self) {
        self.in_service = true;
    }

    pub fn leases(&self) -> &OrderedSequence<Reservation> {
        &self.leases
    }

    pub fn find_lease(&self, number: ConfirmationNumber) -> Option<&Reservation> {
        self.leases.iter().find(|r| r.confirmation() == number)
    }

    fn rebuild_occupancy(&mut self) {
        if let Some(calendar) = &mut self.occupancy {
            calendar.rebuild(&self.leases);
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for Unit {}

impl PartialOrd for Unit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Unit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.location.cmp(&other.location)
    }
}
