use crate::collections::OrderedSequence;
use crate::model::*;

use super::EngineError;
use super::occupancy::OccupancyCalendar;

/// Reject `span` if it collides with a lease already on the unit.
///
/// Short-stay rooms treat a shared boundary day as a collision; weekly suites
/// hand over on the boundary day, so only a true overlap counts. Offices share
/// space and are limited by [`check_capacity`] instead.
pub(crate) fn check_no_conflict(
    kind: UnitKind,
    leases: &OrderedSequence<Reservation>,
    span: &DateSpan,
) -> Result<(), EngineError> {
    let collides: fn(&DateSpan, &DateSpan) -> bool = match kind {
        UnitKind::TimedOffice => return Ok(()),
        UnitKind::ShortStayRoom => DateSpan::intersects,
        UnitKind::WeeklySuite => DateSpan::overlaps,
    };
    if leases.iter().any(|existing| collides(&existing.span(), span)) {
        return Err(EngineError::InvalidDateRange("conflicts with an existing lease"));
    }
    Ok(())
}

pub(crate) fn check_capacity(
    capacity: u32,
    occupancy: Option<&OccupancyCalendar>,
    span: &DateSpan,
    occupants: u32,
) -> Result<(), EngineError> {
    let available = match occupancy {
        Some(calendar) => calendar.available(span, capacity),
        None => capacity,
    };
    if occupants > available {
        return Err(EngineError::InsufficientCapacity {
            requested: occupants,
            available,
        });
    }
    Ok(())
}
