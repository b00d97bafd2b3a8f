use crate::engine::EngineError;
use crate::model::UnitKind;

// ── Reservations ────────────────────────────────────────────────

/// Counter: reservation attempts reaching a unit. Labels: kind, status.
pub const RESERVATIONS_TOTAL: &str = "leasehold_reservations_total";

/// Counter: confirmation numbers handed back after a rejected attempt.
pub const CONFIRMATION_ROLLBACKS_TOTAL: &str = "leasehold_confirmation_rollbacks_total";

// ── Service changes ─────────────────────────────────────────────

/// Counter: leases cancelled or dropped by a cutover. Labels: kind.
pub const CUTOVER_CANCELLED_TOTAL: &str = "leasehold_cutover_cancelled_total";

/// Counter: rental files loaded or saved. Labels: direction.
pub const RENTAL_FILES_TOTAL: &str = "leasehold_rental_files_total";

/// Map a unit kind to a short label for metrics.
pub fn kind_label(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::TimedOffice => "office",
        UnitKind::ShortStayRoom => "conference_room",
        UnitKind::WeeklySuite => "hotel_suite",
    }
}

/// Map a reservation outcome to a short label for metrics.
pub fn status_label<T>(result: &Result<T, EngineError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(EngineError::InvalidRequest(_)) => "invalid_request",
        Err(EngineError::OutOfService(_)) => "out_of_service",
        Err(EngineError::InvalidDateRange(_)) => "invalid_dates",
        Err(EngineError::InsufficientCapacity { .. }) => "insufficient_capacity",
        Err(_) => "error",
    }
}
