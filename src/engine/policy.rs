use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::limits::*;
use crate::model::UnitKind;

use super::EngineError;

/// Day every weekly-suite lease starts and ends on.
pub const WEEK_BOUNDARY: Weekday = Weekday::Sun;

pub(crate) fn in_window(date: NaiveDate) -> bool {
    (FIRST_YEAR..=LAST_YEAR).contains(&date.year())
}

fn is_last_of_month(date: NaiveDate) -> bool {
    date.succ_opt().is_none_or(|next| next.month() != date.month())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_boundary_day(date: NaiveDate) -> Option<NaiveDate> {
    let ahead = 7 - u64::from(date.weekday().num_days_from_sunday());
    date.checked_add_days(Days::new(ahead))
}

/// End date of a lease of `duration` units (months, days or weeks) from `start`.
pub(crate) fn derive_end(
    kind: UnitKind,
    start: NaiveDate,
    duration: u32,
) -> Result<NaiveDate, EngineError> {
    let end = match kind {
        UnitKind::TimedOffice => start
            .checked_add_months(Months::new(duration))
            .and_then(|d| d.pred_opt()),
        UnitKind::ShortStayRoom => u64::from(duration)
            .checked_sub(1)
            .and_then(|days| start.checked_add_days(Days::new(days))),
        UnitKind::WeeklySuite => start.checked_add_days(Days::new(7 * u64::from(duration))),
    };
    end.ok_or(EngineError::InvalidDateRange("invalid date"))
}

/// Shared window and ordering check followed by the kind's own alignment rule.
pub(crate) fn check_dates(
    kind: UnitKind,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), EngineError> {
    if !in_window(start) || !in_window(end) {
        return Err(EngineError::InvalidDateRange("invalid date"));
    }
    if start > end {
        return Err(EngineError::InvalidDateRange("end date before start date"));
    }
    match kind {
        UnitKind::TimedOffice => {
            if start.day() != 1 || !is_last_of_month(end) {
                return Err(EngineError::InvalidDateRange(
                    "office leases run from the first to the last day of a month",
                ));
            }
        }
        UnitKind::ShortStayRoom => {
            if (end - start).num_days() > MAX_SHORT_STAY_SPAN_DAYS {
                return Err(EngineError::InvalidDateRange("duration exceeds limit"));
            }
        }
        UnitKind::WeeklySuite => {
            if start.weekday() != WEEK_BOUNDARY || end.weekday() != WEEK_BOUNDARY {
                return Err(EngineError::InvalidDateRange("invalid day of week"));
            }
            if start == end {
                return Err(EngineError::InvalidDateRange(
                    "lease cannot start and end on same day",
                ));
            }
        }
    }
    Ok(())
}

/// Cutover date after aligning `date` to the kind's lease boundaries.
///
/// Offices close from the first of the month, suites from the next Sunday,
/// short-stay rooms from the date itself.
pub(crate) fn effective_cutoff(kind: UnitKind, date: NaiveDate) -> NaiveDate {
    match kind {
        UnitKind::TimedOffice => first_of_month(date),
        UnitKind::ShortStayRoom => date,
        UnitKind::WeeklySuite => {
            if date.weekday() == WEEK_BOUNDARY {
                date
            } else {
                next_boundary_day(date).unwrap_or(date)
            }
        }
    }
}

/// New end date for a lease that runs past an aligned cutoff.
pub(crate) fn repaired_end(kind: UnitKind, cutoff: NaiveDate) -> Option<NaiveDate> {
    match kind {
        UnitKind::TimedOffice | UnitKind::ShortStayRoom => cutoff.pred_opt(),
        UnitKind::WeeklySuite => cutoff.checked_sub_days(Days::new(7)),
    }
}

/// Number of calendar months a lease touches, counting partial months.
pub(crate) fn months_covered(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32 + 1;
    months.max(0) as u32
}
