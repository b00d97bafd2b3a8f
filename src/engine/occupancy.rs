use chrono::Datelike;

use crate::limits::*;
use crate::model::{DateSpan, Reservation};

use super::policy::months_covered;

/// Occupants booked per month across the supported ten-year window.
#[derive(Debug, Clone)]
pub(crate) struct OccupancyCalendar {
    months: [[u32; MONTHS_PER_YEAR]; CALENDAR_YEARS],
}

impl OccupancyCalendar {
    pub fn new() -> Self {
        Self {
            months: [[0; MONTHS_PER_YEAR]; CALENDAR_YEARS],
        }
    }

    /// `(year, month)` grid cells touched by `span`, clipped to the window.
    fn cells(span: &DateSpan) -> impl Iterator<Item = (usize, usize)> {
        let first = (span.start().year() - FIRST_YEAR) * MONTHS_PER_YEAR as i32
            + span.start().month0() as i32;
        let count = months_covered(span.start(), span.end()) as i32;
        let last_cell = (CALENDAR_YEARS * MONTHS_PER_YEAR) as i32;
        (first..first + count)
            .filter(move |&i| (0..last_cell).contains(&i))
            .map(|i| {
                let i = i as usize;
                (i / MONTHS_PER_YEAR, i % MONTHS_PER_YEAR)
            })
    }

    /// Smallest number of free places in any month of `span`.
    pub fn available(&self, span: &DateSpan, capacity: u32) -> u32 {
        Self::cells(span)
            .map(|(y, m)| capacity.saturating_sub(self.months[y][m]))
            .min()
            .unwrap_or(capacity)
    }

    pub fn book(&mut self, span: &DateSpan, occupants: u32) {
        for (y, m) in Self::cells(span) {
            self.months[y][m] += occupants;
        }
    }

    pub fn rebuild<'a>(&mut self, leases: impl IntoIterator<Item = &'a Reservation>) {
        self.months = [[0; MONTHS_PER_YEAR]; CALENDAR_YEARS];
        for lease in leases {
            self.book(&lease.span(), lease.occupants());
        }
    }
}
