use crate::model::LeaseFields;

use super::Unit;

/// Column where the capacity starts in a unit description.
const DESCRIPTION_WIDTH: usize = 26;

impl Unit {
    /// One-line summary, e.g. `Office:            1-28 | 100  Unavailable`.
    pub fn description(&self) -> String {
        let head = format!("{}: ", self.kind);
        let mut line = format!(
            "{head}{:>width$}{:>3}",
            format!("{} | ", self.location),
            self.capacity,
            width = DESCRIPTION_WIDTH.saturating_sub(head.len()),
        );
        if !self.in_service {
            line.push_str("  Unavailable");
        }
        line
    }

    pub fn lease_fields(&self) -> Vec<LeaseFields> {
        self.leases.iter().map(|r| r.fields()).collect()
    }

    /// One line per lease, in date order.
    pub fn list_leases(&self) -> Vec<String> {
        self.leases.iter().map(|r| r.fields().unit_line()).collect()
    }
}
