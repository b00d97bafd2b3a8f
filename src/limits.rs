// ── Building ────────────────────────────────────────────────────

pub const MIN_FLOOR: u8 = 1;
pub const MAX_FLOOR: u8 = 45;
pub const MIN_ROOM: u8 = 10;
pub const MAX_ROOM: u8 = 99;

// ── Calendar window (inclusive, whole years) ────────────────────

pub const FIRST_YEAR: i32 = 2020;
pub const LAST_YEAR: i32 = 2029;
pub const CALENDAR_YEARS: usize = (LAST_YEAR - FIRST_YEAR + 1) as usize;
pub const MONTHS_PER_YEAR: usize = 12;

// ── Unit kinds ──────────────────────────────────────────────────

pub const MAX_OFFICE_CAPACITY: u32 = 150;
pub const MAX_CONFERENCE_CAPACITY: u32 = 25;
pub const MAX_SUITE_CAPACITY: u32 = 2;

/// Days allowed between a short-stay start and end date.
pub const MAX_SHORT_STAY_SPAN_DAYS: i64 = 6;

// ── Confirmation numbers ────────────────────────────────────────

pub const MAX_CONFIRMATION: u32 = 999_999;

// ── Clients ─────────────────────────────────────────────────────

pub const MIN_CLIENT_ID_LEN: usize = 3;
pub const CLIENT_ID_SYMBOLS: [char; 3] = ['@', '#', '$'];
