//! Clock and date helpers
//!
//! Asset windows are stored and compared as naive UTC wall times. Three
//! text formats are in play:
//! - ISO form input from the JSON/API flow (`2013-01-16T00:00:00`, an
//!   optional fractional part is ignored)
//! - the legacy form input and display format (`2013-01-16 @ 00:00`)
//! - the database column format (`2013-01-16 00:00:00`)

use chrono::{NaiveDateTime, Utc};

use crate::{Error, Result};

/// Format accepted from the API `start_date`/`end_date` fields
pub const ISO_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format used by the legacy forms and for display
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d @ %H:%M";

/// Format of the TIMESTAMP columns in the assets table
pub const DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of "now" for schedule evaluation
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        now()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Get current UTC wall time
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Parse an API date, dropping anything after the first `.`
/// (`2013-01-16T00:00:00.000Z` parses as `2013-01-16T00:00:00`).
pub fn parse_iso_input(value: &str) -> Result<NaiveDateTime> {
    let head = value.split('.').next().unwrap_or(value);
    NaiveDateTime::parse_from_str(head, ISO_INPUT_FORMAT).map_err(|_| Error::InvalidDate {
        value: value.to_string(),
        format: ISO_INPUT_FORMAT,
    })
}

/// Parse a legacy form date (`2013-01-16 @ 00:00`)
pub fn parse_display(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DISPLAY_FORMAT).map_err(|_| Error::InvalidDate {
        value: value.to_string(),
        format: DISPLAY_FORMAT,
    })
}

/// Render a date for display and for pre-filling the edit form
pub fn format_display(value: &NaiveDateTime) -> String {
    value.format(DISPLAY_FORMAT).to_string()
}

/// Render a date for the TIMESTAMP column
pub fn format_db(value: &NaiveDateTime) -> String {
    value.format(DB_FORMAT).to_string()
}

/// Read a TIMESTAMP column value
///
/// Empty strings were written by older versions for "unscheduled" and are
/// treated the same as NULL. Fractional seconds and an ISO `T` separator
/// are tolerated.
pub fn parse_db(value: Option<&str>) -> Option<NaiveDateTime> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    let head = value.split('.').next().unwrap_or(value);
    NaiveDateTime::parse_from_str(head, DB_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(head, ISO_INPUT_FORMAT))
        .ok()
}
