//! Timestamp formatting utilities
//!
//! Records and batch frames share one fixed-width layout so that columns
//! line up regardless of the sub-second value:
//!
//! ```text
//! 2017-05-31 22:29:11.7489315 +03:00
//! ```

use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use std::fmt;

/// Number of fractional-second digits (100 ns resolution)
pub const FRACTION_DIGITS: usize = 7;

/// Width of a rendered timestamp in bytes
pub const TIMESTAMP_WIDTH: usize = 34;

/// Render `datetime` as `YYYY-MM-DD HH:MM:SS.fffffff +HH:MM`
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rust_log_dispatcher::core::timestamp::format_fixed_width;
///
/// let dt = Utc.with_ymd_and_hms(2017, 5, 31, 22, 29, 11).unwrap();
/// assert_eq!(format_fixed_width(&dt), "2017-05-31 22:29:11.0000000 +00:00");
/// ```
#[must_use]
pub fn format_fixed_width<Tz>(datetime: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    // Leap seconds report nanosecond() >= 1e9; clamp so the width never grows.
    let ticks = (datetime.nanosecond() % 1_000_000_000) / 100;
    format!(
        "{}.{:0width$} {}",
        datetime.format("%Y-%m-%d %H:%M:%S"),
        ticks,
        datetime.format("%:z"),
        width = FRACTION_DIGITS
    )
}

/// Current local wall-clock time, as stamped on log records
#[must_use]
pub fn local_now() -> String {
    format_fixed_width(&Local::now())
}

/// Current UTC time, as stamped on batch frames
#[must_use]
pub fn utc_now() -> String {
    format_fixed_width(&Utc::now())
}
