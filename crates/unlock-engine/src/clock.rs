//! Minute-of-day clock windows and their `HHMM` rendering.
//!
//! Minutes run `0..=1440`. The controller renders both minute 0 and minute
//! 1440 as `"0000"`; which one is meant depends on position (start or end).

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use crate::error::{Result, ScheduleError};

pub const MINUTES_PER_DAY: u16 = 1440;

/// A half-open `[start, end)` span of minutes within one day.
///
/// Invariant: `start < end <= 1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockWindow {
    start: u16,
    end: u16,
}

impl ClockWindow {
    /// Returns `None` for empty or out-of-range spans.
    pub fn new(start: u16, end: u16) -> Option<Self> {
        (start < end && end <= MINUTES_PER_DAY).then_some(Self { start, end })
    }

    pub const FULL_DAY: ClockWindow = ClockWindow {
        start: 0,
        end: MINUTES_PER_DAY,
    };

    pub fn start(self) -> u16 {
        self.start
    }

    pub fn end(self) -> u16 {
        self.end
    }

    pub fn len(self) -> u16 {
        self.end - self.start
    }

    pub fn minutes(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    pub fn start_hhmm(self) -> String {
        format_hhmm(self.start)
    }

    pub fn end_hhmm(self) -> String {
        format_hhmm(self.end)
    }
}

// Ordered the way the rendered `(start, end)` strings sort, so an
// end-of-day window comes before other windows with the same start.
impl Ord for ClockWindow {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start, self.end % MINUTES_PER_DAY).cmp(&(other.start, other.end % MINUTES_PER_DAY))
    }
}

impl PartialOrd for ClockWindow {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ClockWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_hhmm(), self.end_hhmm())
    }
}

/// Render a minute offset as `HHMM`. Minute 1440 (end of day) renders as `"0000"`.
pub fn format_hhmm(minute: u16) -> String {
    let minute = minute % MINUTES_PER_DAY;
    format!("{:02}{:02}", minute / 60, minute % 60)
}

/// Parse a 4-digit `HHMM` string into a minute offset in `0..1440`.
///
/// # Errors
/// Returns `ScheduleError::InvalidClock` for anything other than four ASCII
/// digits with hour < 24 and minute < 60.
pub fn parse_hhmm(s: &str) -> Result<u16> {
    let invalid = || ScheduleError::InvalidClock(format!("'{}' is not an HHMM time", s));

    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: u16 = s[..2].parse().map_err(|_| invalid())?;
    let minutes: u16 = s[2..].parse().map_err(|_| invalid())?;
    if hours >= 24 || minutes >= 60 {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}
