//! Rasterize intervals into a 7 x 1440 minute grid.
//!
//! `grid[d][m]` is true when the door must be unlocked at minute `m` of
//! controller day `d`. Building is a monotone union: no interval can turn a
//! cell back to false.

use std::fmt;
use std::ops::Range;

use chrono::Timelike;

use crate::clock::{ClockWindow, MINUTES_PER_DAY};
use crate::day::{Day, DAYS_PER_WEEK};
use crate::interval::Interval;

const MINUTES: usize = MINUTES_PER_DAY as usize;

/// One boolean per minute of the week.
#[derive(Clone, PartialEq, Eq)]
pub struct WeekGrid {
    cells: Box<[[bool; MINUTES]; DAYS_PER_WEEK]>,
}

impl WeekGrid {
    pub fn new() -> Self {
        Self {
            cells: Box::new([[false; MINUTES]; DAYS_PER_WEEK]),
        }
    }

    pub fn get(&self, day: Day, minute: u16) -> bool {
        self.cells[day.index()]
            .get(minute as usize)
            .copied()
            .unwrap_or(false)
    }

    pub fn row(&self, day: Day) -> &[bool; MINUTES] {
        &self.cells[day.index()]
    }

    /// Set every minute of `window` on `day` to `value`.
    pub fn fill(&mut self, day: Day, window: ClockWindow, value: bool) {
        self.cells[day.index()][window.minutes()].fill(value);
    }

    /// Count of true cells over the whole week.
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|c| !c)
    }

    /// Maximal runs of consecutive true minutes on `day`, in order.
    pub fn runs(&self, day: Day) -> Vec<Range<u16>> {
        let row = self.row(day);
        let mut runs = Vec::new();
        let mut start = None;
        for (minute, &on) in row.iter().enumerate() {
            match (on, start) {
                (true, None) => start = Some(minute as u16),
                (false, Some(s)) => {
                    runs.push(s..minute as u16);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(s..MINUTES_PER_DAY);
        }
        runs
    }
}

impl Default for WeekGrid {
    fn default() -> Self {
        Self::new()
    }
}

// The raw cells are unreadable; show each day as its runs instead.
impl fmt::Debug for WeekGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for day in Day::ALL {
            let runs: Vec<String> = self
                .runs(day)
                .into_iter()
                .filter_map(|r| ClockWindow::new(r.start, r.end))
                .map(|w| w.to_string())
                .collect();
            map.entry(&day.abbrev(), &runs);
        }
        map.finish()
    }
}

/// Build the required-unlock grid for a set of intervals.
///
/// Each interval is split at local midnight; each segment marks its minute
/// range on the controller day of its start date.
pub fn build_required_grid(intervals: &[Interval]) -> WeekGrid {
    let mut grid = WeekGrid::new();
    for interval in intervals {
        for segment in interval.split_by_day() {
            if let Some((day, window)) = segment_window(&segment) {
                grid.fill(day, window, true);
            }
        }
    }
    grid
}

/// Controller day and minute window of a single-day segment.
///
/// A segment whose end falls on a later date than its start ends at local
/// midnight, so its end is minute 1440, not minute 0. `None` for segments
/// that cover no whole minute.
pub(crate) fn segment_window(segment: &Interval) -> Option<(Day, ClockWindow)> {
    let start = segment.start();
    let end = segment.end();

    let start_min = minute_of_day(start);
    let end_min = if end.date_naive() > start.date_naive() {
        MINUTES_PER_DAY
    } else {
        minute_of_day(end)
    };

    let window = ClockWindow::new(start_min.min(MINUTES_PER_DAY), end_min.min(MINUTES_PER_DAY))?;
    Some((Day::of(&start), window))
}

fn minute_of_day(t: impl Timelike) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}
