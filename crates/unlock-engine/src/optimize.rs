//! Greedy set-cover optimizer for weekly templates.
//!
//! The naive builder spends one rule per distinct clock window. This module
//! lets one rule serve several days even when their clock times differ, as
//! long as every minute the rule opens is required on every day it is
//! applied to. The template therefore never opens the door when it must stay
//! locked.
//!
//! ## Search space
//!
//! Candidate windows `(s, e)` take both edges from the *boundary set*: minute
//! 0, minute 1440, and every run start and run end on every day. A candidate
//! never straddles a required/not-required transition, so whether it is safe
//! on a day is a property of its interior alone.
//!
//! ## Selection
//!
//! While required minutes remain uncovered, the candidate with the best score
//! is chosen. Scores compare, in order:
//!
//! 1. alignment: per contributing day, +1 if `s` is a run start and +1 if `e`
//!    is a run end on that day
//! 2. newly covered minutes
//! 3. window length
//! 4. earlier start
//!
//! The rule is applied only to days where it covered something new.
//!
//! Minimum set cover is NP-hard; this greedy pass is an approximation and may
//! use more rules than strictly necessary.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use tracing::debug;

use crate::clock::{ClockWindow, MINUTES_PER_DAY};
use crate::day::{Day, DayNames, DaySet, DAYS_PER_WEEK};
use crate::error::{Result, ScheduleError};
use crate::grid::{build_required_grid, WeekGrid};
use crate::interval::Interval;
use crate::row::{layout_rows, Rule, TemplateRow};

const EDGES: usize = MINUTES_PER_DAY as usize + 1;

/// Build the required grid for `intervals` and cover it with at most
/// `max_intervals` rules, emitted as exactly `max_intervals` rows.
///
/// # Errors
/// - `ScheduleError::CapacityExceeded` when more than `max_intervals` rules
///   are needed.
/// - `ScheduleError::NoSafeCandidate` if the search stalls with required
///   minutes left; this is a defect, not an input condition.
pub fn build_weekly_template_optimized(
    intervals: &[Interval],
    day_names: &DayNames,
    max_intervals: usize,
) -> Result<Vec<TemplateRow>> {
    let grid = build_required_grid(intervals);
    let rules = cover_grid(&grid, day_names, max_intervals)?;
    Ok(layout_rows(rules, max_intervals))
}

/// Greedily choose rules whose OR reproduces `grid` exactly.
///
/// Rules come back in selection order. On overflow the chosen windows are
/// reported in selection order, days rendered with `day_names`.
pub fn cover_grid(
    grid: &WeekGrid,
    day_names: &DayNames,
    max_rules: usize,
) -> Result<Vec<Rule>> {
    let edges = RunEdges::from_grid(grid);
    let candidates = candidate_windows(&boundary_set(grid));
    let required = PrefixCounts::from_grid(grid);

    let mut uncovered = grid.clone();
    let mut remaining = grid.count();
    let mut chosen: Vec<Rule> = Vec::new();

    while remaining > 0 {
        let open = PrefixCounts::from_grid(&uncovered);
        let best = candidates
            .iter()
            .filter_map(|&window| Selection::evaluate(window, &required, &open, &edges))
            .max_by_key(Selection::score)
            .ok_or(ScheduleError::NoSafeCandidate {
                uncovered: remaining,
            })?;

        debug!(
            window = %best.window,
            days = %best.days,
            covered = best.covered,
            alignment = best.alignment,
            "selected window"
        );

        for day in best.days.iter() {
            uncovered.fill(day, best.window, false);
        }
        remaining -= best.covered;
        chosen.push(Rule {
            window: best.window,
            days: best.days,
        });

        if chosen.len() > max_rules {
            return Err(ScheduleError::CapacityExceeded {
                needed: chosen.len(),
                budget: max_rules,
                windows: chosen
                    .iter()
                    .map(|r| format!("{} {}", r.window, day_names.render(r.days)))
                    .collect(),
            });
        }
    }

    Ok(chosen)
}

/// Minute 0, minute 1440, and every run edge on every day, ascending.
pub fn boundary_set(grid: &WeekGrid) -> Vec<u16> {
    let mut boundaries = BTreeSet::from([0, MINUTES_PER_DAY]);
    for day in Day::ALL {
        for run in grid.runs(day) {
            boundaries.insert(run.start);
            boundaries.insert(run.end);
        }
    }
    boundaries.into_iter().collect()
}

/// Every forward pair drawn from `boundaries`.
pub fn candidate_windows(boundaries: &[u16]) -> Vec<ClockWindow> {
    boundaries
        .iter()
        .enumerate()
        .flat_map(|(i, &s)| {
            boundaries[i + 1..]
                .iter()
                .filter_map(move |&e| ClockWindow::new(s, e))
        })
        .collect()
}

/// A scored candidate for one greedy round.
#[derive(Debug, Clone, Copy)]
struct Selection {
    window: ClockWindow,
    days: DaySet,
    covered: usize,
    alignment: usize,
}

impl Selection {
    /// Score `window` against the current uncovered cells, or `None` if it
    /// covers nothing new on any day where it is safe.
    fn evaluate(
        window: ClockWindow,
        required: &PrefixCounts,
        open: &PrefixCounts,
        edges: &RunEdges,
    ) -> Option<Selection> {
        let len = window.len() as usize;
        let mut days = DaySet::EMPTY;
        let mut covered = 0;
        let mut alignment = 0;

        for day in Day::ALL {
            if required.count(day, window) != len {
                continue;
            }
            let fresh = open.count(day, window);
            if fresh == 0 {
                continue;
            }
            days.insert(day);
            covered += fresh;
            alignment += usize::from(edges.starts_run(day, window.start()))
                + usize::from(edges.ends_run(day, window.end()));
        }

        (covered > 0).then_some(Selection {
            window,
            days,
            covered,
            alignment,
        })
    }

    fn score(&self) -> (usize, usize, u16, Reverse<u16>) {
        (
            self.alignment,
            self.covered,
            self.window.len(),
            Reverse(self.window.start()),
        )
    }
}

/// Per-day prefix sums of true cells, so any window count is O(1).
struct PrefixCounts {
    prefix: [Vec<u16>; DAYS_PER_WEEK],
}

impl PrefixCounts {
    fn from_grid(grid: &WeekGrid) -> Self {
        let prefix = Day::ALL.map(|day| {
            let mut sums = Vec::with_capacity(EDGES);
            sums.push(0u16);
            let mut total = 0u16;
            for &on in grid.row(day) {
                total += u16::from(on);
                sums.push(total);
            }
            sums
        });
        Self { prefix }
    }

    fn count(&self, day: Day, window: ClockWindow) -> usize {
        let sums = &self.prefix[day.index()];
        (sums[window.end() as usize] - sums[window.start() as usize]) as usize
    }
}

/// Run starts and run ends of the required grid, per day.
struct RunEdges {
    starts: [Vec<bool>; DAYS_PER_WEEK],
    ends: [Vec<bool>; DAYS_PER_WEEK],
}

impl RunEdges {
    fn from_grid(grid: &WeekGrid) -> Self {
        let mut starts = Day::ALL.map(|_| vec![false; EDGES]);
        let mut ends = Day::ALL.map(|_| vec![false; EDGES]);
        for day in Day::ALL {
            for run in grid.runs(day) {
                starts[day.index()][run.start as usize] = true;
                ends[day.index()][run.end as usize] = true;
            }
        }
        Self { starts, ends }
    }

    fn starts_run(&self, day: Day, minute: u16) -> bool {
        self.starts[day.index()][minute as usize]
    }

    fn ends_run(&self, day: Day, minute: u16) -> bool {
        self.ends[day.index()][minute as usize]
    }
}
