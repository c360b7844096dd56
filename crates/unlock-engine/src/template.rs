//! Exact one-rule-per-clock-window template builder.
//!
//! Every distinct `(start, end)` clock window that appears on any day becomes
//! its own rule, flagged for each day it appears on. The result is exact but
//! pessimistic: a Tuesday event running five minutes longer than Monday's
//! costs a whole extra rule.

use std::collections::BTreeMap;

use crate::clock::ClockWindow;
use crate::day::{DayNames, DaySet};
use crate::error::{Result, ScheduleError};
use crate::grid::segment_window;
use crate::interval::Interval;
use crate::row::{layout_rows, Rule, TemplateRow};

/// Group per-day segments by clock window and emit exactly `max_intervals` rows.
///
/// Segments covering no whole minute are skipped. Windows are ordered by
/// their rendered `HHMM` strings.
///
/// # Errors
/// Returns `ScheduleError::CapacityExceeded` naming every distinct window when
/// there are more than `max_intervals` of them. Nothing is dropped or merged
/// to make the week fit.
pub fn build_weekly_template(
    intervals: &[Interval],
    day_names: &DayNames,
    max_intervals: usize,
) -> Result<Vec<TemplateRow>> {
    let mut grouped: BTreeMap<ClockWindow, DaySet> = BTreeMap::new();

    for interval in intervals {
        for segment in interval.split_by_day() {
            if let Some((day, window)) = segment_window(&segment) {
                grouped.entry(window).or_default().insert(day);
            }
        }
    }

    if grouped.len() > max_intervals {
        return Err(ScheduleError::CapacityExceeded {
            needed: grouped.len(),
            budget: max_intervals,
            windows: grouped
                .iter()
                .map(|(window, days)| format!("{} {}", window, day_names.render(*days)))
                .collect(),
        });
    }

    let rules = grouped
        .into_iter()
        .map(|(window, days)| Rule { window, days })
        .collect();
    Ok(layout_rows(rules, max_intervals))
}
