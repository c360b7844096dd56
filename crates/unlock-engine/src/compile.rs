//! End-to-end generation: prepare intervals, build rows, verify.

use serde::Serialize;
use tracing::info;

use crate::day::DayNames;
use crate::error::Result;
use crate::event::{events_to_intervals, CalendarEvent};
use crate::grid::build_required_grid;
use crate::interval::{merge, Interval};
use crate::optimize::build_weekly_template_optimized;
use crate::row::TemplateRow;
use crate::template::build_weekly_template;
use crate::verify::verify;
use crate::week::WeekWindow;

/// Rule slots on the target controller.
pub const DEFAULT_MAX_INTERVALS: usize = 8;

/// How rows are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One rule per distinct clock window, falling back to the optimizer once
    /// if that overflows the budget.
    #[default]
    Naive,
    /// Always use the greedy optimizer.
    Optimize,
}

/// Which builder produced a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Builder {
    Naive,
    Optimized,
}

/// Caller-supplied generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Minutes to unlock before each event.
    pub pad_before_min: u32,
    /// Minutes to stay unlocked after each event.
    pub pad_after_min: u32,
    pub strategy: Strategy,
    pub max_intervals: usize,
    pub day_names: DayNames,
    /// Merge intervals that only touch, not just ones that overlap.
    pub merge_touching: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            pad_before_min: 0,
            pad_after_min: 0,
            strategy: Strategy::default(),
            max_intervals: DEFAULT_MAX_INTERVALS,
            day_names: DayNames::default(),
            merge_touching: true,
        }
    }
}

/// Verified rows plus the builder that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyTemplate {
    pub rows: Vec<TemplateRow>,
    pub builder: Builder,
}

impl WeeklyTemplate {
    /// Rows holding a window, in table order.
    pub fn used_rows(&self) -> impl Iterator<Item = &TemplateRow> {
        self.rows.iter().filter(|r| !r.is_unused())
    }
}

/// Merge, pad, clamp, and re-merge intervals ready for compilation.
///
/// Padding can make disjoint intervals overlap, hence the second merge.
/// When `window` is given, padded intervals are clamped to it and intervals
/// left empty are dropped. The result is sorted by start.
pub fn prepare_intervals(
    intervals: &[Interval],
    options: &GenerateOptions,
    window: Option<&WeekWindow>,
) -> Vec<Interval> {
    let merged = merge(intervals, options.merge_touching);
    if options.pad_before_min == 0 && options.pad_after_min == 0 {
        return merged;
    }

    let padded: Vec<Interval> = merged
        .iter()
        .map(|iv| iv.pad(options.pad_before_min, options.pad_after_min))
        .filter_map(|iv| match window {
            Some(w) => iv.clamp(w.start, w.end),
            None => Some(iv),
        })
        .collect();
    merge(&padded, options.merge_touching)
}

/// Build and verify the template for already-prepared intervals.
///
/// With [`Strategy::Naive`], a capacity overflow from the naive builder is
/// retried once with the optimizer; any other failure is returned as is.
///
/// # Errors
/// - `ScheduleError::CapacityExceeded` if the final builder overflows.
/// - `ScheduleError::NoSafeCandidate` from the optimizer.
/// - `ScheduleError::VerificationMismatch` if the rows are not exact.
pub fn build_unlock_rows(
    intervals: &[Interval],
    options: &GenerateOptions,
) -> Result<WeeklyTemplate> {
    let max = options.max_intervals;
    let (rows, builder) = match options.strategy {
        Strategy::Optimize => (
            build_weekly_template_optimized(intervals, &options.day_names, max)?,
            Builder::Optimized,
        ),
        Strategy::Naive => match build_weekly_template(intervals, &options.day_names, max) {
            Ok(rows) => (rows, Builder::Naive),
            Err(err) if err.is_capacity() => {
                info!(error = %err, "naive template over budget, retrying with optimizer");
                (
                    build_weekly_template_optimized(intervals, &options.day_names, max)?,
                    Builder::Optimized,
                )
            }
            Err(err) => return Err(err),
        },
    };

    let required = build_required_grid(intervals);
    verify(&rows, &required)?;

    Ok(WeeklyTemplate { rows, builder })
}

/// Full pipeline from calendar events.
///
/// # Errors
/// Any error from event intake or [`build_unlock_rows`].
pub fn generate(
    events: &[CalendarEvent],
    tz: &chrono_tz::Tz,
    window: Option<&WeekWindow>,
    options: &GenerateOptions,
) -> Result<WeeklyTemplate> {
    let intervals = events_to_intervals(events, tz, window)?;
    let prepared = prepare_intervals(&intervals, options, window);
    build_unlock_rows(&prepared, options)
}
