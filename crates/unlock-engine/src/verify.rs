//! Re-simulate a template and check it against the required grid.
//!
//! The controller unlocks at a minute when any row whose day flag is set
//! covers it. Both builders are untrusted until their rows pass [`verify`].

use tracing::warn;

use crate::clock::MINUTES_PER_DAY;
use crate::day::Day;
use crate::error::{Mismatch, Result, ScheduleError};
use crate::grid::WeekGrid;
use crate::row::TemplateRow;

/// Most mismatches collected for one diagnostic.
pub const MAX_REPORTED_MISMATCHES: usize = 20;

/// The grid the controller would produce from `rows` (OR of all used rows).
pub fn simulate(rows: &[TemplateRow]) -> WeekGrid {
    let mut grid = WeekGrid::new();
    for row in rows {
        let Some(window) = row.window() else {
            continue;
        };
        for day in row.days.iter() {
            grid.fill(day, window, true);
        }
    }
    grid
}

/// Check that `rows` unlock exactly the minutes in `required`.
///
/// # Errors
/// Returns `ScheduleError::VerificationMismatch` with the first
/// [`MAX_REPORTED_MISMATCHES`] differing cells, in day then minute order.
/// A minute locked that should be open and a minute open that should be
/// locked are both mismatches.
pub fn verify(rows: &[TemplateRow], required: &WeekGrid) -> Result<()> {
    let simulated = simulate(rows);
    if simulated == *required {
        return Ok(());
    }

    let mismatches: Vec<Mismatch> = Day::ALL
        .into_iter()
        .flat_map(|day| (0..MINUTES_PER_DAY).map(move |minute| (day, minute)))
        .filter_map(|(day, minute)| {
            let required = required.get(day, minute);
            let simulated = simulated.get(day, minute);
            (required != simulated).then_some(Mismatch {
                day,
                minute,
                required,
                simulated,
            })
        })
        .take(MAX_REPORTED_MISMATCHES)
        .collect();

    warn!(count = mismatches.len(), "template does not reproduce required grid");
    Err(ScheduleError::VerificationMismatch { mismatches })
}
