//! Error types for unlock-engine operations.

use std::fmt;

use thiserror::Error;

use crate::day::Day;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid interval: end {end} is not after start {start}")]
    InvalidInterval { start: String, end: String },

    #[error("Invalid day names: {0}")]
    InvalidDayNames(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid clock time: {0}")]
    InvalidClock(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid event JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// More rules are needed than the controller can hold.
    #[error(
        "This week requires at least {needed} time windows, but the controller supports only {budget}. \
         Windows: [{}]. Standardize event times or reduce variability.",
        .windows.join(", ")
    )]
    CapacityExceeded {
        needed: usize,
        budget: usize,
        windows: Vec<String>,
    },

    /// The optimizer ran out of safe candidates with required minutes still
    /// uncovered. Never a property of the input.
    #[error(
        "Optimizer found no safe window covering the {uncovered} remaining required minutes; \
         boundary generation missed an edge"
    )]
    NoSafeCandidate { uncovered: usize },

    #[error(
        "Template rows do not match the required schedule (first {} mismatches shown): {}",
        .mismatches.len(),
        .mismatches.iter().map(|m| m.to_string()).collect::<Vec<_>>().join("; ")
    )]
    VerificationMismatch { mismatches: Vec<Mismatch> },
}

impl ScheduleError {
    /// True for the overflow outcome the pipeline may recover from by
    /// switching builders.
    pub fn is_capacity(&self) -> bool {
        matches!(self, ScheduleError::CapacityExceeded { .. })
    }
}

/// One cell where the simulated template disagrees with the required grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub day: Day,
    pub minute: u16,
    pub required: bool,
    pub simulated: bool,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02} required={} simulated={}",
            self.day.abbrev(),
            self.minute / 60,
            self.minute % 60,
            u8::from(self.required),
            u8::from(self.simulated)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
