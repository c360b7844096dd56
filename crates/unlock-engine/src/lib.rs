//! # unlock-engine
//!
//! Compile calendar intervals into a door controller's weekly template.
//!
//! The controller holds a fixed number (typically 8) of `(start, end, days)`
//! rules and unlocks whenever any of them is active. This crate turns a week
//! of labelled intervals into such a table, choosing rules that reproduce the
//! required unlock times exactly: never locked when an event needs the door,
//! never unlocked otherwise. Every template is re-simulated and checked
//! minute by minute before it is returned.
//!
//! ## Pipeline
//!
//! events -> [`Interval`]s -> merge/pad -> [`WeekGrid`] -> rules -> verify
//!
//! ## Modules
//!
//! - [`interval`] -- labelled intervals; merge, pad, clamp, split at midnight
//! - [`grid`] -- rasterize intervals into the 7 x 1440 required grid
//! - [`template`] -- naive builder, one rule per distinct clock window
//! - [`optimize`] -- greedy set-cover builder sharing rules across days
//! - [`verify`] -- OR-simulate rows and compare with the required grid
//! - [`compile`] -- options, naive-to-optimizer fallback, full pipeline
//! - [`event`] -- calendar events to intervals
//! - [`week`] -- local midnight and the 7-day window
//! - [`row`], [`clock`], [`day`] -- table rows, `HHMM` times, day indices
//! - [`error`] -- error types

pub mod clock;
pub mod compile;
pub mod day;
pub mod error;
pub mod event;
pub mod grid;
pub mod interval;
pub mod optimize;
pub mod row;
pub mod template;
pub mod verify;
pub mod week;

pub use clock::ClockWindow;
pub use compile::{
    build_unlock_rows, generate, prepare_intervals, Builder, GenerateOptions, Strategy,
    WeeklyTemplate, DEFAULT_MAX_INTERVALS,
};
pub use day::{Day, DayNames, DaySet};
pub use error::{Mismatch, ScheduleError};
pub use event::{event_to_interval, events_to_intervals, parse_events, CalendarEvent};
pub use grid::{build_required_grid, WeekGrid};
pub use interval::{merge, Interval};
pub use optimize::{build_weekly_template_optimized, cover_grid};
pub use row::{Rule, Slot, TemplateRow};
pub use template::build_weekly_template;
pub use verify::{simulate, verify};
pub use week::{week_window_from_date, WeekWindow};
