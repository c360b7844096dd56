//! Day-of-week indices, day sets, and the configurable day-name table.
//!
//! The controller numbers days `0..=6` as Sunday..Saturday. chrono's
//! `Weekday::num_days_from_sunday` already uses that convention, so every
//! conversion from a date goes through [`Day::of`].

use std::fmt;

use chrono::Datelike;

use crate::error::{Result, ScheduleError};

pub const DAYS_PER_WEEK: usize = 7;

const ABBREVIATIONS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Template columns that sit beside the day columns in every row record.
pub const RESERVED_COLUMNS: [&str; 4] = ["Interval", "Start", "End", "Holidays"];

/// A controller day index, Sunday = 0 .. Saturday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Day(u8);

impl Day {
    pub const SUNDAY: Day = Day(0);
    pub const MONDAY: Day = Day(1);
    pub const TUESDAY: Day = Day(2);
    pub const WEDNESDAY: Day = Day(3);
    pub const THURSDAY: Day = Day(4);
    pub const FRIDAY: Day = Day(5);
    pub const SATURDAY: Day = Day(6);

    pub const ALL: [Day; DAYS_PER_WEEK] = [
        Day::SUNDAY,
        Day::MONDAY,
        Day::TUESDAY,
        Day::WEDNESDAY,
        Day::THURSDAY,
        Day::FRIDAY,
        Day::SATURDAY,
    ];

    pub fn from_index(index: usize) -> Option<Day> {
        Day::ALL.get(index).copied()
    }

    /// The controller day of a local date or datetime.
    pub fn of(date: &impl Datelike) -> Day {
        Day(date.weekday().num_days_from_sunday() as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Default three-letter name, used in diagnostics.
    pub fn abbrev(self) -> &'static str {
        ABBREVIATIONS[self.index()]
    }
}

/// A set of controller days, stored as a 7-bit mask (bit 0 = Sunday).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    pub const EMPTY: DaySet = DaySet(0);

    pub fn insert(&mut self, day: Day) {
        self.0 |= 1 << day.0;
    }

    pub fn contains(self, day: Day) -> bool {
        self.0 & (1 << day.0) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Day> {
        Day::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Day> for DaySet {
    fn from_iter<I: IntoIterator<Item = Day>>(iter: I) -> Self {
        let mut set = DaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Day::abbrev).collect();
        write!(f, "{}", names.join(","))
    }
}

/// Ordered day-name table mapping controller index to column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayNames([String; DAYS_PER_WEEK]);

impl DayNames {
    /// Build a table from exactly seven distinct, non-empty names in
    /// Sunday..Saturday order.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidDayNames` on a wrong count, an empty
    /// name, a duplicate, or a name that collides with one of the
    /// [`RESERVED_COLUMNS`].
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let count = names.len();
        let names: [String; DAYS_PER_WEEK] = names.try_into().map_err(|_| {
            ScheduleError::InvalidDayNames(format!("expected 7 names, got {}", count))
        })?;

        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ScheduleError::InvalidDayNames(format!(
                    "name at index {} is empty",
                    i
                )));
            }
            if RESERVED_COLUMNS.contains(&name.trim()) {
                return Err(ScheduleError::InvalidDayNames(format!(
                    "'{}' is a reserved column name",
                    name
                )));
            }
            if names[..i].contains(name) {
                return Err(ScheduleError::InvalidDayNames(format!(
                    "duplicate name '{}'",
                    name
                )));
            }
        }

        Ok(Self(names))
    }

    pub fn name(&self, day: Day) -> &str {
        &self.0[day.index()]
    }

    pub fn day(&self, name: &str) -> Option<Day> {
        self.0
            .iter()
            .position(|n| n == name)
            .and_then(Day::from_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Day, &str)> {
        Day::ALL.into_iter().zip(self.0.iter().map(String::as_str))
    }

    /// Render a day set as one column per day: the name when set, `-` otherwise.
    pub fn render(&self, days: DaySet) -> String {
        self.iter()
            .map(|(day, name)| if days.contains(day) { name } else { "-" })
            .collect()
    }
}

impl Default for DayNames {
    fn default() -> Self {
        Self(ABBREVIATIONS.map(String::from))
    }
}
