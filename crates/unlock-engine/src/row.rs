//! Template rows: the fixed-size `(start, end, days)` table a controller holds.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::clock::{format_hhmm, parse_hhmm, ClockWindow, MINUTES_PER_DAY};
use crate::day::{DayNames, DaySet};
use crate::error::{Result, ScheduleError};

/// A single unlock rule before it is placed in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub window: ClockWindow,
    pub days: DaySet,
}

/// What a table slot holds.
///
/// Both an unused slot and a full-day window render as `0000`/`0000`, so the
/// distinction lives here instead of in the clock strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Unused,
    Open(ClockWindow),
}

/// One row of the controller's weekly template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateRow {
    /// 1-based position in the table.
    pub index: usize,
    pub slot: Slot,
    pub days: DaySet,
    pub holiday: bool,
}

impl TemplateRow {
    pub fn unused(index: usize) -> Self {
        Self {
            index,
            slot: Slot::Unused,
            days: DaySet::EMPTY,
            holiday: false,
        }
    }

    /// Rebuild a row from its rendered form.
    ///
    /// An end of `0000` means end of day. A `0000`/`0000` row is a full-day
    /// window when any day is set and an unused slot otherwise.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidClock` for malformed times, or for a
    /// row with days set whose end is not after its start.
    pub fn from_hhmm(
        index: usize,
        start: &str,
        end: &str,
        days: DaySet,
        holiday: bool,
    ) -> Result<Self> {
        let start_min = parse_hhmm(start)?;
        let end_min = match parse_hhmm(end)? {
            0 => MINUTES_PER_DAY,
            m => m,
        };

        let slot = match ClockWindow::new(start_min, end_min) {
            Some(window) if window == ClockWindow::FULL_DAY && days.is_empty() => Slot::Unused,
            Some(window) => Slot::Open(window),
            None if days.is_empty() => Slot::Unused,
            None => {
                return Err(ScheduleError::InvalidClock(format!(
                    "row {}: {}-{} is not a forward window",
                    index, start, end
                )))
            }
        };
        Ok(Self {
            index,
            slot,
            days,
            holiday,
        })
    }

    pub fn is_unused(&self) -> bool {
        self.slot == Slot::Unused
    }

    pub fn window(&self) -> Option<ClockWindow> {
        match self.slot {
            Slot::Open(window) => Some(window),
            Slot::Unused => None,
        }
    }

    pub fn start_hhmm(&self) -> String {
        format_hhmm(self.window().map_or(0, ClockWindow::start))
    }

    pub fn end_hhmm(&self) -> String {
        format_hhmm(self.window().map_or(0, ClockWindow::end))
    }

    /// The row as an ordered JSON object with the controller's column names:
    /// `Interval, Start, End, <day columns>, Holidays`.
    pub fn to_record(&self, names: &DayNames) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("Interval".into(), Value::from(self.index));
        record.insert("Start".into(), Value::from(self.start_hhmm()));
        record.insert("End".into(), Value::from(self.end_hhmm()));
        for (day, name) in names.iter() {
            record.insert(name.to_string(), Value::from(u8::from(self.days.contains(day))));
        }
        record.insert("Holidays".into(), Value::from(u8::from(self.holiday)));
        record
    }
}

impl Serialize for TemplateRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let record = self.to_record(&DayNames::default());
        let mut map = serializer.serialize_map(Some(record.len()))?;
        for (key, value) in &record {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Lay rules out as a table of exactly `size` rows: sorted by rendered
/// `(start, end)`, indexed from 1, and padded with unused slots.
pub(crate) fn layout_rows(mut rules: Vec<Rule>, size: usize) -> Vec<TemplateRow> {
    rules.sort_by_key(|r| r.window);

    let mut rows: Vec<TemplateRow> = rules
        .into_iter()
        .enumerate()
        .map(|(i, rule)| TemplateRow {
            index: i + 1,
            slot: Slot::Open(rule.window),
            days: rule.days,
            holiday: false,
        })
        .collect();

    while rows.len() < size {
        rows.push(TemplateRow::unused(rows.len() + 1));
    }
    rows
}
