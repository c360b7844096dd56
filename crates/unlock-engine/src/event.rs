//! Calendar events to labelled intervals.
//!
//! Events follow the Google Calendar v3 resource shape. Only timed events
//! (both edges carry `dateTime`) become intervals; all-day events and events
//! missing a timed edge are skipped.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::interval::Interval;
use crate::week::WeekWindow;

/// Label used for events without a summary.
pub const UNTITLED: &str = "(no title)";

/// A calendar event as returned by the calendar service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
}

/// One edge of an event: `dateTime` for timed events, `date` for all-day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventFeed {
    Page { items: Vec<CalendarEvent> },
    List(Vec<CalendarEvent>),
}

/// Parse a JSON array of events, or a list response with an `items` array.
///
/// # Errors
/// Returns `ScheduleError::Json` if the document matches neither shape.
pub fn parse_events(json: &str) -> Result<Vec<CalendarEvent>> {
    let feed: EventFeed = serde_json::from_str(json)?;
    Ok(match feed {
        EventFeed::Page { items } => items,
        EventFeed::List(events) => events,
    })
}

/// Convert one event into an interval in `tz`, clamped to `window`.
///
/// Returns `Ok(None)` for all-day events, events without a timed edge, and
/// events with no duration left after clamping.
///
/// # Errors
/// Returns `ScheduleError::InvalidEvent` when a `dateTime` is not RFC 3339
/// with an explicit offset.
pub fn event_to_interval(
    event: &CalendarEvent,
    tz: &Tz,
    window: Option<&WeekWindow>,
) -> Result<Option<Interval>> {
    let (Some(start), Some(end)) = (&event.start.date_time, &event.end.date_time) else {
        return Ok(None);
    };

    let mut start = parse_instant(start, tz)?;
    let mut end = parse_instant(end, tz)?;
    if let Some(window) = window {
        start = start.max(window.start);
        end = end.min(window.end);
    }
    if end <= start {
        return Ok(None);
    }

    let label = event.summary.as_deref().unwrap_or(UNTITLED);
    Interval::new(start, end, [label]).map(Some)
}

/// Convert every event, dropping the ones [`event_to_interval`] skips.
///
/// # Errors
/// Fails on the first event with a malformed timestamp.
pub fn events_to_intervals(
    events: &[CalendarEvent],
    tz: &Tz,
    window: Option<&WeekWindow>,
) -> Result<Vec<Interval>> {
    let mut intervals = Vec::with_capacity(events.len());
    for event in events {
        if let Some(interval) = event_to_interval(event, tz, window)? {
            intervals.push(interval);
        }
    }
    Ok(intervals)
}

fn parse_instant(s: &str, tz: &Tz) -> Result<DateTime<Tz>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(tz))
        .map_err(|e| {
            ScheduleError::InvalidEvent(format!(
                "'{}' is not an RFC 3339 timestamp with offset: {}",
                s, e
            ))
        })
}
