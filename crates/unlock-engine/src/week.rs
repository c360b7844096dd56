//! Local-midnight arithmetic and the 7-day generation window.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};

/// A `[start, end)` window of seven local days, both ends at local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Parse an IANA zone name.
///
/// # Errors
/// Returns `ScheduleError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Local midnight at the start of `date`.
///
/// Where midnight is ambiguous the earlier instant is used. Where midnight
/// falls in a DST gap, the first valid instant of the day is used.
pub fn local_midnight(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Read the wall time with the offset in force before the gap; the
            // resulting instant is the moment the gap ends.
            let offset = tz
                .from_local_datetime(&(naive - Duration::hours(6)))
                .earliest()
                .map(|before| before.offset().fix())
                .unwrap_or_else(|| tz.offset_from_utc_datetime(&naive).fix());
            tz.from_utc_datetime(&(naive - offset))
        }
    }
}

/// The window `[local midnight of start_date, local midnight 7 days later)`.
pub fn week_window_from_date(start_date: NaiveDate, tz: &Tz) -> WeekWindow {
    let end_date = start_date + Duration::days(7);
    WeekWindow {
        start: local_midnight(tz, start_date),
        end: local_midnight(tz, end_date),
    }
}

/// The next Sunday 00:00 in `now`'s zone; today's midnight if today is Sunday.
pub fn next_sunday_midnight(now: DateTime<Tz>) -> DateTime<Tz> {
    let today = now.date_naive();
    let days_ahead = (7 - today.weekday().num_days_from_sunday()) % 7;
    local_midnight(&now.timezone(), today + Duration::days(days_ahead as i64))
}

/// The Sunday-to-Sunday window starting at [`next_sunday_midnight`].
pub fn week_window_starting_sunday(now: DateTime<Tz>) -> WeekWindow {
    week_window_from_date(next_sunday_midnight(now).date_naive(), &now.timezone())
}
