//! Shared fixtures: build a week of intervals from a compact text table.
//!
//! Each non-blank line is `Days|Title|HH:MM-HH:MM`, where `Days` is one day
//! name or an inclusive range (`Mon-Fri`, wrapping ranges like `Fri-Mon` are
//! allowed). An end at or before the start runs past midnight.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use unlock_engine::{merge, Day, DayNames, Interval, TemplateRow};

/// Local time on day `day` (0 = Sunday) of the week starting Sunday 2026-01-04.
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    New_York
        .with_ymd_and_hms(2026, 1, 4 + day, hour, minute, 0)
        .unwrap()
}

fn hhmm(s: &str) -> (u32, u32) {
    let (h, m) = s.trim().split_once(':').unwrap();
    (h.parse().unwrap(), m.parse().unwrap())
}

fn expand_days(range: &str) -> Vec<Day> {
    let names = DayNames::default();
    let (first, last) = match range.trim().split_once('-') {
        Some((a, b)) => (names.day(a.trim()).unwrap(), names.day(b.trim()).unwrap()),
        None => {
            let d = names.day(range.trim()).unwrap();
            (d, d)
        }
    };
    let mut days = vec![first];
    let mut cur = first;
    while cur != last {
        cur = Day::from_index((cur.index() + 1) % 7).unwrap();
        days.push(cur);
    }
    days
}

/// Raw intervals for every line, one per day in its range.
pub fn events(table: &str) -> Vec<Interval> {
    let mut out = Vec::new();
    for line in table.lines().filter(|l| !l.trim().is_empty()) {
        let mut parts = line.splitn(3, '|');
        let days = parts.next().unwrap();
        let title = parts.next().unwrap().trim();
        let (start, end) = parts.next().unwrap().split_once('-').unwrap();
        let (sh, sm) = hhmm(start);
        let (eh, em) = hhmm(end);

        for day in expand_days(days) {
            let d = day.index() as u32;
            let start = at(d, sh, sm);
            let mut end = at(d, eh, em);
            if end <= start {
                end += Duration::days(1);
            }
            out.push(Interval::new(start, end, [title]).unwrap());
        }
    }
    out
}

/// [`events`] merged the way the pipeline merges (touching intervals join).
pub fn week(table: &str) -> Vec<Interval> {
    merge(&events(table), true)
}

/// Used rows as `(start, end, day columns)`, e.g. `("0800", "1200", "-Mon-Wed---")`.
pub fn used(rows: &[TemplateRow]) -> Vec<(String, String, String)> {
    let names = DayNames::default();
    rows.iter()
        .filter(|r| !r.is_unused())
        .map(|r| (r.start_hhmm(), r.end_hhmm(), names.render(r.days)))
        .collect()
}

pub fn row(start: &str, end: &str, days: &str) -> (String, String, String) {
    (start.to_string(), end.to_string(), days.to_string())
}

pub const STAGGERED: &str = "
Mon|Block1|08:00-12:00
Tue|Block2|10:00-14:00
Wed|Block3|08:00-14:00
";

pub const BUSY_WEEK: &str = "
Sun|Sunday Morning Service|07:15-12:00
Mon-Fri|Head Start|08:00-12:45
Mon-Fri|Head Start Pickup|11:30-12:45
Mon-Fri|Parent Pick-up|13:30-14:45
Tue|Coffee Break|08:00-11:30
Mon|Celebrate Recovery|16:45-20:05
Tue|Council|18:50-19:20
Tue|Congregational Mtg|19:00-21:00
";

/// Nine distinct windows that the optimizer folds into six rules.
pub const THREE_STAGGERED_BLOCKS: &str = "
Mon|Block1|08:00-12:00
Tue|Block2|10:00-14:00
Wed|Block3|08:00-14:00
Mon|Late1|15:00-17:00
Tue|Late2|16:00-18:00
Wed|Late3|15:00-18:00
Thu|Eve1|19:00-21:00
Fri|Eve2|20:00-22:00
Sat|Eve3|19:00-22:00
";

/// Nine disjoint Monday windows; no rule can serve two of them.
pub const NINE_DISJOINT: &str = "
Mon|E0|01:00-02:00
Mon|E1|03:00-04:00
Mon|E2|05:00-06:00
Mon|E3|07:00-08:00
Mon|E4|09:00-10:00
Mon|E5|11:00-12:00
Mon|E6|13:00-14:00
Mon|E7|15:00-16:00
Mon|E8|17:00-18:00
";
