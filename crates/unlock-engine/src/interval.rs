//! Labelled time intervals and the algebra the compiler needs on them.
//!
//! An [`Interval`] is an immutable half-open `[start, end)` span in a named
//! timezone, tagged with the labels (event titles) that produced it. Every
//! operation returns new values:
//!
//! - [`merge`] -- coalesce overlapping (and optionally touching) intervals
//! - [`Interval::pad`] -- widen both edges by a number of minutes
//! - [`Interval::clamp`] -- cut an interval to a window
//! - [`Interval::split_by_day`] -- cut an interval at every local midnight

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};
use crate::week::local_midnight;

/// A half-open `[start, end)` time span with its originating labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    sources: Vec<String>,
}

impl Interval {
    /// Create an interval. `end` is converted into `start`'s timezone so that
    /// local dates on both edges agree. Duplicate labels are dropped, keeping
    /// first-seen order.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidInterval` unless `end > start`.
    pub fn new<I, S>(start: DateTime<Tz>, end: DateTime<Tz>, sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if end <= start {
            return Err(ScheduleError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        let end = end.with_timezone(&start.timezone());
        let mut labels = Vec::new();
        push_unique(&mut labels, sources.into_iter().map(Into::into));
        Ok(Self {
            start,
            end,
            sources: labels,
        })
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Move `start` earlier by `before_min` and `end` later by `after_min`.
    ///
    /// No clamping happens here; callers that know a window use [`clamp`](Self::clamp).
    pub fn pad(&self, before_min: u32, after_min: u32) -> Interval {
        Interval {
            start: self.start - Duration::minutes(before_min as i64),
            end: self.end + Duration::minutes(after_min as i64),
            sources: self.sources.clone(),
        }
    }

    /// Restrict to `[window_start, window_end)`. `None` when nothing remains.
    pub fn clamp(&self, window_start: DateTime<Tz>, window_end: DateTime<Tz>) -> Option<Interval> {
        let start = self.start.max(window_start.with_timezone(&self.start.timezone()));
        let end = self.end.min(window_end.with_timezone(&self.start.timezone()));
        (end > start).then(|| Interval {
            start,
            end,
            sources: self.sources.clone(),
        })
    }

    /// Cut at each local midnight into segments that each lie within one
    /// calendar day. Every segment carries the original labels.
    ///
    /// An interval ending exactly at local midnight produces no trailing
    /// zero-length segment.
    pub fn split_by_day(&self) -> Vec<Interval> {
        let tz = self.start.timezone();
        let end_date = self.end.date_naive();
        let mut segments = Vec::new();
        let mut cur = self.start;

        while cur.date_naive() < end_date {
            let Some(next_date) = cur.date_naive().succ_opt() else {
                break;
            };
            let midnight = local_midnight(&tz, next_date).min(self.end);
            if midnight > cur {
                segments.push(self.segment(cur, midnight));
            }
            cur = midnight;
        }

        if self.end > cur {
            segments.push(self.segment(cur, self.end));
        }
        segments
    }

    fn segment(&self, start: DateTime<Tz>, end: DateTime<Tz>) -> Interval {
        Interval {
            start,
            end,
            sources: self.sources.clone(),
        }
    }
}

/// Merge overlapping intervals.
///
/// Input is sorted by `(start, end)` and scanned once. The next interval is
/// absorbed when `next.start <= current.end` (`merge_touching`) or
/// `next.start < current.end` (strict overlap only). Absorbing extends the
/// end and unions the labels, keeping first-seen order.
///
/// The result is sorted by start with no two intervals overlapping; with
/// `merge_touching` no two touch either.
pub fn merge(intervals: &[Interval], merge_touching: bool) -> Vec<Interval> {
    let mut sorted: Vec<&Interval> = intervals.iter().collect();
    sorted.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for next in sorted {
        if let Some(cur) = merged.last_mut() {
            let absorbs = if merge_touching {
                next.start <= cur.end
            } else {
                next.start < cur.end
            };
            if absorbs {
                cur.end = cur.end.max(next.end.with_timezone(&cur.start.timezone()));
                push_unique(&mut cur.sources, next.sources.iter().cloned());
                continue;
            }
        }
        merged.push(next.clone());
    }
    merged
}

fn push_unique(labels: &mut Vec<String>, incoming: impl IntoIterator<Item = String>) {
    for label in incoming {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
}
