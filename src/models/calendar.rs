//! Working-hours calendar and time window models.
//!
//! Every bookable resource and every company works inside a fixed daily
//! window `[day_starts, day_ends)` on weekdays. Saturdays and Sundays are
//! never working days.
//!
//! # Time Model
//! All date-times are naive local date-times (`chrono::NaiveDateTime`).
//! The consumer decides which time zone they live in.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Length of this window.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether a date-time falls within this window.
    #[inline]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }

    /// Envelope (earliest start, latest end) of a set of windows.
    ///
    /// Returns `None` for an empty set.
    pub fn envelope(windows: &[TimeWindow]) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let start = windows.iter().map(|w| w.start).min()?;
        let end = windows.iter().map(|w| w.end).max()?;
        Some((start, end))
    }
}

/// Daily working window shared by every weekday.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkingHours {
    /// Start of the working day.
    pub day_starts: NaiveTime,
    /// End of the working day (exclusive).
    pub day_ends: NaiveTime,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            day_starts: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            day_ends: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl WorkingHours {
    /// Creates working hours, rejecting an empty or inverted window.
    pub fn new(day_starts: NaiveTime, day_ends: NaiveTime) -> Option<Self> {
        (day_starts < day_ends).then_some(Self {
            day_starts,
            day_ends,
        })
    }

    /// Length of one working day.
    pub fn daily_duration(&self) -> Duration {
        self.day_ends - self.day_starts
    }

    /// Whether the window is non-empty.
    pub fn is_valid(&self) -> bool {
        self.day_starts < self.day_ends
    }

    /// Whether `date` is a working day (Monday to Friday).
    pub fn is_working_day(date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Working window on the given date, or `None` on weekends.
    pub fn window_on(&self, date: NaiveDate) -> Option<TimeWindow> {
        Self::is_working_day(date).then(|| {
            TimeWindow::new(date.and_time(self.day_starts), date.and_time(self.day_ends))
        })
    }

    /// Start of the first working day strictly after `date`.
    ///
    /// `None` once the calendar runs past the last representable date.
    pub fn next_day_start(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        let mut next = date.checked_add_days(Days::new(1))?;
        while !Self::is_working_day(next) {
            next = next.checked_add_days(Days::new(1))?;
        }
        Some(next.and_time(self.day_starts))
    }

    /// Applies the end-of-day rollover rule.
    ///
    /// A date-time at or after `day_ends` moves to `day_starts` of the next
    /// weekday. Anything earlier is returned unchanged.
    pub fn roll_over(&self, at: NaiveDateTime) -> Option<NaiveDateTime> {
        if at.time() >= self.day_ends {
            self.next_day_start(at.date())
        } else {
            Some(at)
        }
    }

    /// Earliest working instant at or after `from`.
    pub fn next_working_time(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.window_on(from.date()) {
            Some(w) if from < w.start => Some(w.start),
            Some(w) if w.contains(from) => Some(from),
            _ => self.next_day_start(from.date()),
        }
    }
}
