//! Calendar date ranges and the market's weekend set.
//!
//! Every stage walks the same inclusive range of calendar days. The range is
//! validated once at the boundary so stages never see `start > end` or a
//! malformed date string.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use thiserror::Error;

/// ISO calendar date format used on the command line and in file names.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input validation errors for date ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid {field} '{input}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, input: String },

    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// `field` names the argument in the error message (e.g. `"start_date"`).
pub fn parse_iso_date(field: &'static str, input: &str) -> Result<NaiveDate, RangeError> {
    let trimmed = input.trim();
    // chrono accepts unpadded fields ("2024-1-2"); file names need the padded form.
    if trimmed.len() != 10 {
        return Err(RangeError::InvalidDate {
            field,
            input: input.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| RangeError::InvalidDate {
        field,
        input: input.to_string(),
    })
}

/// Inclusive range of calendar days, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse and validate a range from two ISO date strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        let start = parse_iso_date("start_date", start)?;
        let end = parse_iso_date("end_date", end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range (always at least 1).
    pub fn day_count(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Iterate every day in the range, ascending.
    pub fn days(&self) -> DayIter {
        DayIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

/// Iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DayIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = if current == self.end {
            None
        } else {
            current.checked_add_days(Days::new(1))
        };
        Some(current)
    }
}

/// The two weekdays on which the market does not trade.
///
/// Workbooks dated on either day are discarded without being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekendSet {
    days: [Weekday; 2],
}

impl WeekendSet {
    pub fn new(first: Weekday, second: Weekday) -> Self {
        Self {
            days: [first, second],
        }
    }

    pub fn days(&self) -> [Weekday; 2] {
        self.days
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&date.weekday())
    }
}

impl Default for WeekendSet {
    /// Thursday and Friday.
    fn default() -> Self {
        Self::new(Weekday::Thu, Weekday::Fri)
    }
}
