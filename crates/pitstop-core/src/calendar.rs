//! # Calendar Module
//!
//! Day and month bucketing over date ranges.
//!
//! ## Bucketing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      chunk_to_days(start, end)                          │
//! │                                                                         │
//! │  start = 2024-06-10T09:30:00Z        end = 2024-06-12T14:00:00Z        │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────┐        │
//! │  │    2024-06-10    │ │    2024-06-11    │ │    2024-06-12    │        │
//! │  │ 00:00:00.000     │ │ 00:00:00.000     │ │ 00:00:00.000     │        │
//! │  │      ...         │ │      ...         │ │      ...         │        │
//! │  │ 23:59:59.999     │ │ 23:59:59.999     │ │ 23:59:59.999     │        │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────┘        │
//! │                                                                         │
//! │  Buckets are contiguous, non-overlapping, and cover every calendar     │
//! │  day from start's day through end's day inclusive.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundary Semantics
//!
//! All boundaries are computed in UTC. A bucket is a closed interval: its end
//! is the day's (or month's) last counted instant, `23:59:59.999`. An instant
//! exactly on that boundary belongs to the bucket; one millisecond later
//! belongs to the next one. Booking instants enter the system on a millisecond
//! grid, so the 999-millisecond end is the last value a stored instant can
//! take within its day.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::error::ScheduleError;

/// Upper-case month names indexed by 0-based month number.
const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

// =============================================================================
// Day Bucket
// =============================================================================

/// A single calendar day as a closed time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucket {
    /// First instant of the day: 00:00:00.000 UTC.
    pub start: DateTime<Utc>,
    /// Last counted instant of the day: 23:59:59.999 UTC.
    pub end: DateTime<Utc>,
    /// The calendar date this bucket covers.
    pub date: NaiveDate,
}

impl DayBucket {
    /// Builds the bucket covering the given calendar date.
    pub fn for_date(date: NaiveDate) -> Self {
        DayBucket {
            start: day_start(date),
            end: day_end(date),
            date,
        }
    }

    /// Builds the single bucket containing the given instant.
    pub fn containing(at: DateTime<Utc>) -> Self {
        DayBucket::for_date(at.date_naive())
    }

    /// Whether the instant falls within this day, boundaries inclusive.
    #[inline]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

// =============================================================================
// Month Bucket
// =============================================================================

/// A single calendar month as a closed time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    /// First instant of the month: day 1, 00:00:00.000 UTC.
    pub start: DateTime<Utc>,
    /// Last counted instant of the month: last day, 23:59:59.999 UTC.
    pub end: DateTime<Utc>,
    /// Calendar year.
    pub year: i32,
    /// 0-based month number (January = 0).
    pub month0: u32,
    /// Upper-case English month name.
    pub name: &'static str,
    /// Whether `year` is a Gregorian leap year.
    pub leap_year: bool,
}

impl MonthBucket {
    /// Builds the bucket for the given year and 0-based month.
    ///
    /// Returns `None` when `month0` is not in `0..=11` or the year is outside
    /// the representable calendar.
    pub fn for_month(year: i32, month0: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
        let last = NaiveDate::from_ymd_opt(year, month0 + 1, days_in_month(year, month0))?;
        Some(MonthBucket {
            start: day_start(first),
            end: day_end(last),
            year,
            month0,
            name: MONTH_NAMES[month0 as usize],
            leap_year: is_leap_year(year),
        })
    }

    /// Whether the instant falls within this month, boundaries inclusive.
    #[inline]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

// =============================================================================
// Range Chunking
// =============================================================================

/// Splits `[start, end]` into one bucket per calendar day, ascending.
///
/// Covers every day from `start`'s day through `end`'s day inclusive. The
/// instants' time-of-day only selects the first and last day; every emitted
/// bucket spans its full day.
///
/// Returns an empty sequence when `start > end`.
///
/// ## Example
/// ```rust
/// use pitstop_core::calendar::{self, chunk_to_days};
///
/// let start = calendar::parse_date("2024-06-10").unwrap();
/// let end = calendar::parse_date("2024-06-12").unwrap();
///
/// let days = chunk_to_days(start, end);
/// assert_eq!(days.len(), 3);
/// assert!(chunk_to_days(end, start).is_empty());
/// ```
pub fn chunk_to_days(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DayBucket> {
    let mut buckets = Vec::new();
    if start > end {
        return buckets;
    }

    let mut cursor = start.date_naive();
    let last = end.date_naive();
    while cursor <= last {
        buckets.push(DayBucket::for_date(cursor));
        match cursor.succ_opt() {
            Some(next) => cursor = next,
            None => break, // end of the representable calendar
        }
    }
    buckets
}

/// Splits `[start, end]` into one bucket per calendar month, ascending.
///
/// Covers every month from `start`'s month through `end`'s month inclusive,
/// regardless of the day-of-month of either boundary. Iteration advances by
/// (year, month) pairs, so a range starting on the 31st still yields every
/// intervening month.
///
/// Returns an empty sequence when `start > end`.
pub fn chunk_to_months(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<MonthBucket> {
    let mut buckets = Vec::new();
    if start > end {
        return buckets;
    }

    let (mut year, mut month0) = (start.year(), start.month0());
    let last = (end.year(), end.month0());
    while (year, month0) <= last {
        if let Some(bucket) = MonthBucket::for_month(year, month0) {
            buckets.push(bucket);
        }
        month0 += 1;
        if month0 == 12 {
            month0 = 0;
            year += 1;
        }
    }
    buckets
}

// =============================================================================
// Calendar Arithmetic
// =============================================================================

/// Gregorian leap-year rule: divisible by 4, except centuries not divisible
/// by 400.
///
/// ## Example
/// ```rust
/// use pitstop_core::calendar::is_leap_year;
///
/// assert!(is_leap_year(2024));
/// assert!(!is_leap_year(2023));
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2000));
/// ```
#[inline]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Number of days in the given 0-based month of the given year.
///
/// Returns 0 for an out-of-range month number.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    match month0 {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Last counted instant (23:59:59.999) of the instant's calendar day.
pub fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    day_end(at.date_naive())
}

/// Last counted instant (23:59:59.999 of the last day) of the instant's
/// calendar month.
pub fn end_of_month(at: DateTime<Utc>) -> DateTime<Utc> {
    let date = at.date_naive();
    let last_day = days_in_month(date.year(), date.month0());
    let days_ahead = i64::from(last_day) - i64::from(date.day());
    day_end(date) + Duration::days(days_ahead)
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date) + Duration::days(1) - Duration::milliseconds(1)
}

// =============================================================================
// Boundary Parsing
// =============================================================================

/// Parses a `yyyy-mm-dd` input into the UTC midnight instant of that day.
///
/// This is the engine's edge: every date string crossing into the core goes
/// through here (or [`parse_month`]) exactly once.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, ScheduleError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(day_start)
        .map_err(|_| ScheduleError::InvalidDate {
            value: value.to_string(),
        })
}

/// Parses a `yyyy-mm` input into the UTC midnight instant of the month's
/// first day.
pub fn parse_month(value: &str) -> Result<DateTime<Utc>, ScheduleError> {
    let invalid = || ScheduleError::InvalidDate {
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let (year_part, month_part) = trimmed.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year_part.parse().map_err(|_| invalid())?;
    let month: u32 = month_part.parse().map_err(|_| invalid())?;
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    Ok(day_start(first))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
            .and_utc()
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    // -------------------------------------------------------------------------
    // Day buckets
    // -------------------------------------------------------------------------

    #[test]
    fn test_day_bucket_boundaries() {
        let bucket = DayBucket::for_date(date(2024, 6, 10));
        assert_eq!(bucket.start, instant(2024, 6, 10, 0, 0, 0, 0));
        assert_eq!(bucket.end, instant(2024, 6, 10, 23, 59, 59, 999));
        assert_eq!(bucket.date.to_string(), "2024-06-10");
    }

    #[test]
    fn test_day_bucket_boundary_inclusivity() {
        let june_10 = DayBucket::for_date(date(2024, 6, 10));
        let june_11 = DayBucket::for_date(date(2024, 6, 11));

        let last_ms = instant(2024, 6, 10, 23, 59, 59, 999);
        let midnight = instant(2024, 6, 11, 0, 0, 0, 0);

        assert!(june_10.contains(last_ms));
        assert!(!june_10.contains(midnight));
        assert!(june_11.contains(midnight));
        assert!(!june_11.contains(last_ms));
    }

    #[test]
    fn test_day_bucket_containing_instant() {
        let bucket = DayBucket::containing(instant(2024, 6, 10, 14, 30, 0, 0));
        assert_eq!(bucket.date, date(2024, 6, 10));
    }

    #[test]
    fn test_chunk_to_days_inclusive_of_both_ends() {
        let days = chunk_to_days(
            instant(2024, 6, 10, 9, 30, 0, 0),
            instant(2024, 6, 12, 14, 0, 0, 0),
        );
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, date(2024, 6, 10));
        assert_eq!(days[2].date, date(2024, 6, 12));
    }

    #[test]
    fn test_chunk_to_days_single_day() {
        let days = chunk_to_days(
            instant(2024, 6, 10, 8, 0, 0, 0),
            instant(2024, 6, 10, 20, 0, 0, 0),
        );
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date(2024, 6, 10));
    }

    #[test]
    fn test_chunk_to_days_empty_when_start_after_end() {
        let days = chunk_to_days(
            instant(2024, 6, 12, 0, 0, 0, 0),
            instant(2024, 6, 10, 0, 0, 0, 0),
        );
        assert!(days.is_empty());

        // One millisecond apart, same day, reversed
        let days = chunk_to_days(
            instant(2024, 6, 10, 0, 0, 0, 1),
            instant(2024, 6, 10, 0, 0, 0, 0),
        );
        assert!(days.is_empty());
    }

    #[test]
    fn test_chunk_to_days_contiguous_no_gaps_or_overlaps() {
        let days = chunk_to_days(
            instant(2024, 2, 27, 0, 0, 0, 0),
            instant(2024, 3, 2, 0, 0, 0, 0),
        );
        // Leap February: 27, 28, 29, then March 1, 2
        assert_eq!(days.len(), 5);
        assert_eq!(days[2].date, date(2024, 2, 29));

        for pair in days.windows(2) {
            let gap = pair[1].start - pair[0].end;
            assert_eq!(gap, Duration::milliseconds(1));
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn test_chunk_to_days_across_year_boundary() {
        let days = chunk_to_days(
            instant(2023, 12, 30, 0, 0, 0, 0),
            instant(2024, 1, 2, 0, 0, 0, 0),
        );
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].date, date(2023, 12, 30));
        assert_eq!(days[3].date, date(2024, 1, 2));
    }

    // -------------------------------------------------------------------------
    // Month buckets
    // -------------------------------------------------------------------------

    #[test]
    fn test_month_bucket_boundaries() {
        let feb = MonthBucket::for_month(2024, 1).unwrap();
        assert_eq!(feb.start, instant(2024, 2, 1, 0, 0, 0, 0));
        assert_eq!(feb.end, instant(2024, 2, 29, 23, 59, 59, 999));
        assert_eq!(feb.name, "FEBRUARY");
        assert_eq!(feb.month0, 1);
        assert!(feb.leap_year);

        let feb = MonthBucket::for_month(2023, 1).unwrap();
        assert_eq!(feb.end, instant(2023, 2, 28, 23, 59, 59, 999));
        assert!(!feb.leap_year);
    }

    #[test]
    fn test_month_bucket_rejects_invalid_month() {
        assert!(MonthBucket::for_month(2024, 12).is_none());
    }

    #[test]
    fn test_chunk_to_months_leap_year_tagging() {
        let months = chunk_to_months(
            instant(2024, 1, 15, 0, 0, 0, 0),
            instant(2024, 3, 15, 0, 0, 0, 0),
        );
        assert_eq!(months.len(), 3);
        assert_eq!(
            months.iter().map(|m| m.name).collect::<Vec<_>>(),
            vec!["JANUARY", "FEBRUARY", "MARCH"]
        );
        assert!(months.iter().all(|m| m.leap_year));

        let months = chunk_to_months(
            instant(2023, 1, 15, 0, 0, 0, 0),
            instant(2023, 3, 15, 0, 0, 0, 0),
        );
        assert_eq!(months.len(), 3);
        assert!(months.iter().all(|m| !m.leap_year));
    }

    #[test]
    fn test_chunk_to_months_does_not_skip_short_months() {
        // A cursor that added one month to Jan 31 would land on Mar 2 and
        // silently skip February. Iterating (year, month) pairs must not.
        let months = chunk_to_months(
            instant(2023, 1, 31, 0, 0, 0, 0),
            instant(2023, 4, 1, 0, 0, 0, 0),
        );
        assert_eq!(
            months.iter().map(|m| m.name).collect::<Vec<_>>(),
            vec!["JANUARY", "FEBRUARY", "MARCH", "APRIL"]
        );
    }

    #[test]
    fn test_chunk_to_months_across_year_boundary() {
        let months = chunk_to_months(
            instant(2023, 11, 20, 0, 0, 0, 0),
            instant(2024, 2, 5, 0, 0, 0, 0),
        );
        assert_eq!(months.len(), 4);
        assert_eq!(months[0].year, 2023);
        assert_eq!(months[0].month0, 10);
        assert_eq!(months[3].year, 2024);
        assert_eq!(months[3].month0, 1);
        assert!(!months[0].leap_year);
        assert!(months[3].leap_year);
    }

    #[test]
    fn test_chunk_to_months_single_and_empty() {
        let months = chunk_to_months(
            instant(2024, 6, 5, 0, 0, 0, 0),
            instant(2024, 6, 25, 0, 0, 0, 0),
        );
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].name, "JUNE");

        assert!(chunk_to_months(
            instant(2024, 6, 25, 0, 0, 0, 0),
            instant(2024, 6, 5, 0, 0, 0, 0),
        )
        .is_empty());
    }

    // -------------------------------------------------------------------------
    // Calendar arithmetic
    // -------------------------------------------------------------------------

    #[test]
    fn test_is_leap_year_gregorian_rule() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(1900)); // century, not divisible by 400
        assert!(is_leap_year(2000)); // divisible by 400
        assert!(!is_leap_year(2100));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 0), 31);
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(2024, 3), 30);
        assert_eq!(days_in_month(2024, 11), 31);
        assert_eq!(days_in_month(2024, 12), 0);
    }

    #[test]
    fn test_end_of_day_and_month() {
        let at = instant(2024, 2, 10, 14, 30, 0, 0);
        assert_eq!(end_of_day(at), instant(2024, 2, 10, 23, 59, 59, 999));
        assert_eq!(end_of_month(at), instant(2024, 2, 29, 23, 59, 59, 999));

        // Already on the last day
        let at = instant(2023, 12, 31, 3, 0, 0, 0);
        assert_eq!(end_of_month(at), instant(2023, 12, 31, 23, 59, 59, 999));
    }

    // -------------------------------------------------------------------------
    // Parsing
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-10").unwrap(),
            instant(2024, 6, 10, 0, 0, 0, 0)
        );
        assert_eq!(
            parse_date("  2024-06-10  ").unwrap(),
            instant(2024, 6, 10, 0, 0, 0, 0)
        );

        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("10-06-2024").is_err());
        assert!(parse_date("not-a-date").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(
            parse_month("2024-02").unwrap(),
            instant(2024, 2, 1, 0, 0, 0, 0)
        );
        assert_eq!(
            parse_month("2024-2").unwrap(),
            instant(2024, 2, 1, 0, 0, 0, 0)
        );

        assert!(parse_month("2024").is_err());
        assert!(parse_month("2024-00").is_err());
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("2024-06-01").is_err());
        assert!(parse_month("").is_err());
    }

    #[test]
    fn test_parse_errors_carry_the_input() {
        let err = parse_date("junk").unwrap_err();
        assert_eq!(err.to_string(), "Invalid date input: junk");
    }
}
