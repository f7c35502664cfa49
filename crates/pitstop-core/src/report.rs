//! # Report Module
//!
//! Occupancy and availability reporting over day and month buckets.
//!
//! ## Report Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 daily_availability_report(garage, s, e, booked)         │
//! │                                                                         │
//! │  booked (fetched ONCE for the whole range by the caller)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  chunk_to_days(s, e) ──► per bucket: count scheduled_date in bucket    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  [{date, requests, availableCapacity = capacity - requests}, ...]      │
//! │                                                                         │
//! │  availableCapacity is NOT clamped at zero. A day that was over-booked  │
//! │  out-of-band stays visible as a negative number.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both report functions are pure: the caller supplies the booking set, the
//! functions bucket and count. Calling them twice with the same inputs yields
//! the same output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::calendar::{chunk_to_days, chunk_to_months, DayBucket, MonthBucket};
use crate::types::{Garage, MaintenanceRequest};

// =============================================================================
// Report Rows
// =============================================================================

/// One day of a garage's availability report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOccupancy {
    /// The calendar day, serialized `yyyy-mm-dd`.
    pub date: NaiveDate,
    /// Bookings scheduled within the day.
    pub requests: i64,
    /// `capacity - requests`, unclamped; negative means over-booked.
    pub available_capacity: i64,
}

/// One month of a garage's booking-count report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOccupancy {
    /// Calendar year.
    pub year: i32,
    /// Upper-case English month name.
    pub month: String,
    /// 0-based month number (January = 0).
    pub month_value: u32,
    /// Whether the year is a Gregorian leap year.
    pub leap_year: bool,
    /// Bookings scheduled within the month.
    pub requests: i64,
}

// =============================================================================
// Counting
// =============================================================================

/// Counts the requests scheduled within the day bucket, boundaries inclusive.
///
/// `exclude` skips one record id from the count. The update admission path
/// passes the record being updated so it does not occupy its own slot.
pub fn count_in_day(bucket: &DayBucket, booked: &[MaintenanceRequest], exclude: Option<&str>) -> i64 {
    booked
        .iter()
        .filter(|request| bucket.contains(request.scheduled_date))
        .filter(|request| exclude.map_or(true, |id| request.id != id))
        .count() as i64
}

fn count_in_month(bucket: &MonthBucket, booked: &[MaintenanceRequest]) -> i64 {
    booked
        .iter()
        .filter(|request| bucket.contains(request.scheduled_date))
        .count() as i64
}

// =============================================================================
// Reports
// =============================================================================

/// Per-day occupancy and remaining capacity for one garage over `[start, end]`.
///
/// Emits one row per calendar day in chronological order, days with zero
/// bookings included. `booked` is the garage's bookings for the range, fetched
/// once by the caller; requests outside the range are ignored by the bucket
/// boundaries and requests for other garages must not be passed in.
pub fn daily_availability_report(
    garage: &Garage,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    booked: &[MaintenanceRequest],
) -> Vec<DayOccupancy> {
    chunk_to_days(start, end)
        .iter()
        .map(|bucket| {
            let requests = count_in_day(bucket, booked, None);
            DayOccupancy {
                date: bucket.date,
                requests,
                available_capacity: garage.capacity - requests,
            }
        })
        .collect()
}

/// Per-month booking counts over `[start, end]`.
///
/// The report is dense: every month in the range appears, zero-count months
/// included. `booked` is fetched once by the caller for the full range rather
/// than once per month.
pub fn monthly_requests_report(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    booked: &[MaintenanceRequest],
) -> Vec<MonthOccupancy> {
    chunk_to_months(start, end)
        .iter()
        .map(|bucket| MonthOccupancy {
            year: bucket.year,
            month: bucket.name.to_string(),
            month_value: bucket.month0,
            leap_year: bucket.leap_year,
            requests: count_in_month(bucket, booked),
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
