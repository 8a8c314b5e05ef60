//! National holiday calendar.
//!
//! Only holidays anchored to a fixed month/day pair are listed. Movable
//! observances (Good Friday, Holy Saturday, election days and the like) are not
//! part of the calendar, so a walk across one of them treats it as a business
//! day.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Fixed-date national holidays as `(month, day, name)`.
pub const FIXED_HOLIDAYS: [(u32, u32, &str); 13] = [
    (1, 1, "New Year's Day"),
    (5, 1, "Labour Day"),
    (5, 21, "Navy Day"),
    (6, 29, "Saints Peter and Paul"),
    (7, 16, "Our Lady of Mount Carmel"),
    (8, 15, "Assumption of Mary"),
    (9, 18, "Independence Day"),
    (9, 19, "Army Day"),
    (10, 12, "Discovery of Two Worlds"),
    (10, 31, "Evangelical and Protestant Churches Day"),
    (11, 1, "All Saints' Day"),
    (12, 8, "Immaculate Conception"),
    (12, 25, "Christmas Day"),
];

/// A named national holiday on a concrete date.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::holidays_for_year;
/// use chrono::NaiveDate;
///
/// let holidays = holidays_for_year(2025);
/// assert_eq!(holidays[0].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
/// assert_eq!(holidays[0].name, "New Year's Day");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Holiday {
    /// The calendar date of the holiday.
    pub date: NaiveDate,
    /// The holiday's display name.
    pub name: &'static str,
}

/// Returns the fixed national holidays for `year`, in calendar order.
///
/// Any year chrono can represent yields the full list.
pub fn holidays_for_year(year: i32) -> Vec<Holiday> {
    FIXED_HOLIDAYS
        .iter()
        .filter_map(|&(month, day, name)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|date| Holiday { date, name })
        })
        .collect()
}

/// Returns the set of holiday dates for `year`.
pub fn holiday_dates(year: i32) -> BTreeSet<NaiveDate> {
    holidays_for_year(year).into_iter().map(|h| h.date).collect()
}

/// Returns true if `date` falls on one of the fixed national holidays of its own year.
pub fn is_fixed_holiday(date: NaiveDate) -> bool {
    FIXED_HOLIDAYS
        .iter()
        .any(|&(month, day, _)| date.month() == month && date.day() == day)
}
