//! Business-day arithmetic against the national holiday calendar.
//!
//! A business day is any day that is neither a Saturday, a Sunday, nor one of
//! the fixed national holidays. Walks that cross a year boundary consult the
//! holidays according to a [`YearBoundaryPolicy`].

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::date_parser::parse_date;
use super::holidays::holiday_dates;

/// Which year's holidays a walk or interval consults.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::{BusinessCalendar, YearBoundaryPolicy};
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
///
/// // New Year's Day 2026 is skipped when each year's holidays are consulted...
/// let per_year = BusinessCalendar::new(YearBoundaryPolicy::PerCalendarYear);
/// assert_eq!(per_year.add_business_days(start, 2), NaiveDate::from_ymd_opt(2026, 1, 2));
///
/// // ...but counted when only the start year's holidays are known.
/// let legacy = BusinessCalendar::new(YearBoundaryPolicy::StartYearOnly);
/// assert_eq!(legacy.add_business_days(start, 2), NaiveDate::from_ymd_opt(2026, 1, 1));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearBoundaryPolicy {
    /// Every day is checked against the holidays of its own year.
    #[default]
    PerCalendarYear,
    /// Only the start date's year is consulted; holidays of later years are missed.
    StartYearOnly,
}

impl std::fmt::Display for YearBoundaryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearBoundaryPolicy::PerCalendarYear => write!(f, "per_calendar_year"),
            YearBoundaryPolicy::StartYearOnly => write!(f, "start_year_only"),
        }
    }
}

/// Business-day calculator parameterised by a [`YearBoundaryPolicy`].
///
/// The calendar holds no state beyond its policy; holiday sets are computed
/// fresh for each walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusinessCalendar {
    policy: YearBoundaryPolicy,
}

impl BusinessCalendar {
    /// Creates a calendar using the given year-boundary policy.
    pub const fn new(policy: YearBoundaryPolicy) -> Self {
        Self { policy }
    }

    /// Returns the year-boundary policy in effect.
    pub fn policy(&self) -> YearBoundaryPolicy {
        self.policy
    }

    /// Returns true if `date` is a business day with respect to its own year.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        HolidayLookup::new(YearBoundaryPolicy::PerCalendarYear, date.year()).is_business_day(date)
    }

    /// Adds `n` business days to `start`.
    ///
    /// The walk begins on the day after `start`, so `start` itself never counts.
    /// `n == 0` returns `start` unchanged, even when `start` is not a business
    /// day. Returns `None` only if the walk runs off the end of chrono's date
    /// range.
    ///
    /// # Example
    ///
    /// ```
    /// use foi_deadline_engine::calculation::BusinessCalendar;
    /// use chrono::NaiveDate;
    ///
    /// let calendar = BusinessCalendar::default();
    ///
    /// // Monday 2025-04-28 plus 5 business days skips Labour Day (Thursday May 1)
    /// let start = NaiveDate::from_ymd_opt(2025, 4, 28).unwrap();
    /// assert_eq!(calendar.add_business_days(start, 5), NaiveDate::from_ymd_opt(2025, 5, 6));
    /// ```
    pub fn add_business_days(&self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        if n == 0 {
            return Some(start);
        }

        let mut lookup = HolidayLookup::new(self.policy, start.year());
        start
            .iter_days()
            .skip(1)
            .filter(|day| lookup.is_business_day(*day))
            .nth(n as usize - 1)
    }

    /// Counts the business days in the closed interval `[start, end]`.
    ///
    /// An interval whose end precedes its start is empty and counts 0. Weekdays
    /// are counted arithmetically and holidays subtracted per year, so the cost
    /// grows with the number of years spanned rather than days.
    ///
    /// # Example
    ///
    /// ```
    /// use foi_deadline_engine::calculation::BusinessCalendar;
    /// use chrono::NaiveDate;
    ///
    /// let calendar = BusinessCalendar::default();
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
    ///
    /// // 23 weekdays in January 2025, less New Year's Day
    /// assert_eq!(calendar.count_business_days(start, end), 22);
    /// ```
    pub fn count_business_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if end < start {
            return 0;
        }

        let span = (end - start).num_days() + 1;
        let first = i64::from(start.weekday().num_days_from_monday());
        let partial_week = (0..span % 7).filter(|k| (first + k) % 7 < 5).count();
        let weekdays = span / 7 * 5 + partial_week as i64;

        let last_year = match self.policy {
            YearBoundaryPolicy::PerCalendarYear => end.year(),
            YearBoundaryPolicy::StartYearOnly => start.year(),
        };
        let holidays = (start.year()..=last_year)
            .flat_map(holiday_dates)
            .filter(|date| (start..=end).contains(date) && !is_weekend(*date))
            .count();

        u32::try_from(weekdays - holidays as i64).unwrap_or(u32::MAX)
    }

    /// Counts business days from a textual start date up to `end`, inclusive.
    ///
    /// Returns `None` when `end` is absent or `start` cannot be parsed; this is
    /// the "not yet computable" state rather than an error.
    pub fn elapsed_business_days(&self, start: &str, end: Option<NaiveDate>) -> Option<u32> {
        let end = end?;
        let start = parse_date(start)?;
        Some(self.count_business_days(start, end))
    }
}

/// Holiday membership for a single walk.
///
/// Under [`YearBoundaryPolicy::PerCalendarYear`] the set is rebuilt whenever the
/// walk enters a new year; under [`YearBoundaryPolicy::StartYearOnly`] it stays
/// pinned to the anchor year.
struct HolidayLookup {
    policy: YearBoundaryPolicy,
    year: i32,
    dates: BTreeSet<NaiveDate>,
}

impl HolidayLookup {
    fn new(policy: YearBoundaryPolicy, anchor_year: i32) -> Self {
        Self {
            policy,
            year: anchor_year,
            dates: holiday_dates(anchor_year),
        }
    }

    fn is_business_day(&mut self, date: NaiveDate) -> bool {
        if is_weekend(date) {
            return false;
        }

        if self.policy == YearBoundaryPolicy::PerCalendarYear && date.year() != self.year {
            self.year = date.year();
            self.dates = holiday_dates(self.year);
        }

        !self.dates.contains(&date)
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Adds `n` business days to `start` using the default calendar.
pub fn add_business_days(start: NaiveDate, n: u32) -> Option<NaiveDate> {
    BusinessCalendar::default().add_business_days(start, n)
}

/// Counts business days in `[start, end]` using the default calendar.
pub fn count_business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    BusinessCalendar::default().count_business_days(start, end)
}

/// Counts business days from a textual start date using the default calendar.
pub fn elapsed_business_days(start: &str, end: Option<NaiveDate>) -> Option<u32> {
    BusinessCalendar::default().elapsed_business_days(start, end)
}

/// Returns true if `date` is a business day.
pub fn is_business_day(date: NaiveDate) -> bool {
    BusinessCalendar::default().is_business_day(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn legacy() -> BusinessCalendar {
        BusinessCalendar::new(YearBoundaryPolicy::StartYearOnly)
    }

    // ==========================================================================
    // Adding business days
    // ==========================================================================

    #[test]
    fn test_add_zero_returns_start() {
        // Saturday stays Saturday when nothing is added
        let saturday = make_date(2025, 1, 4);
        assert_eq!(add_business_days(saturday, 0), Some(saturday));
    }

    #[test]
    fn test_add_one_from_friday_lands_on_monday() {
        assert_eq!(
            add_business_days(make_date(2025, 1, 10), 1),
            Some(make_date(2025, 1, 13))
        );
    }

    #[test]
    fn test_add_five_without_holidays() {
        // Monday 2025-01-06 + 5 = Monday 2025-01-13
        assert_eq!(
            add_business_days(make_date(2025, 1, 6), 5),
            Some(make_date(2025, 1, 13))
        );
    }

    #[test]
    fn test_add_five_skips_labour_day() {
        assert_eq!(
            add_business_days(make_date(2025, 4, 28), 5),
            Some(make_date(2025, 5, 6))
        );
    }

    #[test]
    fn test_add_skips_independence_and_army_day() {
        // Wednesday 2025-09-17: 18th and 19th are Thursday and Friday holidays
        assert_eq!(
            add_business_days(make_date(2025, 9, 17), 1),
            Some(make_date(2025, 9, 22))
        );
    }

    #[test]
    fn test_add_starting_on_holiday_does_not_count_start() {
        // Christmas 2025 is a Thursday
        assert_eq!(
            add_business_days(make_date(2025, 12, 25), 1),
            Some(make_date(2025, 12, 26))
        );
    }

    #[test]
    fn test_add_across_year_boundary_per_calendar_year() {
        assert_eq!(
            add_business_days(make_date(2025, 12, 30), 2),
            Some(make_date(2026, 1, 2))
        );
    }

    #[test]
    fn test_add_across_year_boundary_start_year_only() {
        assert_eq!(
            legacy().add_business_days(make_date(2025, 12, 30), 2),
            Some(make_date(2026, 1, 1))
        );
    }

    #[test]
    fn test_add_at_end_of_date_range_is_none() {
        assert_eq!(add_business_days(NaiveDate::MAX, 1), None);
    }

    // ==========================================================================
    // Counting business days
    // ==========================================================================

    #[test]
    fn test_count_single_business_day() {
        assert_eq!(
            count_business_days(make_date(2025, 1, 6), make_date(2025, 1, 6)),
            1
        );
    }

    #[test]
    fn test_count_single_weekend_day() {
        assert_eq!(
            count_business_days(make_date(2025, 1, 5), make_date(2025, 1, 5)),
            0
        );
    }

    #[test]
    fn test_count_single_holiday() {
        assert_eq!(
            count_business_days(make_date(2025, 1, 1), make_date(2025, 1, 1)),
            0
        );
    }

    #[test]
    fn test_count_reversed_interval_is_zero() {
        assert_eq!(
            count_business_days(make_date(2025, 1, 31), make_date(2025, 1, 1)),
            0
        );
    }

    #[test]
    fn test_count_january_2025() {
        assert_eq!(
            count_business_days(make_date(2025, 1, 1), make_date(2025, 1, 31)),
            22
        );
    }

    #[test]
    fn test_count_across_year_boundary() {
        let start = make_date(2025, 12, 29);
        let end = make_date(2026, 1, 2);
        assert_eq!(count_business_days(start, end), 4);
        assert_eq!(legacy().count_business_days(start, end), 5);
    }

    #[test]
    fn test_count_matches_day_by_day_over_several_years() {
        let start = make_date(2023, 11, 15);
        let end = make_date(2027, 2, 3);
        for calendar in [BusinessCalendar::default(), legacy()] {
            let mut lookup = HolidayLookup::new(calendar.policy(), start.year());
            let expected = start
                .iter_days()
                .take_while(|day| *day <= end)
                .filter(|day| lookup.is_business_day(*day))
                .count() as u32;
            assert_eq!(calendar.count_business_days(start, end), expected);
        }
    }

    #[test]
    fn test_count_over_whole_four_digit_year_range() {
        let start = make_date(1, 1, 1);
        let end = make_date(9999, 12, 31);
        assert_eq!(count_business_days(start, end), 2_515_725);
    }

    // ==========================================================================
    // Elapsed business days from text
    // ==========================================================================

    #[test]
    fn test_elapsed_from_text_start() {
        assert_eq!(
            elapsed_business_days("01/01/2025", Some(make_date(2025, 1, 31))),
            Some(22)
        );
    }

    #[test]
    fn test_elapsed_without_end_is_none() {
        assert_eq!(elapsed_business_days("01/01/2025", None), None);
    }

    #[test]
    fn test_elapsed_with_unparseable_start_is_none() {
        assert_eq!(
            elapsed_business_days("not a date", Some(make_date(2025, 1, 31))),
            None
        );
    }

    #[test]
    fn test_is_business_day() {
        assert!(is_business_day(make_date(2025, 5, 2)));
        assert!(!is_business_day(make_date(2025, 5, 1)));
        assert!(!is_business_day(make_date(2025, 5, 3)));
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(YearBoundaryPolicy::StartYearOnly.to_string(), "start_year_only");
        assert_eq!(
            BusinessCalendar::default().policy(),
            YearBoundaryPolicy::PerCalendarYear
        );
    }
}
