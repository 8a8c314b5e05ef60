//! Tolerant parsing and canonical rendering of calendar dates.

use chrono::NaiveDate;

/// Canonical display format (`dd/mm/yyyy`), also used for CSV export.
pub const CANONICAL_DATE_FORMAT: &str = "%d/%m/%Y";

/// Accepted input formats, tried in order.
const INPUT_FORMATS: [&str; 4] = ["%d/%m/%Y", "%-d/%-m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parses a date written in any of the accepted formats.
///
/// Leading and trailing whitespace is ignored. Returns `None` if no format
/// matches or the text names an impossible date such as 31/02/2025.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 3, 7);
/// assert_eq!(parse_date("07/03/2025"), expected);
/// assert_eq!(parse_date("7/3/2025"), expected);
/// assert_eq!(parse_date("07-03-2025"), expected);
/// assert_eq!(parse_date("2025-03-07"), expected);
/// assert_eq!(parse_date("March 7th"), None);
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Renders a date in the canonical `dd/mm/yyyy` form.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::format_date;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
/// assert_eq!(format_date(date), "06/05/2025");
/// ```
pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

/// Re-renders date text in canonical form, passing unparseable text through verbatim.
pub fn normalize_date_text(text: &str) -> String {
    parse_date(text).map_or_else(|| text.to_string(), format_date)
}
