//! Reporting over request records: CSV export and summary statistics.

mod csv;
mod summary;

pub use self::csv::{CSV_HEADERS, CsvReportOptions, csv_report, write_csv_report};
pub use summary::{DepartmentCount, ReportSummary, summarize};
