//! CSV export of request records.

use std::io::Write;

use crate::calculation::{format_date, normalize_date_text};
use crate::error::{EngineError, EngineResult};
use crate::models::RequestRecord;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 17] = [
    "Request No.",
    "Applicant",
    "Label",
    "Intake Date",
    "Due Date",
    "Response Type",
    "Department",
    "Collaboration Dispatch",
    "Collaboration Due",
    "Objection",
    "Remediation",
    "Extension",
    "Dispatch Date",
    "Status",
    "Closure",
    "Business Days",
    "Compliance",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options controlling CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvReportOptions {
    /// Prefix the output with a UTF-8 byte order mark.
    pub include_bom: bool,
}

impl Default for CsvReportOptions {
    fn default() -> Self {
        Self { include_bom: true }
    }
}

/// Writes `records` as CSV to `writer`.
///
/// Dates are rendered `dd/mm/yyyy`; date text that cannot be parsed is written
/// as entered. Fields are quoted only when they contain a comma, a quote or a
/// line break. An empty record set is rejected, since a header-only report is
/// never what the caller wants.
pub fn write_csv_report<'a, W, I>(
    records: I,
    mut writer: W,
    options: CsvReportOptions,
) -> EngineResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a RequestRecord>,
{
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return Err(EngineError::Report {
            message: "no requests to export".to_string(),
        });
    }

    if options.include_bom {
        writer.write_all(UTF8_BOM).map_err(|e| EngineError::Report {
            message: e.to_string(),
        })?;
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADERS)?;
    for record in records {
        csv_writer.write_record(csv_row(record))?;
    }
    csv_writer.flush().map_err(|e| EngineError::Report {
        message: e.to_string(),
    })?;
    Ok(())
}

/// Renders `records` as a CSV string.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::models::{IntakeDetails, RequestRecord};
/// use foi_deadline_engine::report::{CsvReportOptions, csv_report};
///
/// let record = RequestRecord::from_intake(IntakeDetails {
///     request_number: "AH010T0000001".to_string(),
///     applicant_name: "Rojas, Ana".to_string(),
///     intake_date: "2025-01-06".to_string(),
///     initial_due_date: "03/02/2025".to_string(),
/// });
///
/// let csv = csv_report([&record], CsvReportOptions { include_bom: false })?;
/// let row = csv.lines().nth(1).unwrap();
/// assert!(row.starts_with("AH010T0000001,\"Rojas, Ana\",,06/01/2025,03/02/2025,"));
/// # Ok::<(), foi_deadline_engine::error::EngineError>(())
/// ```
pub fn csv_report<'a, I>(records: I, options: CsvReportOptions) -> EngineResult<String>
where
    I: IntoIterator<Item = &'a RequestRecord>,
{
    let mut buffer = Vec::new();
    write_csv_report(records, &mut buffer, options)?;
    String::from_utf8(buffer).map_err(|e| EngineError::Report {
        message: e.to_string(),
    })
}

fn csv_row(record: &RequestRecord) -> Vec<String> {
    vec![
        record.request_number.clone(),
        record.applicant_name.clone(),
        record.label.clone(),
        normalize_date_text(&record.intake_date),
        normalize_date_text(record.effective_due_date()),
        record.response_type.to_string(),
        optional(record.department),
        optional_date_text(record.collaboration_dispatch_date.as_deref()),
        record.collaboration_due_date.map(format_date).unwrap_or_default(),
        yes_no(record.objection),
        yes_no(record.remediation),
        yes_no(record.extension),
        optional_date_text(record.dispatch_date.as_deref()),
        optional(record.status),
        optional_date_text(record.closure_date.as_deref()),
        optional(record.elapsed_business_days),
        optional(record.compliance_verdict),
    ]
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn optional_date_text(value: Option<&str>) -> String {
    value.map(normalize_date_text).unwrap_or_default()
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}
