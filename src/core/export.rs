// LogDoctor - core/export.rs
//
// JSON, CSV and plain-text rendering of analysis results.
// Core layer: writes to any Write trait object.

use crate::core::model::AnalysisResult;
use crate::util::constants;
use crate::util::error::{AnalysisError, ExportError};
use serde::Serialize;
use std::io::Write;

/// Serialised shape of a failed analysis.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureDescriptor<'a> {
    success: bool,
    kind: &'static str,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provided_files: Option<&'a [String]>,
}

/// Export the full analysis result as pretty-printed JSON.
pub fn export_json<W: Write>(
    result: &AnalysisResult,
    writer: W,
    target: &str,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, result).map_err(|e| ExportError::Json {
        target: target.to_string(),
        source: e,
    })
}

/// Export a failure descriptor (`success: false`) as pretty-printed JSON.
pub fn export_failure_json<W: Write>(
    error: &AnalysisError,
    writer: W,
    target: &str,
) -> Result<(), ExportError> {
    let provided_files = match error {
        AnalysisError::NoQualifyingFiles { provided } => Some(provided.as_slice()),
        _ => None,
    };
    let descriptor = FailureDescriptor {
        success: false,
        kind: error.kind(),
        error: error.to_string(),
        file_name: error.file_name(),
        provided_files,
    };
    serde_json::to_writer_pretty(writer, &descriptor).map_err(|e| ExportError::Json {
        target: target.to_string(),
        source: e,
    })
}

/// Export the per-code summary as CSV.
///
/// Writes: error_code, count, display_title, severity, board
pub fn export_summary_csv<W: Write>(
    result: &AnalysisResult,
    writer: W,
    target: &str,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        target: target.to_string(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["error_code", "count", "display_title", "severity", "board"])
        .map_err(csv_err)?;

    for row in &result.summary {
        csv_writer
            .write_record([
                row.error_code.to_string().as_str(),
                row.count.to_string().as_str(),
                row.display_title.as_str(),
                row.severity.as_str(),
                row.board.as_str(),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        target: target.to_string(),
        source: e,
    })?;

    Ok(result.summary.len())
}

/// Export the detected events as CSV, most recent first.
///
/// Writes: timestamp, error_code, display_title, severity, board, raw_line
pub fn export_events_csv<W: Write>(
    result: &AnalysisResult,
    writer: W,
    target: &str,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        target: target.to_string(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "timestamp",
            "error_code",
            "display_title",
            "severity",
            "board",
            "raw_line",
        ])
        .map_err(csv_err)?;

    for event in &result.errors {
        let (title, severity, board) = match &event.knowledge {
            Some(k) => (k.display_title.as_str(), k.severity.label(), k.board.as_str()),
            None => (
                constants::UNKNOWN_TITLE,
                constants::UNKNOWN_SEVERITY,
                constants::UNKNOWN_BOARD,
            ),
        };
        csv_writer
            .write_record([
                event.timestamp.as_str(),
                event.detected_code.to_string().as_str(),
                title,
                severity,
                board,
                event.raw_line.as_str(),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        target: target.to_string(),
        source: e,
    })?;

    Ok(result.errors.len())
}

/// Human-readable report: header, statistics, summary table, and the most
/// recent events.
pub fn write_text_report<W: Write>(
    result: &AnalysisResult,
    mut w: W,
    target: &str,
) -> Result<(), ExportError> {
    write_text_inner(result, &mut w).map_err(|e| ExportError::Io {
        target: target.to_string(),
        source: e,
    })
}

fn write_text_inner<W: Write>(result: &AnalysisResult, w: &mut W) -> std::io::Result<()> {
    let stats = &result.statistics;
    writeln!(w, "Log file:  {}", result.file_name)?;
    writeln!(
        w,
        "Period:    {} .. {} ({} days)",
        result.analyzed_period.from, result.analyzed_period.to, result.analysis_days
    )?;
    writeln!(
        w,
        "Lines:     {} read, {} within window",
        stats.total_lines, stats.processed_lines
    )?;
    writeln!(
        w,
        "Errors:    {} detected, {} distinct codes",
        stats.total_errors, stats.unique_errors
    )?;

    if result.summary.is_empty() {
        writeln!(w)?;
        writeln!(w, "No errors detected in the analysis window.")?;
        return Ok(());
    }

    writeln!(w)?;
    writeln!(w, "{:>8}  {:>6}  {:<10}  {:<10}  TITLE", "CODE", "COUNT", "SEVERITY", "BOARD")?;
    for row in &result.summary {
        writeln!(
            w,
            "{:>8}  {:>6}  {:<10}  {:<10}  {}",
            row.error_code, row.count, row.severity, row.board, row.display_title
        )?;
    }

    writeln!(w)?;
    let shown = result.errors.len().min(constants::TEXT_REPORT_EVENT_LIMIT);
    writeln!(w, "Most recent events ({shown} of {}):", result.errors.len())?;
    for event in result.errors.iter().take(shown) {
        let title = event
            .knowledge
            .as_ref()
            .map(|k| k.display_title.as_str())
            .unwrap_or(constants::UNKNOWN_TITLE);
        writeln!(w, "  {}  [{}] {}", event.timestamp, event.detected_code, title)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AnalyzedPeriod, DetectedEvent, SeverityCount, Statistics};

    fn make_result() -> AnalysisResult {
        AnalysisResult {
            success: true,
            file_name: "mill.2.txt".to_string(),
            analysis_days: 7,
            analyzed_period: AnalyzedPeriod {
                from: "2024-01-01".to_string(),
                to: "2024-01-08".to_string(),
            },
            statistics: Statistics {
                total_lines: 10,
                processed_lines: 4,
                total_errors: 2,
                unique_errors: 1,
            },
            summary: vec![SeverityCount {
                error_code: 555,
                count: 2,
                display_title: "Unknown Error".to_string(),
                severity: "UNKNOWN".to_string(),
                board: "UNKNOWN".to_string(),
            }],
            errors: vec![
                DetectedEvent {
                    detected_code: 555,
                    timestamp: "2024-01-03 10:00:00".to_string(),
                    knowledge: None,
                    raw_line: "2024-01-03T10:00:00 MY Error Code: 555, axis \"X\"".to_string(),
                },
                DetectedEvent {
                    detected_code: 555,
                    timestamp: "2024-01-02 10:00:00".to_string(),
                    knowledge: None,
                    raw_line: "2024-01-02T10:00:00 MY Error Code: 555".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_summary_csv_export() {
        let mut buf = Vec::new();
        let count = export_summary_csv(&make_result(), &mut buf, "summary.csv").unwrap();
        assert_eq!(count, 1);
        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("error_code,count,display_title,severity,board"));
        assert!(output.contains("555,2,Unknown Error,UNKNOWN,UNKNOWN"));
    }

    #[test]
    fn test_events_csv_quotes_raw_lines() {
        let mut buf = Vec::new();
        let count = export_events_csv(&make_result(), &mut buf, "events.csv").unwrap();
        assert_eq!(count, 2);
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("\"2024-01-03T10:00:00 MY Error Code: 555, axis \"\"X\"\"\""));
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        export_json(&make_result(), &mut buf, "stdout").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["statistics"]["uniqueErrors"], 1);
        assert_eq!(value["errors"][0]["timestamp"], "2024-01-03 10:00:00");
        assert!(value["errors"][0]["knowledge"].is_null());
    }

    #[test]
    fn test_failure_json_lists_provided_files() {
        let err = AnalysisError::NoQualifyingFiles {
            provided: vec!["a.log".to_string()],
        };
        let mut buf = Vec::new();
        export_failure_json(&err, &mut buf, "stdout").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["kind"], "NoQualifyingFiles");
        assert_eq!(value["providedFiles"][0], "a.log");
        assert!(value.get("fileName").is_none());
    }

    #[test]
    fn test_text_report_lists_summary_rows() {
        let mut buf = Vec::new();
        write_text_report(&make_result(), &mut buf, "stdout").unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("mill.2.txt"));
        assert!(output.contains("2 detected, 1 distinct codes"));
        assert!(output.contains("Most recent events (2 of 2)"));
    }
}
