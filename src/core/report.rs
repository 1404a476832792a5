// LogDoctor - core/report.rs
//
// Support report text that accompanies a log file sent to technical support.
// Packaging and delivery happen elsewhere; this only renders the body.

use crate::core::model::KnowledgeEntry;
use crate::util::constants;
use chrono::NaiveDateTime;
use std::fmt::Write;

/// Contact details entered by the operator. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub company: Option<String>,
    pub contact: Option<String>,
}

fn or_missing(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => constants::REPORT_MISSING_VALUE,
    }
}

/// Render the `report.txt` body for `entry` (the error the operator could not
/// resolve) and the attached log file.
pub fn render_support_report(
    entry: Option<&KnowledgeEntry>,
    log_file_name: &str,
    customer: &CustomerInfo,
    generated_at: NaiveDateTime,
) -> String {
    const RULE: &str = "========================================";

    let id = entry.map(|e| e.id.to_string());
    let severity = entry.map(|e| e.severity.label());

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{} Error Report", constants::APP_NAME);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out);
    let _ = writeln!(out, "[Customer]");
    let _ = writeln!(out, "- Name: {}", or_missing(customer.name.as_deref()));
    let _ = writeln!(out, "- Company: {}", or_missing(customer.company.as_deref()));
    let _ = writeln!(out, "- Contact: {}", or_missing(customer.contact.as_deref()));
    let _ = writeln!(out);
    let _ = writeln!(out, "[Error]");
    let _ = writeln!(out, "- Error ID: {}", or_missing(id.as_deref()));
    let _ = writeln!(
        out,
        "- Error code: {}",
        or_missing(entry.map(|e| e.error_code.as_str()))
    );
    let _ = writeln!(
        out,
        "- Title: {}",
        or_missing(entry.map(|e| e.display_title.as_str()))
    );
    let _ = writeln!(out, "- Severity: {}", or_missing(severity));
    let _ = writeln!(
        out,
        "- Description: {}",
        or_missing(entry.map(|e| e.description.as_str()))
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "[Attachments]");
    let _ = writeln!(out, "- Log file: {log_file_name}");
    let _ = writeln!(out);
    let _ = writeln!(out, "[Notes]");
    let _ = writeln!(out, "The remediation guide was followed but the problem persists.");
    let _ = writeln!(out, "Log file analysis requested from technical support.");
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "This report was generated automatically by {}.",
        constants::APP_NAME
    );
    let _ = writeln!(out, "{RULE}");
    out
}
