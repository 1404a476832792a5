// LogDoctor - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers: the knowledge
// base as supplied by the caller, the per-line detections, and the
// aggregated analysis result handed back to the presentation layer.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// Severity
// =============================================================================

/// Severity assigned to an error code by the knowledge base.
///
/// The table uses upper-case strings; values outside the known set are kept
/// verbatim so nothing supplied by the table is lost on a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    System,
    Other(String),
}

impl Severity {
    /// Wire label as it appears in the knowledge-base table.
    pub fn label(&self) -> &str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::System => "SYSTEM",
            Severity::Other(s) => s,
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CRITICAL" => Severity::Critical,
            "WARNING" => Severity::Warning,
            "INFO" => Severity::Info,
            "SYSTEM" => Severity::System,
            _ => Severity::Other(s),
        }
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Knowledge base
// =============================================================================

/// One remediation step shown to the operator for an error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationStep {
    pub order: u32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A record of the externally supplied error knowledge base.
///
/// Read-only for the analyzer. `id` is the numeric code that appears after
/// `MY Error Code:` in the equipment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: u64,
    pub error_code: String,
    pub board: String,
    pub display_title: String,
    pub severity: Severity,
    pub description: String,

    /// Search terms used by the lookup screen.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Ordered remediation procedure.
    #[serde(default)]
    pub steps: Vec<RemediationStep>,
}

/// The projection of a `KnowledgeEntry` stored on each detected event.
///
/// Keywords and remediation steps are not copied per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSnapshot {
    pub id: u64,
    pub error_code: String,
    pub board: String,
    pub display_title: String,
    pub severity: Severity,
    pub description: String,
}

impl From<&KnowledgeEntry> for KnowledgeSnapshot {
    fn from(entry: &KnowledgeEntry) -> Self {
        Self {
            id: entry.id,
            error_code: entry.error_code.clone(),
            board: entry.board.clone(),
            display_title: entry.display_title.clone(),
            severity: entry.severity.clone(),
            description: entry.description.clone(),
        }
    }
}

// =============================================================================
// Analysis output
// =============================================================================

/// One occurrence of a non-zero error code inside the analysis window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedEvent {
    /// Code parsed from the line. Never `0`.
    pub detected_code: u64,

    /// Leading timestamp of the line as written, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,

    /// Knowledge-base projection, `None` when the code is unknown.
    pub knowledge: Option<KnowledgeSnapshot>,

    /// Source line, cut to 200 characters plus `...` when longer.
    pub raw_line: String,
}

/// Per-code aggregate joined with knowledge-base metadata.
///
/// Codes without a knowledge entry still get a row, carrying the
/// `Unknown Error` / `UNKNOWN` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    pub error_code: u64,
    pub count: usize,
    pub display_title: String,
    pub severity: String,
    pub board: String,
}

/// Calendar dates bounding the analysis window, ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedPeriod {
    pub from: String,
    pub to: String,
}

/// Line and event counters for one analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Every line read from the file.
    pub total_lines: u64,

    /// Lines with a leading timestamp inside the window.
    pub processed_lines: u64,

    /// Number of detected events.
    pub total_errors: usize,

    /// Number of distinct codes among the detected events.
    pub unique_errors: usize,
}

/// The complete result of a successful analysis, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub success: bool,
    pub file_name: String,
    pub analysis_days: u32,
    pub analyzed_period: AnalyzedPeriod,
    pub statistics: Statistics,

    /// Descending by count.
    pub summary: Vec<SeverityCount>,

    /// Descending by timestamp (most recent first).
    pub errors: Vec<DetectedEvent>,
}

// =============================================================================
// Recent log (output of discovery)
// =============================================================================

/// An analysable log file found in the equipment's log directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLog {
    pub file_name: String,
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,

    /// Last modification time. `None` if the platform could not report it.
    pub modified: Option<DateTime<Local>>,
}
