// LogDoctor - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogDoctor";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogDoctor";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Analysis
// =============================================================================

/// File name suffix the equipment uses for its current diagnostic log.
/// Matching is case-sensitive.
pub const ANALYZABLE_SUFFIX: &str = ".2.txt";

/// Default length of the trailing analysis window, in days.
pub const DEFAULT_ANALYSIS_DAYS: u32 = 7;

/// Minimum user-configurable analysis window (days).
pub const MIN_ANALYSIS_DAYS: u32 = 1;

/// Maximum user-configurable analysis window (days).
pub const MAX_ANALYSIS_DAYS: u32 = 365;

/// Number of characters of a raw log line kept on a detected event.
pub const RAW_LINE_DISPLAY_LIMIT: usize = 200;

/// Suffix appended to a raw line that exceeded `RAW_LINE_DISPLAY_LIMIT`.
pub const TRUNCATION_MARKER: &str = "...";

/// Error code that means "nominal, no error". Never reported.
pub const NOMINAL_ERROR_CODE: u64 = 0;

/// Initial capacity of the reused line buffer while streaming a log.
pub const LINE_BUFFER_CAPACITY: usize = 512;

// =============================================================================
// Summary placeholders for codes with no knowledge-base match
// =============================================================================

pub const UNKNOWN_TITLE: &str = "Unknown Error";
pub const UNKNOWN_SEVERITY: &str = "UNKNOWN";
pub const UNKNOWN_BOARD: &str = "UNKNOWN";

// =============================================================================
// Knowledge base
// =============================================================================

/// Default knowledge-base file name.
pub const KNOWLEDGE_FILE_NAME: &str = "db.json";

/// Maximum size of the knowledge-base JSON file in bytes.
pub const MAX_KNOWLEDGE_FILE_SIZE: u64 = 32 * 1024 * 1024; // 32 MB

/// Id of the catch-all "Unknown Error" entry shown when a search finds nothing.
pub const FALLBACK_KNOWLEDGE_ID: u64 = 9999;

// =============================================================================
// Recent log discovery
// =============================================================================

/// Default number of recent logs listed.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Minimum user-configurable recent-log limit.
pub const MIN_RECENT_LIMIT: usize = 1;

/// Maximum user-configurable recent-log limit.
pub const MAX_RECENT_LIMIT: usize = 50;

// =============================================================================
// Text report
// =============================================================================

/// Number of most recent events printed by the text report.
pub const TEXT_REPORT_EVENT_LIMIT: usize = 20;

/// Placeholder for absent values in the support report.
pub const REPORT_MISSING_VALUE: &str = "N/A";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 120;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
