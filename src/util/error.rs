// LogDoctor - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogDoctor operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogDoctorError {
    /// Log analysis failed or was rejected.
    Analysis(AnalysisError),

    /// Knowledge-base loading or parsing failed.
    Knowledge(KnowledgeError),

    /// Recent log discovery failed.
    Discovery(DiscoveryError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LogDoctorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analysis(e) => write!(f, "Analysis error: {e}"),
            Self::Knowledge(e) => write!(f, "Knowledge base error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LogDoctorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Analysis(e) => Some(e),
            Self::Knowledge(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis errors
// ---------------------------------------------------------------------------

/// Failures of a single analysis call.
///
/// Validation failures (`InvalidFileName`, `FileNotFound`,
/// `NoQualifyingFiles`) are produced before any streaming begins. `ReadError`
/// and `Cancelled` abandon whatever was accumulated; no partial result exists.
#[derive(Debug)]
pub enum AnalysisError {
    /// The base name does not end in `.2.txt`.
    InvalidFileName { file_name: String },

    /// The target path does not exist at call time.
    FileNotFound { file_name: String, path: PathBuf },

    /// The underlying read failed mid-stream (permissions, device I/O, encoding).
    ReadError { file_name: String, source: io::Error },

    /// Batch variant: none of the supplied paths matched the naming convention.
    NoQualifyingFiles { provided: Vec<String> },

    /// The caller's cancel flag was raised between lines.
    Cancelled { file_name: String },
}

impl AnalysisError {
    /// Base name of the offending file, when the failure concerns one file.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::InvalidFileName { file_name }
            | Self::FileNotFound { file_name, .. }
            | Self::ReadError { file_name, .. }
            | Self::Cancelled { file_name } => Some(file_name),
            Self::NoQualifyingFiles { .. } => None,
        }
    }

    /// Stable tag for serialised failure descriptors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidFileName { .. } => "InvalidFileName",
            Self::FileNotFound { .. } => "FileNotFound",
            Self::ReadError { .. } => "ReadError",
            Self::NoQualifyingFiles { .. } => "NoQualifyingFiles",
            Self::Cancelled { .. } => "Cancelled",
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileName { file_name } => write!(
                f,
                "'{file_name}' is not an analysable log file (expected a name ending in '{}')",
                crate::util::constants::ANALYZABLE_SUFFIX
            ),
            Self::FileNotFound { file_name, .. } => {
                write!(f, "Log file '{file_name}' could not be found")
            }
            Self::ReadError { file_name, source } => {
                write!(f, "Failed to read log file '{file_name}': {source}")
            }
            Self::NoQualifyingFiles { provided } => write!(
                f,
                "No analysable log file (ending in '{}') among: {}",
                crate::util::constants::ANALYZABLE_SUFFIX,
                if provided.is_empty() {
                    "(none)".to_string()
                } else {
                    provided.join(", ")
                }
            ),
            Self::Cancelled { file_name } => {
                write!(f, "Analysis of '{file_name}' was cancelled")
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<AnalysisError> for LogDoctorError {
    fn from(e: AnalysisError) -> Self {
        Self::Analysis(e)
    }
}

// ---------------------------------------------------------------------------
// Knowledge-base errors
// ---------------------------------------------------------------------------

/// Errors related to loading the error knowledge base.
#[derive(Debug)]
pub enum KnowledgeError {
    /// JSON could not be parsed into knowledge entries.
    JsonParse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },

    /// Knowledge-base file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// I/O error reading the knowledge-base file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for KnowledgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonParse {
                path: Some(path),
                source,
            } => write!(f, "Failed to parse JSON '{}': {source}", path.display()),
            Self::JsonParse { path: None, source } => {
                write!(f, "Failed to parse knowledge-base JSON: {source}")
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Knowledge base '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => write!(
                f,
                "I/O error reading knowledge base '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for KnowledgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::JsonParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::FileTooLarge { .. } => None,
        }
    }
}

impl From<KnowledgeError> for LogDoctorError {
    fn from(e: KnowledgeError) -> Self {
        Self::Knowledge(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to recent log discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The log directory path is not a directory.
    NotADirectory { path: PathBuf },

    /// Walkdir traversal error.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirectory { path } => {
                write!(f, "Log path '{}' is not a directory", path.display())
            }
            Self::Traversal { path, source } => {
                write!(f, "Error listing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Traversal { source, .. } => Some(source),
            Self::NotADirectory { .. } => None,
        }
    }
}

impl From<DiscoveryError> for LogDoctorError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export output.
    Io { target: String, source: io::Error },

    /// CSV serialisation error.
    Csv { target: String, source: csv::Error },

    /// JSON serialisation error.
    Json {
        target: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { target, source } => write!(f, "Export I/O error '{target}': {source}"),
            Self::Csv { target, source } => write!(f, "CSV export error '{target}': {source}"),
            Self::Json { target, source } => {
                write!(f, "JSON export error '{target}': {source}")
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LogDoctorError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Problems found while loading config.toml.
///
/// Never fatal: they are reported as startup warnings and the affected
/// values fall back to their defaults.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for LogDoctor results.
pub type Result<T> = std::result::Result<T, LogDoctorError>;
