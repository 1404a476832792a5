// LogDoctor - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance. The file is read-only from the application's
// point of view; users edit it by hand.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogDoctor data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logdoctor/ or %APPDATA%\LogDoctor\config\)
    pub config_dir: PathBuf,

    /// Default knowledge-base location (db.json next to the config directory).
    pub knowledge_file: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let knowledge_file = config_dir
                .parent()
                .unwrap_or(&config_dir)
                .join(constants::KNOWLEDGE_FILE_NAME);

            tracing::debug!(
                config = %config_dir.display(),
                knowledge = %knowledge_file.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                knowledge_file,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self::rooted_at(Path::new("."))
        }
    }

    /// Paths rooted at an explicit directory (CLI `--config-dir`).
    pub fn rooted_at(dir: &Path) -> Self {
        Self {
            config_dir: dir.to_path_buf(),
            knowledge_file: dir.join(constants::KNOWLEDGE_FILE_NAME),
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[analysis]` section.
    pub analysis: AnalysisSection,
    /// `[knowledge]` section.
    pub knowledge: KnowledgeSection,
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Trailing window length in days.
    pub window_days: Option<i64>,
}

/// `[knowledge]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct KnowledgeSection {
    /// Path to the knowledge-base JSON table.
    pub path: Option<String>,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Directory the equipment writes its logs to.
    pub log_directory: Option<String>,
    /// Number of recent logs listed.
    pub recent_limit: Option<i64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Analysis --
    /// Trailing window length in days.
    pub window_days: u32,

    // -- Knowledge --
    /// Knowledge-base override; `None` means the platform default.
    pub knowledge_path: Option<PathBuf>,

    // -- Discovery --
    /// Equipment log directory; `None` means not configured.
    pub log_directory: Option<PathBuf>,
    /// Number of recent logs listed.
    pub recent_limit: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_days: constants::DEFAULT_ANALYSIS_DAYS,
            knowledge_path: None,
            log_directory: None,
            recent_limit: constants::DEFAULT_RECENT_LIMIT,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from `config_dir`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal problems.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unparseable, returns defaults with a warning so the
/// application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %config_path.display(), error = %e, "Could not read config file; using defaults");
            warnings.push(ConfigError::Io {
                path: config_path,
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let (config, parse_warnings) = parse_config(&content, &config_path);
    warnings.extend(parse_warnings);
    (config, warnings)
}

/// Validate config.toml `content`; `origin` is only used in messages.
pub fn parse_config(content: &str, origin: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings: Vec<ConfigError> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(path = %origin.display(), error = %e, "Failed to parse config file; using defaults");
            warnings.push(ConfigError::TomlParse {
                path: origin.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %origin.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Analysis: window_days --
    if let Some(days) = raw.analysis.window_days {
        let range = i64::from(constants::MIN_ANALYSIS_DAYS)..=i64::from(constants::MAX_ANALYSIS_DAYS);
        match u32::try_from(days) {
            Ok(d) if range.contains(&days) => config.window_days = d,
            _ => warnings.push(ConfigError::ValueOutOfRange {
                field: "[analysis] window_days".to_string(),
                value: days.to_string(),
                expected: format!(
                    "{}-{} (using default {})",
                    constants::MIN_ANALYSIS_DAYS,
                    constants::MAX_ANALYSIS_DAYS,
                    constants::DEFAULT_ANALYSIS_DAYS,
                ),
            }),
        }
    }

    // -- Knowledge: path --
    if let Some(ref path) = raw.knowledge.path {
        if !path.trim().is_empty() {
            config.knowledge_path = Some(PathBuf::from(path));
        }
    }

    // -- Discovery: log_directory --
    if let Some(ref dir) = raw.discovery.log_directory {
        if !dir.trim().is_empty() {
            config.log_directory = Some(PathBuf::from(dir));
        }
    }

    // -- Discovery: recent_limit --
    if let Some(limit) = raw.discovery.recent_limit {
        match usize::try_from(limit) {
            Ok(l) if (constants::MIN_RECENT_LIMIT..=constants::MAX_RECENT_LIMIT).contains(&l) => {
                config.recent_limit = l;
            }
            _ => warnings.push(ConfigError::ValueOutOfRange {
                field: "[discovery] recent_limit".to_string(),
                value: limit.to_string(),
                expected: format!(
                    "{}-{} (using default {})",
                    constants::MIN_RECENT_LIMIT,
                    constants::MAX_RECENT_LIMIT,
                    constants::DEFAULT_RECENT_LIMIT,
                ),
            }),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: "one of error, warn, info, debug, trace (using default info)"
                    .to_string(),
            });
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}
