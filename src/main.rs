// LogDoctor - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Knowledge-base loading
// 4. Dispatch to the analyse / recent / lookup / report commands

use clap::{Parser, Subcommand, ValueEnum};
use logdoctor::app::{analysis, knowledge_mgr};
use logdoctor::core::knowledge::{self, Lookup};
use logdoctor::core::model::{AnalysisResult, KnowledgeEntry};
use logdoctor::core::{discovery, export, report};
use logdoctor::platform::config::{self, AppConfig, PlatformPaths};
use logdoctor::util::{self, constants};
use logdoctor::util::error::{AnalysisError, LogDoctorError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// LogDoctor - equipment log analyser.
///
/// Matches error codes found in the equipment's diagnostic log against the
/// error knowledge base and reports what happened over the last few days.
#[derive(Parser, Debug)]
#[command(name = "LogDoctor", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding config.toml and the default db.json.
    #[arg(short = 'c', long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a log file (the first path ending in .2.txt is used).
    Analyze {
        /// Candidate log files.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Knowledge-base JSON file (overrides config).
        #[arg(short = 'k', long = "kb")]
        kb: Option<PathBuf>,

        /// Analysis window in days (overrides config).
        #[arg(short = 'n', long = "days", value_parser = clap::value_parser!(u32).range(1..=365))]
        days: Option<u32>,

        /// Output format.
        #[arg(short = 'f', long = "format", value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write output to a file instead of stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// List the most recent analysable logs in the equipment log directory.
    Recent {
        /// Log directory (overrides config).
        #[arg(long = "dir")]
        dir: Option<PathBuf>,

        /// Maximum number of files listed.
        #[arg(short = 'l', long = "limit")]
        limit: Option<usize>,
    },

    /// Search the knowledge base and print remediation steps.
    Lookup {
        /// Error code, title fragment, or keyword.
        query: String,

        /// Knowledge-base JSON file (overrides config).
        #[arg(short = 'k', long = "kb")]
        kb: Option<PathBuf>,
    },

    /// Render the support report that accompanies a log sent to support.
    Report {
        /// The log file being sent.
        #[arg(long = "log")]
        log: PathBuf,

        /// Knowledge-base id of the unresolved error.
        #[arg(long = "code")]
        code: Option<u64>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        contact: Option<String>,

        /// Knowledge-base JSON file (overrides config).
        #[arg(short = 'k', long = "kb")]
        kb: Option<PathBuf>,

        /// Write the report to a file instead of stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    SummaryCsv,
    EventsCsv,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let paths = match cli.config_dir.as_deref() {
        Some(dir) => PlatformPaths::rooted_at(dir),
        None => PlatformPaths::resolve(),
    };
    let (app_config, config_warnings) = config::load_config(&paths.config_dir);

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LogDoctor starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
        eprintln!("Warning: {warning}");
    }

    match run(cli.command, &app_config, &paths) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, app_config: &AppConfig, paths: &PlatformPaths) -> Result<ExitCode> {
    match command {
        Command::Analyze {
            paths: candidates,
            kb,
            days,
            format,
            output,
        } => {
            let entries = load_kb(kb.as_deref(), app_config, paths)?;
            let days = days.unwrap_or(app_config.window_days);

            let outcome = analysis::analyze_candidates(candidates.as_slice(), &entries, days);
            write_analysis(&outcome, format, output.as_deref())?;
            match outcome {
                Ok(_) => Ok(ExitCode::SUCCESS),
                Err(e) => Err(e.into()),
            }
        }

        Command::Recent { dir, limit } => {
            let Some(dir) = dir.or_else(|| app_config.log_directory.clone()) else {
                eprintln!(
                    "No log directory given. Pass --dir or set [discovery] log_directory in {}.",
                    constants::CONFIG_FILE_NAME
                );
                return Ok(ExitCode::FAILURE);
            };
            let logs = discovery::find_recent_logs(&dir, limit.unwrap_or(app_config.recent_limit))?;

            if logs.is_empty() {
                println!("No analysable logs found in '{}'.", dir.display());
            }
            for log in &logs {
                let modified = log
                    .modified
                    .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{modified}  {:>10}  {}", log.size, log.path.display());
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Lookup { query, kb } => {
            let entries = load_kb(kb.as_deref(), app_config, paths)?;
            match knowledge::lookup_or_fallback(&entries, &query) {
                Lookup::Matches(found) => {
                    for entry in found {
                        print_entry(entry);
                    }
                }
                Lookup::Fallback(entry) => {
                    println!("No entry matches \"{query}\".");
                    println!();
                    print_entry(entry);
                }
                Lookup::NotFound => {
                    println!("No entry matches \"{query}\".");
                    return Ok(ExitCode::FAILURE);
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Report {
            log,
            code,
            name,
            company,
            contact,
            kb,
            output,
        } => {
            let entries = match code {
                Some(_) => load_kb(kb.as_deref(), app_config, paths)?,
                None => Vec::new(),
            };
            let entry = code.and_then(|id| entries.iter().find(|e| e.id == id));
            if let (Some(id), None) = (code, entry) {
                tracing::warn!(id, "Error id not in knowledge base; report fields left empty");
            }

            let log_file_name = log
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| log.display().to_string());
            let customer = report::CustomerInfo {
                name,
                company,
                contact,
            };
            let body = report::render_support_report(
                entry,
                &log_file_name,
                &customer,
                chrono::Local::now().naive_local(),
            );

            let target = target_name(output.as_deref());
            let mut out = open_output(output.as_deref())?;
            out.write_all(body.as_bytes())
                .map_err(|e| io_error(&target, "write report", e))?;
            finish_output(out, &target)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Render an analysis outcome to stdout or `output`.
///
/// A failure only produces output in JSON format; for text and CSV the
/// output file is not created, so a stale result is never truncated.
fn write_analysis(
    outcome: &std::result::Result<AnalysisResult, AnalysisError>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let target = target_name(output);
    match outcome {
        Ok(result) => {
            let mut out = open_output(output)?;
            match format {
                OutputFormat::Text => export::write_text_report(result, &mut out, &target)?,
                OutputFormat::Json => {
                    export::export_json(result, &mut out, &target)?;
                    end_line(&mut out, &target)?;
                }
                OutputFormat::SummaryCsv => {
                    export::export_summary_csv(result, &mut out, &target)?;
                }
                OutputFormat::EventsCsv => {
                    export::export_events_csv(result, &mut out, &target)?;
                }
            }
            finish_output(out, &target)
        }
        Err(e) if format == OutputFormat::Json => {
            let mut out = open_output(output)?;
            export::export_failure_json(e, &mut out, &target)?;
            end_line(&mut out, &target)?;
            finish_output(out, &target)
        }
        Err(_) => Ok(()),
    }
}

/// Knowledge base from the CLI override, the config, or the platform default.
fn load_kb(
    cli_path: Option<&Path>,
    app_config: &AppConfig,
    paths: &PlatformPaths,
) -> Result<Vec<KnowledgeEntry>> {
    let path = cli_path
        .or(app_config.knowledge_path.as_deref())
        .unwrap_or(&paths.knowledge_file);
    Ok(knowledge_mgr::load_knowledge_base(path)?)
}

fn print_entry(entry: &KnowledgeEntry) {
    println!(
        "[{}] {} - {} ({}, board {})",
        entry.id, entry.error_code, entry.display_title, entry.severity, entry.board
    );
    println!("  {}", entry.description);
    for step in &entry.steps {
        println!("  [STEP {}] {}", step.order, step.text);
    }
    println!();
}

fn target_name(output: Option<&Path>) -> String {
    output
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string())
}

fn io_error(target: &str, operation: &'static str, source: std::io::Error) -> LogDoctorError {
    LogDoctorError::Io {
        path: PathBuf::from(target),
        operation,
        source,
    }
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|e| LogDoctorError::Io {
                path: path.to_path_buf(),
                operation: "create output",
                source: e,
            })?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

/// serde_json leaves the last line unterminated.
fn end_line(out: &mut Box<dyn Write>, target: &str) -> Result<()> {
    out.write_all(b"\n")
        .map_err(|e| io_error(target, "write output", e))
}

fn finish_output(mut out: Box<dyn Write>, target: &str) -> Result<()> {
    out.flush().map_err(|e| io_error(target, "flush output", e))
}
