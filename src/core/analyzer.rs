// LogDoctor - core/analyzer.rs
//
// Streaming error-code extraction from equipment logs.
// Core layer: accepts BufRead trait objects, never touches the filesystem.
//
// Each line goes through `classify_line`, whose outcome decides which
// counters move and whether an event is recorded. Lines are consumed one at a
// time through a single reused buffer so the file is never held in memory.
//
// Time zone: log timestamps carry no zone. They are read as local wall-clock
// time and compared against a window computed from local "now". If the
// equipment and the analysing machine disagree on the zone, the window edge
// shifts by the difference. The window start is taken `days * 24h` before the
// current instant, so a DST change inside the window does not move it.

use crate::core::knowledge::KnowledgeIndex;
use crate::core::model::{
    AnalysisResult, AnalyzedPeriod, DetectedEvent, KnowledgeEntry, KnowledgeSnapshot,
    SeverityCount, Statistics,
};
use crate::util::constants;
use crate::util::error::AnalysisError;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

// =============================================================================
// Line grammar
// =============================================================================

/// Leading `YYYY-MM-DDTHH:mm:ss`, date and time captured separately.
fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})T([0-9]{2}:[0-9]{2}:[0-9]{2})")
            .expect("timestamp pattern is valid")
    })
}

/// `MY Error Code:` marker anywhere in the line.
fn error_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"MY Error Code:\s*([0-9]+)").expect("error code pattern is valid"))
}

/// Turn the captured `YYYY-MM-DD` / `HH:mm:ss` fields into an instant.
///
/// Out-of-range days and times roll over into the following period
/// (`02-30` is two days after `02-28`, `24:00:00` is the next midnight).
/// `None` when even that is impossible, e.g. month `13`.
fn normalise_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let year: i32 = date.get(0..4)?.parse().ok()?;
    let month: u32 = date.get(5..7)?.parse().ok()?;
    let day: i64 = date.get(8..10)?.parse().ok()?;
    let hour: i64 = time.get(0..2)?.parse().ok()?;
    let minute: i64 = time.get(3..5)?.parse().ok()?;
    let second: i64 = time.get(6..8)?.parse().ok()?;

    if day == 0 {
        return None;
    }
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    first_of_month.checked_add_signed(
        Duration::days(day - 1)
            + Duration::hours(hour)
            + Duration::minutes(minute)
            + Duration::seconds(second),
    )
}

/// Whether `file_name` follows the equipment's log naming convention.
pub fn is_analyzable_name(file_name: &str) -> bool {
    file_name.ends_with(constants::ANALYZABLE_SUFFIX)
}

/// Cut `line` to `RAW_LINE_DISPLAY_LIMIT` characters, appending the
/// truncation marker when anything was removed.
pub fn truncate_for_display(line: &str) -> String {
    match line.char_indices().nth(constants::RAW_LINE_DISPLAY_LIMIT) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + constants::TRUNCATION_MARKER.len());
            out.push_str(&line[..cut]);
            out.push_str(constants::TRUNCATION_MARKER);
            out
        }
        None => line.to_string(),
    }
}

// =============================================================================
// Analysis window
// =============================================================================

/// Trailing window of `days` days ending at `now` (local wall-clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    pub start: NaiveDateTime,
    pub now: NaiveDateTime,
    pub days: u32,
}

impl AnalysisWindow {
    /// Window ending at an explicit instant.
    pub fn ending_at(now: NaiveDateTime, days: u32) -> Self {
        Self {
            start: now
                .checked_sub_signed(Duration::days(i64::from(days)))
                .unwrap_or(NaiveDateTime::MIN),
            now,
            days,
        }
    }

    /// Window ending at a zoned instant. The start is `days * 24h` of
    /// elapsed time earlier, expressed as wall-clock time in the same zone.
    pub fn ending_at_instant<Tz: TimeZone>(now: &DateTime<Tz>, days: u32) -> Self {
        let start = now
            .clone()
            .checked_sub_signed(Duration::days(i64::from(days)))
            .map(|t| t.naive_local())
            .unwrap_or(NaiveDateTime::MIN);
        Self {
            start,
            now: now.naive_local(),
            days,
        }
    }

    /// Window ending at the current local time.
    pub fn last_days(days: u32) -> Self {
        Self::ending_at_instant(&Local::now(), days)
    }

    /// Lines strictly before `start` are too old. There is no upper bound:
    /// equipment clocks running ahead of the analysing machine still count.
    pub fn admits(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start
    }

    pub fn period(&self) -> AnalyzedPeriod {
        AnalyzedPeriod {
            from: self.start.date().format("%Y-%m-%d").to_string(),
            to: self.now.date().format("%Y-%m-%d").to_string(),
        }
    }
}

// =============================================================================
// Per-line classification
// =============================================================================

/// What a single line contributes to the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// No leading timestamp.
    NoTimestamp,

    /// Timestamp earlier than the window start.
    BeforeWindow,

    /// Inside the window but without an error-code marker.
    NoErrorCode,

    /// Marker present with the nominal code `0`.
    NominalCode,

    /// A reportable error code.
    Detected { timestamp: String, code: u64 },
}

impl LineOutcome {
    /// Whether the line counts towards `processed_lines`.
    pub fn is_processed(&self) -> bool {
        !matches!(self, LineOutcome::NoTimestamp | LineOutcome::BeforeWindow)
    }
}

/// Decide what `line` contributes, in the fixed order: timestamp, window,
/// marker, nominal code.
pub fn classify_line(line: &str, window: &AnalysisWindow) -> LineOutcome {
    let Some(ts) = timestamp_regex().captures(line) else {
        return LineOutcome::NoTimestamp;
    };
    let (date, time) = (&ts[1], &ts[2]);

    // A prefix that names no instant at all cannot be shown to be too old.
    match normalise_timestamp(date, time) {
        Some(parsed) if !window.admits(parsed) => return LineOutcome::BeforeWindow,
        Some(_) => {}
        None => tracing::trace!(raw = &ts[0], "Timestamp prefix is not a calendar instant"),
    }

    let Some(marker) = error_code_regex().captures(line) else {
        return LineOutcome::NoErrorCode;
    };

    // Digits beyond u64 range cannot name a knowledge-base entry, so the line
    // is dropped here instead of being reported as an unknown code.
    let Ok(code) = marker[1].parse::<u64>() else {
        tracing::debug!(digits = &marker[1], "Error code out of range; ignored");
        return LineOutcome::NoErrorCode;
    };

    if code == constants::NOMINAL_ERROR_CODE {
        return LineOutcome::NominalCode;
    }

    LineOutcome::Detected {
        timestamp: format!("{date} {time}"),
        code,
    }
}

// =============================================================================
// Accumulator
// =============================================================================

/// Fold state for one analysis call.
///
/// Owns every buffer and counter it uses; nothing survives `finish`.
pub struct LogAnalysis<'kb> {
    knowledge: KnowledgeIndex<'kb>,
    window: AnalysisWindow,
    events: Vec<DetectedEvent>,
    /// Code -> position in `tallies`, so ties keep first-seen order.
    tally_slot: HashMap<u64, usize>,
    tallies: Vec<(u64, usize)>,
    total_lines: u64,
    processed_lines: u64,
}

impl<'kb> LogAnalysis<'kb> {
    pub fn new(knowledge: &'kb [KnowledgeEntry], window: AnalysisWindow) -> Self {
        let knowledge = KnowledgeIndex::build(knowledge);
        if knowledge.is_empty() {
            tracing::warn!("Knowledge base is empty; every code will be reported as unknown");
        }
        Self {
            knowledge,
            window,
            events: Vec::new(),
            tally_slot: HashMap::new(),
            tallies: Vec::new(),
            total_lines: 0,
            processed_lines: 0,
        }
    }

    /// Feed one line (without its terminator).
    pub fn ingest(&mut self, line: &str) {
        self.total_lines += 1;

        let outcome = classify_line(line, &self.window);
        if outcome.is_processed() {
            self.processed_lines += 1;
        }

        let LineOutcome::Detected { timestamp, code } = outcome else {
            return;
        };

        tracing::trace!(
            code,
            timestamp = %timestamp,
            line = crate::util::logging::preview(line),
            "Error code detected"
        );

        self.events.push(DetectedEvent {
            detected_code: code,
            timestamp,
            knowledge: self.knowledge.get(code).map(KnowledgeSnapshot::from),
            raw_line: truncate_for_display(line),
        });

        match self.tally_slot.get(&code) {
            Some(&slot) => self.tallies[slot].1 += 1,
            None => {
                self.tally_slot.insert(code, self.tallies.len());
                self.tallies.push((code, 1));
            }
        }
    }

    /// Sort, aggregate, and hand the result to the caller.
    pub fn finish(self, file_name: &str) -> AnalysisResult {
        let LogAnalysis {
            knowledge,
            window,
            mut events,
            tallies,
            total_lines,
            processed_lines,
            ..
        } = self;

        // Fixed-width timestamps sort lexicographically; stable sort keeps
        // encounter order within the same second.
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut summary: Vec<SeverityCount> = tallies
            .into_iter()
            .map(|(code, count)| match knowledge.get(code) {
                Some(entry) => SeverityCount {
                    error_code: code,
                    count,
                    display_title: or_placeholder(&entry.display_title, constants::UNKNOWN_TITLE),
                    severity: or_placeholder(entry.severity.label(), constants::UNKNOWN_SEVERITY),
                    board: or_placeholder(&entry.board, constants::UNKNOWN_BOARD),
                },
                None => SeverityCount {
                    error_code: code,
                    count,
                    display_title: constants::UNKNOWN_TITLE.to_string(),
                    severity: constants::UNKNOWN_SEVERITY.to_string(),
                    board: constants::UNKNOWN_BOARD.to_string(),
                },
            })
            .collect();
        summary.sort_by(|a, b| b.count.cmp(&a.count));

        let statistics = Statistics {
            total_lines,
            processed_lines,
            total_errors: events.len(),
            unique_errors: summary.len(),
        };

        tracing::debug!(
            file = file_name,
            total_lines,
            processed_lines,
            total_errors = statistics.total_errors,
            unique_errors = statistics.unique_errors,
            "Analysis fold finished"
        );

        AnalysisResult {
            success: true,
            file_name: file_name.to_string(),
            analysis_days: window.days,
            analyzed_period: window.period(),
            statistics,
            summary,
            errors: events,
        }
    }
}

/// Knowledge-base text for a summary row; blank fields get the placeholder.
fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Stream `reader` line by line through a `LogAnalysis`.
///
/// `cancel` is checked before each line. Read failures (including invalid
/// UTF-8) and cancellation discard everything accumulated so far.
pub fn analyze_reader<R: BufRead>(
    mut reader: R,
    file_name: &str,
    knowledge: &[KnowledgeEntry],
    window: AnalysisWindow,
    cancel: Option<&AtomicBool>,
) -> Result<AnalysisResult, AnalysisError> {
    let mut analysis = LogAnalysis::new(knowledge, window);
    let mut buf = String::with_capacity(constants::LINE_BUFFER_CAPACITY);

    loop {
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            tracing::info!(file = file_name, "Analysis cancelled");
            return Err(AnalysisError::Cancelled {
                file_name: file_name.to_string(),
            });
        }

        buf.clear();
        let read = reader
            .read_line(&mut buf)
            .map_err(|e| AnalysisError::ReadError {
                file_name: file_name.to_string(),
                source: e,
            })?;
        if read == 0 {
            break;
        }

        let line = buf.strip_suffix('\n').unwrap_or(&buf);
        let line = line.strip_suffix('\r').unwrap_or(line);
        analysis.ingest(line);
    }

    Ok(analysis.finish(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Severity;
    use std::io::{self, Cursor, Read};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn window() -> AnalysisWindow {
        AnalysisWindow::ending_at(at(2024, 1, 5, 0, 0, 0), 7)
    }

    fn kb() -> Vec<KnowledgeEntry> {
        vec![
            KnowledgeEntry {
                id: 42,
                error_code: "E042".to_string(),
                board: "MAIN".to_string(),
                display_title: "Spindle overload".to_string(),
                severity: Severity::Critical,
                description: "Spindle current exceeded limit".to_string(),
                keywords: vec!["spindle".to_string()],
                steps: vec![],
            },
            KnowledgeEntry {
                id: 7,
                error_code: "E007".to_string(),
                board: "IO".to_string(),
                display_title: "Door open".to_string(),
                severity: Severity::Warning,
                description: "Door interlock tripped".to_string(),
                keywords: vec![],
                steps: vec![],
            },
        ]
    }

    fn run(content: &str) -> AnalysisResult {
        analyze_reader(Cursor::new(content), "mill.2.txt", &kb(), window(), None).unwrap()
    }

    #[test]
    fn test_analyzable_name_is_case_sensitive_suffix() {
        assert!(is_analyzable_name("Lilivis Mill.2.txt"));
        assert!(!is_analyzable_name("Lilivis Mill.1.txt"));
        assert!(!is_analyzable_name("mill.2.TXT"));
        assert!(!is_analyzable_name("mill.2.txt.bak"));
    }

    #[test]
    fn test_classify_each_skip_branch() {
        let w = window();
        assert_eq!(classify_line("no timestamp here", &w), LineOutcome::NoTimestamp);
        assert_eq!(
            classify_line(" 2024-01-04T10:00:00 indented", &w),
            LineOutcome::NoTimestamp
        );
        assert_eq!(
            classify_line("2023-12-01T10:00:00 MY Error Code: 5", &w),
            LineOutcome::BeforeWindow
        );
        assert_eq!(
            classify_line("2024-01-04T10:00:00 heartbeat ok", &w),
            LineOutcome::NoErrorCode
        );
        assert_eq!(
            classify_line("2024-01-04T10:00:00 MY Error Code: 0", &w),
            LineOutcome::NominalCode
        );
        assert_eq!(
            classify_line("2024-01-04T10:00:00 [axis] MY Error Code:  42 stop", &w),
            LineOutcome::Detected {
                timestamp: "2024-01-04 10:00:00".to_string(),
                code: 42
            }
        );
    }

    #[test]
    fn test_out_of_range_calendar_fields_roll_over() {
        let w = AnalysisWindow::ending_at(at(2024, 3, 5, 0, 0, 0), 7);
        assert_eq!(
            classify_line("2024-02-30T10:00:00 MY Error Code: 42", &w),
            LineOutcome::Detected {
                timestamp: "2024-02-30 10:00:00".to_string(),
                code: 42
            }
        );
        assert_eq!(
            classify_line("2024-03-01T24:00:00 MY Error Code: 42", &w),
            LineOutcome::Detected {
                timestamp: "2024-03-01 24:00:00".to_string(),
                code: 42
            }
        );
        // Feb 30 rolls to Mar 1, which is before a window starting Mar 2.
        let later = AnalysisWindow::ending_at(at(2024, 3, 9, 0, 0, 0), 7);
        assert_eq!(
            classify_line("2024-02-30T10:00:00 MY Error Code: 42", &later),
            LineOutcome::BeforeWindow
        );
        assert_eq!(
            normalise_timestamp("2024-03-01", "24:00:00"),
            Some(at(2024, 3, 2, 0, 0, 0))
        );
    }

    #[test]
    fn test_impossible_timestamp_is_processed_not_skipped() {
        let w = AnalysisWindow::ending_at(at(2024, 3, 5, 0, 0, 0), 7);
        let outcome = classify_line("2024-13-40T10:00:00 MY Error Code: 42", &w);
        assert!(outcome.is_processed());
        assert_eq!(
            outcome,
            LineOutcome::Detected {
                timestamp: "2024-13-40 10:00:00".to_string(),
                code: 42
            }
        );
    }

    #[test]
    fn test_window_from_instant_subtracts_elapsed_time() {
        let zone = chrono::FixedOffset::east_opt(3600).unwrap();
        let now = zone.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let w = AnalysisWindow::ending_at_instant(&now, 7);
        assert_eq!(w.now, at(2024, 3, 31, 12, 0, 0));
        assert_eq!(w.start, at(2024, 3, 24, 12, 0, 0));
        assert_eq!(w.days, 7);
    }

    #[test]
    fn test_blank_knowledge_fields_get_placeholders() {
        let blank = vec![KnowledgeEntry {
            id: 42,
            error_code: "E042".to_string(),
            board: String::new(),
            display_title: String::new(),
            severity: Severity::Other(String::new()),
            description: String::new(),
            keywords: vec![],
            steps: vec![],
        }];
        let result = analyze_reader(
            Cursor::new("2024-01-02T10:00:00 MY Error Code: 42\n"),
            "mill.2.txt",
            &blank,
            window(),
            None,
        )
        .unwrap();
        let row = &result.summary[0];
        assert_eq!(row.display_title, "Unknown Error");
        assert_eq!(row.severity, "UNKNOWN");
        assert_eq!(row.board, "UNKNOWN");
        assert!(result.errors[0].knowledge.is_some());
    }

    #[test]
    fn test_window_start_is_inclusive() {
        let w = window();
        assert_eq!(w.start, at(2023, 12, 29, 0, 0, 0));
        assert!(matches!(
            classify_line("2023-12-29T00:00:00 MY Error Code: 3", &w),
            LineOutcome::Detected { code: 3, .. }
        ));
        assert_eq!(
            classify_line("2023-12-28T23:59:59 MY Error Code: 3", &w),
            LineOutcome::BeforeWindow
        );
    }

    #[test]
    fn test_lines_ahead_of_now_are_admitted() {
        assert!(matches!(
            classify_line("2024-01-06T09:00:00 MY Error Code: 3", &window()),
            LineOutcome::Detected { code: 3, .. }
        ));
    }

    #[test]
    fn test_overflowing_code_is_treated_as_missing() {
        let line = "2024-01-04T10:00:00 MY Error Code: 99999999999999999999999";
        assert_eq!(classify_line(line, &window()), LineOutcome::NoErrorCode);
    }

    #[test]
    fn test_aggregates_and_orders_reference_example() {
        let content = "\
2024-01-01T10:00:00 axis MY Error Code: 42
2024-01-01T11:00:00 axis MY Error Code: 42
2024-01-01T12:00:00 door MY Error Code: 7
";
        let result = run(content);
        assert!(result.success);
        assert_eq!(result.file_name, "mill.2.txt");
        assert_eq!(result.analysis_days, 7);
        assert_eq!(result.statistics.total_lines, 3);
        assert_eq!(result.statistics.processed_lines, 3);
        assert_eq!(result.statistics.total_errors, 3);
        assert_eq!(result.statistics.unique_errors, 2);

        assert_eq!(result.summary.len(), 2);
        assert_eq!((result.summary[0].error_code, result.summary[0].count), (42, 2));
        assert_eq!((result.summary[1].error_code, result.summary[1].count), (7, 1));
        assert_eq!(result.summary[0].display_title, "Spindle overload");
        assert_eq!(result.summary[0].severity, "CRITICAL");
        assert_eq!(result.summary[1].board, "IO");

        assert_eq!(result.errors[0].timestamp, "2024-01-01 12:00:00");
        assert_eq!(result.errors[2].timestamp, "2024-01-01 10:00:00");
        let snapshot = result.errors[0].knowledge.as_ref().unwrap();
        assert_eq!(snapshot.error_code, "E007");
    }

    #[test]
    fn test_counters_distinguish_old_and_malformed_lines() {
        let content = "\
boot banner without timestamp
2023-06-01T10:00:00 MY Error Code: 42
2024-01-02T10:00:00 idle
2024-01-02T10:00:01 MY Error Code: 0
2024-01-02T10:00:02 MY Error Code: 42
";
        let result = run(content);
        assert_eq!(result.statistics.total_lines, 5);
        assert_eq!(result.statistics.processed_lines, 3);
        assert_eq!(result.statistics.total_errors, 1);
        assert!(result.errors.iter().all(|e| e.detected_code != 0));
    }

    #[test]
    fn test_unknown_code_gets_placeholder_row() {
        let result = run("2024-01-02T10:00:00 MY Error Code: 555\n");
        assert_eq!(result.summary.len(), 1);
        let row = &result.summary[0];
        assert_eq!(row.error_code, 555);
        assert_eq!(row.display_title, "Unknown Error");
        assert_eq!(row.severity, "UNKNOWN");
        assert_eq!(row.board, "UNKNOWN");
        assert!(result.errors[0].knowledge.is_none());
    }

    #[test]
    fn test_summary_ties_keep_first_seen_order() {
        let content = "\
2024-01-02T10:00:00 MY Error Code: 9
2024-01-02T10:00:01 MY Error Code: 3
2024-01-02T10:00:02 MY Error Code: 3
2024-01-02T10:00:03 MY Error Code: 9
2024-01-02T10:00:04 MY Error Code: 5
";
        let result = run(content);
        let codes: Vec<u64> = result.summary.iter().map(|s| s.error_code).collect();
        assert_eq!(codes, vec![9, 3, 5]);
        let total: usize = result.summary.iter().map(|s| s.count).sum();
        assert_eq!(total, result.errors.len());
    }

    #[test]
    fn test_same_second_events_keep_encounter_order() {
        let content = "\
2024-01-02T10:00:00 first MY Error Code: 1
2024-01-02T10:00:00 second MY Error Code: 2
2024-01-02T09:00:00 earlier MY Error Code: 3
";
        let result = run(content);
        let codes: Vec<u64> = result.errors.iter().map(|e| e.detected_code).collect();
        assert_eq!(codes, vec![1, 2, 3]);
    }

    #[test]
    fn test_crlf_line_endings_are_stripped() {
        let result = run("2024-01-02T10:00:00 MY Error Code: 42\r\n");
        assert_eq!(result.errors[0].raw_line, "2024-01-02T10:00:00 MY Error Code: 42");
    }

    #[test]
    fn test_truncation_keeps_prefix_and_marker() {
        let line = "a".repeat(250);
        let cut = truncate_for_display(&line);
        assert_eq!(cut.chars().count(), 203);
        assert!(cut.ends_with("..."));
        assert!(line.starts_with(&cut[..200]));

        let exact = "b".repeat(200);
        assert_eq!(truncate_for_display(&exact), exact);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let line = "é".repeat(210);
        let cut = truncate_for_display(&line);
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn test_period_reports_window_dates() {
        let result = run("");
        assert_eq!(result.analyzed_period.from, "2023-12-29");
        assert_eq!(result.analyzed_period.to, "2024-01-05");
        assert_eq!(result.statistics, Statistics::default());
    }

    #[test]
    fn test_repeat_analysis_is_identical() {
        let content = "\
2024-01-03T08:00:00 MY Error Code: 7
2024-01-02T08:00:00 MY Error Code: 42
2024-01-04T08:00:00 MY Error Code: 42
";
        assert_eq!(run(content), run(content));
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let bytes: &[u8] = b"2024-01-02T10:00:00 MY Error Code: 1\n\xff\xfe broken\n";
        let result = analyze_reader(Cursor::new(bytes), "mill.2.txt", &kb(), window(), None);
        assert!(matches!(result, Err(AnalysisError::ReadError { .. })));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn test_io_failure_surfaces_as_read_error() {
        let reader = io::BufReader::new(FailingReader);
        let err = analyze_reader(reader, "mill.2.txt", &kb(), window(), None).unwrap_err();
        assert_eq!(err.kind(), "ReadError");
        assert_eq!(err.file_name(), Some("mill.2.txt"));
    }

    #[test]
    fn test_raised_cancel_flag_stops_before_reading() {
        let cancel = AtomicBool::new(true);
        let result = analyze_reader(
            Cursor::new("2024-01-02T10:00:00 MY Error Code: 42\n"),
            "mill.2.txt",
            &kb(),
            window(),
            Some(&cancel),
        );
        assert!(matches!(result, Err(AnalysisError::Cancelled { .. })));
    }
}
