// LogDoctor - app/analysis.rs
//
// Analysis lifecycle management. Validates the target, opens it, and drives
// the core analyzer, either inline or on a background thread.
//
// Architecture:
//   - `analyze_file` / `analyze_candidates` run on the caller's thread.
//   - `AnalysisManager` runs one analysis on a background thread and delivers
//     a single `AnalysisProgress` message over an mpsc channel.
//   - An `Arc<AtomicBool>` cancel flag stops the scan cooperatively between
//     lines. A cancelled analysis yields no partial result.

use crate::core::analyzer::{self, AnalysisWindow};
use crate::core::model::{AnalysisResult, KnowledgeEntry};
use crate::util::error::AnalysisError;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

/// Base name of `path` for messages and naming-convention checks.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Analyse a single log over the trailing `days` days ending now.
pub fn analyze_file(
    path: &Path,
    knowledge: &[KnowledgeEntry],
    days: u32,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_file_at(path, knowledge, AnalysisWindow::last_days(days), None)
}

/// Analyse a single log over an explicit window.
///
/// Validation happens in order and short-circuits: naming convention first,
/// then existence. Only then is the file opened and streamed.
pub fn analyze_file_at(
    path: &Path,
    knowledge: &[KnowledgeEntry],
    window: AnalysisWindow,
    cancel: Option<&AtomicBool>,
) -> Result<AnalysisResult, AnalysisError> {
    let file_name = base_name(path);

    if !analyzer::is_analyzable_name(&file_name) {
        tracing::warn!(file = %file_name, "Rejected: not an analysable log name");
        return Err(AnalysisError::InvalidFileName { file_name });
    }

    if !path.exists() {
        tracing::warn!(path = %path.display(), "Rejected: log file not found");
        return Err(AnalysisError::FileNotFound {
            file_name,
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| AnalysisError::ReadError {
        file_name: file_name.clone(),
        source: e,
    })?;

    tracing::info!(
        file = %file_name,
        days = window.days,
        since = %window.start,
        knowledge_entries = knowledge.len(),
        "Analysis started"
    );
    let started = Instant::now();

    let result = analyzer::analyze_reader(
        BufReader::new(file),
        &file_name,
        knowledge,
        window,
        cancel,
    )?;

    tracing::info!(
        file = %file_name,
        total_errors = result.statistics.total_errors,
        unique_errors = result.statistics.unique_errors,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Analysis complete"
    );
    Ok(result)
}

/// Batch variant: analyse the first path that follows the naming convention.
///
/// Further qualifying paths are ignored; the equipment keeps one current log.
pub fn analyze_candidates<P: AsRef<Path>>(
    paths: &[P],
    knowledge: &[KnowledgeEntry],
    days: u32,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_candidates_at(paths, knowledge, AnalysisWindow::last_days(days), None)
}

/// Batch variant over an explicit window.
pub fn analyze_candidates_at<P: AsRef<Path>>(
    paths: &[P],
    knowledge: &[KnowledgeEntry],
    window: AnalysisWindow,
    cancel: Option<&AtomicBool>,
) -> Result<AnalysisResult, AnalysisError> {
    let mut qualifying = paths
        .iter()
        .map(|p| p.as_ref())
        .filter(|p: &&Path| analyzer::is_analyzable_name(&base_name(p)));

    let Some(first) = qualifying.next() else {
        let provided: Vec<String> = paths.iter().map(|p| base_name(p.as_ref())).collect();
        tracing::warn!(provided = ?provided, "No analysable log among candidates");
        return Err(AnalysisError::NoQualifyingFiles { provided });
    };

    let ignored = qualifying.count();
    if ignored > 0 {
        tracing::debug!(ignored, "Additional analysable candidates ignored");
    }

    analyze_file_at(first, knowledge, window, cancel)
}

// =============================================================================
// AnalysisManager
// =============================================================================

/// Message delivered once per background analysis.
#[derive(Debug)]
pub enum AnalysisProgress {
    Completed(Box<AnalysisResult>),
    Failed(AnalysisError),
}

/// Runs analyses on a background thread so the caller stays responsive.
pub struct AnalysisManager {
    /// Channel receiver for the caller to poll the outcome.
    pub progress_rx: Option<mpsc::Receiver<AnalysisProgress>>,

    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl AnalysisManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start analysing the first qualifying path among `paths`.
    ///
    /// Spawns a background thread immediately. If an analysis is already
    /// running it is cancelled first.
    pub fn start(&mut self, paths: Vec<PathBuf>, knowledge: Arc<Vec<KnowledgeEntry>>, days: u32) {
        self.cancel();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        std::thread::spawn(move || {
            let window = AnalysisWindow::last_days(days);
            let outcome =
                match analyze_candidates_at(paths.as_slice(), &knowledge, window, Some(&*cancel)) {
                    Ok(result) => AnalysisProgress::Completed(Box::new(result)),
                    Err(e) => AnalysisProgress::Failed(e),
                };
            // Receiver dropped means the caller lost interest; nothing to do.
            let _ = tx.send(outcome);
        });

        tracing::info!("Background analysis started");
    }

    /// Request cancellation of the running analysis.
    pub fn cancel(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
        self.cancel_flag = None;
    }

    /// Poll for the outcome without blocking.
    pub fn poll(&self) -> Option<AnalysisProgress> {
        self.progress_rx.as_ref().and_then(|rx| rx.try_recv().ok())
    }

    /// Block until the running analysis delivers its outcome.
    ///
    /// Returns `None` if nothing was started or the worker vanished.
    pub fn wait(&mut self) -> Option<AnalysisProgress> {
        let outcome = self.progress_rx.as_ref().and_then(|rx| rx.recv().ok());
        self.progress_rx = None;
        self.cancel_flag = None;
        outcome
    }
}

impl Default for AnalysisManager {
    fn default() -> Self {
        Self::new()
    }
}
