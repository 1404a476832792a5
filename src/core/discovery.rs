// LogDoctor - core/discovery.rs
//
// Listing of the current analysable logs in the equipment's log directory.
//
// Architecture note: this module uses `walkdir` for directory listing as an
// OS abstraction. It reads only file *metadata* (size, mtime), never file
// *contents*; the analyzer owns that.
//
// Only the top level of the directory is listed: the equipment writes its
// logs flat, and a recursive walk would pick up archived copies.

use crate::core::analyzer::is_analyzable_name;
use crate::core::model::RecentLog;
use crate::util::constants;
use crate::util::error::DiscoveryError;
use chrono::{DateTime, Local};
use std::path::Path;

/// List analysable logs in `dir`, newest modification first, at most `limit`.
///
/// A directory that does not exist yields an empty list: the equipment
/// software may simply not be installed on this machine. Entries that cannot
/// be inspected are skipped with a debug log.
pub fn find_recent_logs(dir: &Path, limit: usize) -> Result<Vec<RecentLog>, DiscoveryError> {
    match std::fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(DiscoveryError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(e) => {
            tracing::info!(dir = %dir.display(), error = %e, "Log directory not found");
            return Ok(Vec::new());
        }
    }

    let limit = limit.clamp(constants::MIN_RECENT_LIMIT, constants::MAX_RECENT_LIMIT);
    let mut logs: Vec<RecentLog> = Vec::new();

    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            // The directory itself vanished or became unreadable mid-listing.
            Err(e) if e.depth() == 0 => {
                return Err(DiscoveryError::Traversal {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skipping inaccessible entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            tracing::debug!(path = %entry.path().display(), "Skipping non-UTF-8 filename");
            continue;
        };
        if !is_analyzable_name(file_name) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "Cannot read metadata");
                continue;
            }
        };

        logs.push(RecentLog {
            file_name: file_name.to_string(),
            path: entry.path().to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Local>::from),
        });
    }

    // Newest first; files without an mtime sort last.
    logs.sort_by(|a, b| b.modified.cmp(&a.modified));
    logs.truncate(limit);

    tracing::info!(dir = %dir.display(), found = logs.len(), "Recent logs listed");
    Ok(logs)
}
