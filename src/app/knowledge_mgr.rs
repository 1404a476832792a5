// LogDoctor - app/knowledge_mgr.rs
//
// Loads the error knowledge base (db.json) from disk. The analyzer itself
// never loads or caches the table; callers pass the loaded entries in.

use crate::core::knowledge;
use crate::core::model::KnowledgeEntry;
use crate::util::constants;
use crate::util::error::KnowledgeError;
use std::path::Path;

/// Read and parse the knowledge-base JSON table at `path`.
pub fn load_knowledge_base(path: &Path) -> Result<Vec<KnowledgeEntry>, KnowledgeError> {
    let metadata = std::fs::metadata(path).map_err(|e| KnowledgeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.len() > constants::MAX_KNOWLEDGE_FILE_SIZE {
        return Err(KnowledgeError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_KNOWLEDGE_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let entries = knowledge::parse_knowledge_base(&content).map_err(|e| match e {
        KnowledgeError::JsonParse { source, .. } => KnowledgeError::JsonParse {
            path: Some(path.to_path_buf()),
            source,
        },
        other => other,
    })?;

    tracing::info!(
        path = %path.display(),
        entries = entries.len(),
        "Loaded knowledge base"
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_loads_entries_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(
            &path,
            r#"[{"id":7,"error_code":"E007","board":"IO","display_title":"Door open",
                "severity":"WARNING","description":"Door interlock tripped",
                "keywords":["door"],
                "steps":[{"order":1,"text":"Close the door","image":"door.png"}]}]"#,
        )
        .unwrap();

        let entries = load_knowledge_base(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].steps[0].text, "Close the door");
    }

    #[test]
    fn test_parse_error_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "[{").unwrap();

        match load_knowledge_base(&path) {
            Err(KnowledgeError::JsonParse { path: Some(p), .. }) => assert_eq!(p, path),
            other => panic!("expected JsonParse with path, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_knowledge_base(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(KnowledgeError::Io { .. })));
    }
}
