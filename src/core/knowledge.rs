// LogDoctor - core/knowledge.rs
//
// Knowledge-base parsing, indexing and search.
// Core layer: works on strings and slices, never touches the filesystem.

use crate::core::model::KnowledgeEntry;
use crate::util::constants;
use crate::util::error::KnowledgeError;
use std::collections::HashMap;

/// Parse the knowledge-base JSON table (an array of entries).
pub fn parse_knowledge_base(json: &str) -> Result<Vec<KnowledgeEntry>, KnowledgeError> {
    serde_json::from_str(json).map_err(|e| KnowledgeError::JsonParse {
        path: None,
        source: e,
    })
}

/// Id-keyed view over a borrowed knowledge-base table.
///
/// Built once per analysis so each detected code is joined in O(1).
#[derive(Debug)]
pub struct KnowledgeIndex<'kb> {
    by_id: HashMap<u64, &'kb KnowledgeEntry>,
}

impl<'kb> KnowledgeIndex<'kb> {
    /// Index `entries` by id. When two entries share an id the later one wins.
    pub fn build(entries: &'kb [KnowledgeEntry]) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        for entry in entries {
            if by_id.insert(entry.id, entry).is_some() {
                tracing::debug!(id = entry.id, "Duplicate knowledge-base id; later entry wins");
            }
        }
        Self { by_id }
    }

    pub fn get(&self, id: u64) -> Option<&'kb KnowledgeEntry> {
        self.by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Case-insensitive substring search over error code, title and keywords.
///
/// Table order is preserved. An empty query matches nothing.
pub fn search<'kb>(entries: &'kb [KnowledgeEntry], query: &str) -> Vec<&'kb KnowledgeEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    entries
        .iter()
        .filter(|entry| {
            entry.error_code.to_lowercase().contains(&needle)
                || entry.display_title.to_lowercase().contains(&needle)
                || entry
                    .keywords
                    .iter()
                    .any(|k| k.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Outcome of a lookup that may fall back to the catch-all entry.
#[derive(Debug)]
pub enum Lookup<'kb> {
    /// At least one entry matched the query.
    Matches(Vec<&'kb KnowledgeEntry>),

    /// Nothing matched; the table's catch-all "Unknown Error" entry.
    Fallback(&'kb KnowledgeEntry),

    /// Nothing matched and the table has no catch-all entry.
    NotFound,
}

/// Search, falling back to the entry with id `FALLBACK_KNOWLEDGE_ID`.
pub fn lookup_or_fallback<'kb>(entries: &'kb [KnowledgeEntry], query: &str) -> Lookup<'kb> {
    let matches = search(entries, query);
    if !matches.is_empty() {
        return Lookup::Matches(matches);
    }

    match entries
        .iter()
        .find(|e| e.id == constants::FALLBACK_KNOWLEDGE_ID)
    {
        Some(fallback) => Lookup::Fallback(fallback),
        None => Lookup::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Severity;

    fn entry(id: u64, code: &str, title: &str, keywords: &[&str]) -> KnowledgeEntry {
        KnowledgeEntry {
            id,
            error_code: code.to_string(),
            board: "MAIN".to_string(),
            display_title: title.to_string(),
            severity: Severity::Warning,
            description: format!("{title} description"),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            steps: vec![],
        }
    }

    #[test]
    fn test_index_lookup_by_id() {
        let entries = vec![entry(7, "E007", "Door open", &[]), entry(42, "E042", "Overload", &[])];
        let index = KnowledgeIndex::build(&entries);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(42).map(|e| e.error_code.as_str()), Some("E042"));
        assert!(index.get(99).is_none());
        assert!(!index.is_empty());
        assert!(KnowledgeIndex::build(&[]).is_empty());
    }

    #[test]
    fn test_index_duplicate_id_later_wins() {
        let entries = vec![entry(7, "OLD", "Old", &[]), entry(7, "NEW", "New", &[])];
        let index = KnowledgeIndex::build(&entries);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(7).unwrap().error_code, "NEW");
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let result = parse_knowledge_base("{ not json");
        assert!(matches!(result, Err(KnowledgeError::JsonParse { path: None, .. })));
    }

    #[test]
    fn test_search_matches_code_title_and_keywords() {
        let entries = vec![
            entry(1, "E001", "Spindle overload", &["current"]),
            entry(2, "E002", "Door open", &["interlock"]),
            entry(3, "E003", "Air pressure low", &[]),
        ];
        assert_eq!(search(&entries, "e002").len(), 1);
        assert_eq!(search(&entries, "SPINDLE")[0].id, 1);
        assert_eq!(search(&entries, "interlock")[0].id, 2);
        assert!(search(&entries, "   ").is_empty());
    }

    #[test]
    fn test_lookup_falls_back_to_catch_all_entry() {
        let entries = vec![
            entry(1, "E001", "Spindle overload", &[]),
            entry(constants::FALLBACK_KNOWLEDGE_ID, "E9999", "Unknown Error", &[]),
        ];
        match lookup_or_fallback(&entries, "no such thing") {
            Lookup::Fallback(e) => assert_eq!(e.id, constants::FALLBACK_KNOWLEDGE_ID),
            other => panic!("expected fallback, got {other:?}"),
        }
        assert!(matches!(
            lookup_or_fallback(&entries[..1], "nothing"),
            Lookup::NotFound
        ));
    }
}
