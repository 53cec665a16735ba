// ============================================================
// COLUMN RESOLVER
// ============================================================
// Map raw header strings to a canonical schema:
// case-insensitive exact match first, then aliases in declared order

use std::collections::HashMap;

use crate::domain::error::{AppError, Result};
use crate::domain::schema::{match_key, ColumnSpec};

/// Resolved canonical-field → column-index mapping for one parsed table.
/// Optional fields that did not match are simply absent; downstream reads of
/// those columns yield `None`.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: HashMap<&'static str, usize>,
}

impl ColumnMap {
    pub fn index_of(&self, canonical: &str) -> Option<usize> {
        self.indices.get(canonical).copied()
    }

    /// The cell of `record` holding the given canonical field, if the column
    /// was resolved and the row is long enough.
    pub fn cell<'a>(&self, record: &'a [String], canonical: &str) -> Option<&'a str> {
        self.index_of(canonical)
            .and_then(|idx| record.get(idx))
            .map(String::as_str)
    }
}

/// Resolve every schema column against the detected headers. Matching is
/// case-insensitive but otherwise exact; no substring or fuzzy matching, so
/// unrelated columns are never silently reinterpreted.
pub fn resolve_columns(headers: &[String], schema: &[ColumnSpec]) -> Result<ColumnMap> {
    let keys: Vec<String> = headers.iter().map(|h| match_key(h)).collect();

    let mut indices = HashMap::new();
    for spec in schema {
        let canonical = spec.name.to_lowercase();
        let mut found = keys.iter().position(|k| *k == canonical);
        if found.is_none() {
            for alias in spec.aliases {
                if let Some(idx) = keys.iter().position(|k| k == alias) {
                    found = Some(idx);
                    break;
                }
            }
        }
        match found {
            Some(idx) => {
                indices.insert(spec.name, idx);
            }
            None if spec.required => {
                return Err(AppError::MissingColumn {
                    column: spec.name.to_string(),
                    headers: headers.to_vec(),
                });
            }
            None => {}
        }
    }

    Ok(ColumnMap { indices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::RANKING_COLUMNS;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let map = resolve_columns(&headers(&["KEYWORD", "pos", "Url"]), RANKING_COLUMNS).unwrap();
        assert_eq!(map.index_of("Keyword"), Some(0));
        assert_eq!(map.index_of("Pos"), Some(1));
        assert_eq!(map.index_of("URL"), Some(2));
    }

    #[test]
    fn alias_fallback_in_declared_order() {
        let map = resolve_columns(
            &headers(&["Parola chiave", "Posizione", "Pagina", "Volume di ricerca"]),
            RANKING_COLUMNS,
        )
        .unwrap();
        assert_eq!(map.index_of("Keyword"), Some(0));
        assert_eq!(map.index_of("Pos"), Some(1));
        assert_eq!(map.index_of("URL"), Some(2));
        assert_eq!(map.index_of("Volume"), Some(3));
    }

    #[test]
    fn exact_match_beats_alias() {
        // "URL" matches exactly at index 1 even though "page" (an alias)
        // appears earlier.
        let map =
            resolve_columns(&headers(&["page", "URL", "Keyword", "Pos"]), RANKING_COLUMNS).unwrap();
        assert_eq!(map.index_of("URL"), Some(1));
    }

    #[test]
    fn missing_required_column_names_it_and_lists_headers() {
        let err = resolve_columns(&headers(&["Volume", "URL", "Pos"]), RANKING_COLUMNS).unwrap_err();
        match err {
            AppError::MissingColumn { column, headers } => {
                assert_eq!(column, "Keyword");
                assert_eq!(headers, vec!["Volume", "URL", "Pos"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn optional_columns_resolve_to_absent() {
        let map = resolve_columns(&headers(&["Keyword", "Pos", "URL"]), RANKING_COLUMNS).unwrap();
        assert_eq!(map.index_of("Volume"), None);
        assert_eq!(map.index_of("Intent"), None);
    }

    #[test]
    fn no_fuzzy_matching() {
        // "Keyword Group" is neither the canonical name nor an alias.
        let err = resolve_columns(&headers(&["Keyword Group", "Pos", "URL"]), RANKING_COLUMNS)
            .unwrap_err();
        assert!(matches!(err, AppError::MissingColumn { .. }));
    }
}
