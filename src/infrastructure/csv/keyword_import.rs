// ============================================================
// KEYWORD CSV IMPORT
// ============================================================
// Typed KeywordRecord extraction from ranking/analysis exports

use std::collections::HashMap;

use tracing::debug;

use crate::domain::error::Result;
use crate::domain::keyword::{normalize_keyword, KeywordRecord};
use crate::domain::schema::{ColumnSpec, ANALYSIS_COLUMNS, RANKING_COLUMNS};
use crate::infrastructure::csv::{reader, resolver};

/// Which tool the file is being imported for; decides the required columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolProfile {
    /// Ranking comparison: needs Keyword, Pos and URL.
    RankingComparison,
    /// Keyword analysis: needs only Keyword.
    KeywordAnalysis,
}

impl ToolProfile {
    fn schema(&self) -> &'static [ColumnSpec] {
        match self {
            ToolProfile::RankingComparison => RANKING_COLUMNS,
            ToolProfile::KeywordAnalysis => ANALYSIS_COLUMNS,
        }
    }
}

/// CSV importer producing keyword records keyed by the normalized keyword.
pub struct KeywordCsvImporter {
    profile: ToolProfile,
}

impl KeywordCsvImporter {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }

    /// Import raw upload bytes.
    pub fn import_bytes(&self, raw: &[u8]) -> Result<Vec<KeywordRecord>> {
        self.import(&reader::decode_bytes(raw))
    }

    /// Import CSV text. Rows without a keyword are dropped silently; numeric
    /// cells degrade to `None` instead of failing the file. A duplicate
    /// keyword keeps its original position in the output but takes the values
    /// of the last row that carried it.
    pub fn import(&self, text: &str) -> Result<Vec<KeywordRecord>> {
        let table = reader::read_table(text)?;
        let columns = resolver::resolve_columns(&table.headers, self.profile.schema())?;

        let mut records: Vec<KeywordRecord> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut dropped = 0usize;

        for row in &table.records {
            let keyword = columns
                .cell(row, "Keyword")
                .map(normalize_keyword)
                .unwrap_or_default();
            if keyword.is_empty() {
                dropped += 1;
                continue;
            }

            let mut record = KeywordRecord::new(&keyword);
            record.position = columns.cell(row, "Pos").and_then(parse_u32);
            record.url = columns.cell(row, "URL").unwrap_or("").to_string();
            record.volume = columns.cell(row, "Volume").and_then(parse_u64);
            record.difficulty = columns.cell(row, "Difficulty").and_then(parse_u32);
            record.opportunity = columns.cell(row, "Opportunity").and_then(parse_u32);
            record.intent = columns.cell(row, "Intent").unwrap_or("").to_string();
            record.traffic_variation = non_empty(columns.cell(row, "Traffic Variation"));
            record.estimated_traffic = non_empty(columns.cell(row, "Estimated Traffic"));
            record.avg_cpc = non_empty(columns.cell(row, "Avg CPC"));

            match seen.get(&keyword) {
                Some(&idx) => records[idx] = record,
                None => {
                    seen.insert(keyword, records.len());
                    records.push(record);
                }
            }
        }

        if dropped > 0 {
            debug!(dropped, "dropped rows without a keyword");
        }

        Ok(records)
    }
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Permissive integer parse: plain integer first, then with thousands commas
/// removed, then a rounded float. Anything else is `None`, never an error.
fn parse_u64(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<u64>() {
        return Some(v);
    }
    let compact = trimmed.replace(',', "");
    if let Ok(v) = compact.parse::<u64>() {
        return Some(v);
    }
    compact
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f.round() as u64)
}

fn parse_u32(raw: &str) -> Option<u32> {
    parse_u64(raw).and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;

    #[test]
    fn imports_semicolon_delimited_italian_export() {
        let text = "Parola chiave;Posizione;Pagina;Volume di ricerca\n\
                    Scarpe Running;3;https://example.it/scarpe;1200\n\
                    zaini;12;https://example.it/zaini;480";
        let importer = KeywordCsvImporter::new(ToolProfile::RankingComparison);
        let records = importer.import(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].keyword, "scarpe running");
        assert_eq!(records[0].position, Some(3));
        assert_eq!(records[0].url, "https://example.it/scarpe");
        assert_eq!(records[0].volume, Some(1200));
    }

    #[test]
    fn missing_keyword_column_fails_with_detected_headers() {
        let importer = KeywordCsvImporter::new(ToolProfile::RankingComparison);
        let err = importer.import("Volume,URL\n100,https://a").unwrap_err();
        match err {
            AppError::MissingColumn { column, headers } => {
                assert_eq!(column, "Keyword");
                assert!(headers.contains(&"Volume".to_string()));
                assert!(headers.contains(&"URL".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rows_without_keyword_are_dropped_silently() {
        let text = "Keyword,Pos,URL\n,1,https://a\nshoes,2,https://b\n  ,3,https://c";
        let importer = KeywordCsvImporter::new(ToolProfile::RankingComparison);
        let records = importer.import(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].keyword, "shoes");
    }

    #[test]
    fn unparsable_numbers_become_none() {
        let text = "Keyword,Pos,URL,Volume\nshoes,n/a,https://a,not-a-number";
        let importer = KeywordCsvImporter::new(ToolProfile::RankingComparison);
        let records = importer.import(text).unwrap();
        assert_eq!(records[0].position, None);
        assert_eq!(records[0].volume, None);
    }

    #[test]
    fn thousands_separators_are_tolerated() {
        assert_eq!(parse_u64("1,200"), Some(1200));
        assert_eq!(parse_u64(" 88 "), Some(88));
        assert_eq!(parse_u64(""), None);
    }

    #[test]
    fn duplicate_keywords_last_write_wins() {
        let text = "Keyword,Pos,URL\nshoes,5,https://old\nshoes,2,https://new";
        let importer = KeywordCsvImporter::new(ToolProfile::RankingComparison);
        let records = importer.import(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].position, Some(2));
        assert_eq!(records[0].url, "https://new");
    }

    #[test]
    fn analysis_profile_needs_only_the_keyword_column() {
        let importer = KeywordCsvImporter::new(ToolProfile::KeywordAnalysis);
        let records = importer.import("Keyword\nshoes\nboots").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].keyword, "boots");
        assert_eq!(records[1].position, None);
    }
}
