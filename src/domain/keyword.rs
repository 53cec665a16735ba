// ============================================================
// KEYWORD DOMAIN TYPES
// ============================================================
// Typed records for ranking exports and the three-way comparison
// No I/O, no async

use serde::{Deserialize, Serialize};

/// One keyword row from a ranking export, keyed by the lowercased keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Join key: lowercased, trimmed, unique within one dataset.
    pub keyword: String,

    /// Ranking position; `None` when the export has no ranking for it.
    pub position: Option<u32>,

    /// Landing URL for the ranking.
    pub url: String,

    /// Monthly search volume.
    pub volume: Option<u64>,

    /// Keyword difficulty score.
    pub difficulty: Option<u32>,

    /// Opportunity score.
    pub opportunity: Option<u32>,

    /// Search intent label (informational, transactional, ...).
    pub intent: String,

    pub traffic_variation: Option<String>,
    pub estimated_traffic: Option<String>,
    pub avg_cpc: Option<String>,
}

impl KeywordRecord {
    /// Create a record with the keyword normalized into its join-key form.
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: normalize_keyword(keyword),
            position: None,
            url: String::new(),
            volume: None,
            difficulty: None,
            opportunity: None,
            intent: String::new(),
            traffic_variation: None,
            estimated_traffic: None,
            avg_cpc: None,
        }
    }
}

/// Lowercased, trimmed join key for keyword lookups.
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Presence classification of a keyword across the primary site and the
/// competitor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeywordStatus {
    /// Present in the primary dataset and in at least one competitor.
    Common,
    /// Present in the primary dataset only.
    PrimaryOnly,
    /// Present in at least one competitor but not in the primary dataset.
    CompetitorOnly,
}

/// Position and URL of a keyword on one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitePresence {
    pub position: Option<u32>,
    pub url: String,
}

/// One competitor's entry for a keyword. `presence` is `None` when that
/// competitor's dataset does not contain the keyword at all, which is
/// distinct from containing it with no ranking position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub name: String,
    pub presence: Option<SitePresence>,
}

/// One keyword of the reconciled union with per-site presence and shared
/// metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub keyword: String,

    /// Primary-site presence; `None` for competitor-only keywords.
    pub primary: Option<SitePresence>,

    /// One entry per competitor dataset, in dataset order.
    pub competitors: Vec<CompetitorEntry>,

    // Shared metrics, sourced from the primary record when present, else the
    // first competitor (in iteration order) that has the keyword. Never merged.
    pub volume: Option<u64>,
    pub difficulty: Option<u32>,
    pub opportunity: Option<u32>,
    pub intent: String,

    pub status: KeywordStatus,
}

impl ComparisonResult {
    /// Status is a pure function of presence: a record exists only for
    /// keywords present somewhere, so PrimaryOnly/CompetitorOnly/Common cover
    /// every case.
    pub fn classify(
        primary: &Option<SitePresence>,
        competitors: &[CompetitorEntry],
    ) -> KeywordStatus {
        let in_primary = primary.is_some();
        let in_competitors = competitors.iter().any(|c| c.presence.is_some());
        match (in_primary, in_competitors) {
            (true, true) => KeywordStatus::Common,
            (true, false) => KeywordStatus::PrimaryOnly,
            _ => KeywordStatus::CompetitorOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_is_normalized_on_creation() {
        let record = KeywordRecord::new("  Best Running SHOES ");
        assert_eq!(record.keyword, "best running shoes");
    }

    #[test]
    fn classify_covers_all_presence_combinations() {
        let here = Some(SitePresence { position: Some(3), url: "https://a".into() });
        let competitor_hit = vec![CompetitorEntry {
            name: "rival".into(),
            presence: Some(SitePresence { position: None, url: String::new() }),
        }];
        let competitor_miss = vec![CompetitorEntry { name: "rival".into(), presence: None }];

        assert_eq!(
            ComparisonResult::classify(&here, &competitor_hit),
            KeywordStatus::Common
        );
        assert_eq!(
            ComparisonResult::classify(&here, &competitor_miss),
            KeywordStatus::PrimaryOnly
        );
        assert_eq!(
            ComparisonResult::classify(&None, &competitor_hit),
            KeywordStatus::CompetitorOnly
        );
    }

    #[test]
    fn presence_without_position_still_counts() {
        // A competitor can list the keyword with no ranking position; that is
        // presence, not absence.
        let competitors = vec![CompetitorEntry {
            name: "rival".into(),
            presence: Some(SitePresence { position: None, url: "https://r".into() }),
        }];
        assert_eq!(
            ComparisonResult::classify(&None, &competitors),
            KeywordStatus::CompetitorOnly
        );
    }
}
