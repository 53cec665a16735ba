// ============================================================
// KEYWORD COMPARISON USE CASE
// ============================================================
// Three-way reconciliation of a primary dataset against N
// competitor datasets, chunked to keep a host UI responsive

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::domain::keyword::{
    normalize_keyword, ComparisonResult, CompetitorEntry, KeywordRecord, SitePresence,
};
use crate::infrastructure::config::EngineConfig;
use crate::shared::cancellation::CancellationToken;

/// One competitor's ranking export. Dataset order is meaningful: it decides
/// which competitor sources shared metrics when the primary lacks a keyword.
#[derive(Debug, Clone)]
pub struct CompetitorDataset {
    pub name: String,
    pub records: Vec<KeywordRecord>,
}

pub struct KeywordComparisonUseCase {
    config: EngineConfig,
}

impl KeywordComparisonUseCase {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Classify every keyword seen anywhere into common / primary-only /
    /// competitor-only and attach shared metrics. Work proceeds in chunks
    /// with a yield in between; chunking never changes the output.
    pub async fn reconcile(
        &self,
        primary: &[KeywordRecord],
        competitors: &[CompetitorDataset],
        token: &CancellationToken,
    ) -> Vec<ComparisonResult> {
        let primary_index = index_records(primary);
        let competitor_indexes: Vec<(&str, HashMap<String, &KeywordRecord>)> = competitors
            .iter()
            .map(|dataset| (dataset.name.as_str(), index_records(&dataset.records)))
            .collect();

        // Union of all keywords, first-seen order: primary first, then each
        // competitor dataset in order.
        let mut union: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for record in primary {
            let key = normalize_keyword(&record.keyword);
            if seen.insert(key.clone()) {
                union.push(key);
            }
        }
        for dataset in competitors {
            for record in &dataset.records {
                let key = normalize_keyword(&record.keyword);
                if seen.insert(key.clone()) {
                    union.push(key);
                }
            }
        }

        let chunk_size = self.config.chunk_size.max(1);
        let mut results: Vec<ComparisonResult> = Vec::with_capacity(union.len());

        for chunk in union.chunks(chunk_size) {
            if token.is_cancelled() {
                warn!(
                    done = results.len(),
                    total = union.len(),
                    "reconciliation cancelled"
                );
                break;
            }

            for keyword in chunk {
                let primary_presence = primary_index.get(keyword).map(|record| SitePresence {
                    position: record.position,
                    url: record.url.clone(),
                });

                let competitor_entries: Vec<CompetitorEntry> = competitor_indexes
                    .iter()
                    .map(|(name, index)| CompetitorEntry {
                        name: (*name).to_string(),
                        presence: index.get(keyword).map(|record| SitePresence {
                            position: record.position,
                            url: record.url.clone(),
                        }),
                    })
                    .collect();

                // Metrics come from the primary record when it exists, else
                // from the first competitor (dataset order) holding the
                // keyword. Never merged or averaged across sources.
                let metrics_source: Option<&KeywordRecord> =
                    primary_index.get(keyword).copied().or_else(|| {
                        competitor_indexes
                            .iter()
                            .find_map(|(_, index)| index.get(keyword).copied())
                    });

                let status = ComparisonResult::classify(&primary_presence, &competitor_entries);
                results.push(ComparisonResult {
                    keyword: keyword.clone(),
                    primary: primary_presence,
                    competitors: competitor_entries,
                    volume: metrics_source.and_then(|r| r.volume),
                    difficulty: metrics_source.and_then(|r| r.difficulty),
                    opportunity: metrics_source.and_then(|r| r.opportunity),
                    intent: metrics_source.map(|r| r.intent.clone()).unwrap_or_default(),
                    status,
                });
            }

            tokio::task::yield_now().await;
        }

        info!(results = results.len(), "reconciliation complete");
        results
    }
}

/// Index a dataset by normalized keyword; a duplicated keyword keeps the last
/// record, matching import behavior.
fn index_records(records: &[KeywordRecord]) -> HashMap<String, &KeywordRecord> {
    records
        .iter()
        .map(|record| (normalize_keyword(&record.keyword), record))
        .collect()
}
