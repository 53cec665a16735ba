// ============================================================
// CORE KEYWORD SELECTION
// ============================================================
// The top-N list handed to the keyword-analysis tool

use std::collections::HashSet;

use crate::domain::keyword::KeywordRecord;

/// Number of first-page ranking slots filled before volume takes over.
const RANKED_SLOTS: usize = 5;

/// Select the "core keywords" of a site from its ranking records.
///
/// Priority order, which callers rely on and must not change:
/// 1. keywords ranking in the top 10, by ascending position, up to 5;
/// 2. fill to `limit` with the highest-volume remaining keywords (volume > 0);
/// 3. if still fewer than 5 were found, pad with remaining keywords in their
///    original order.
pub fn select_core_keywords(records: &[KeywordRecord], limit: usize) -> Vec<KeywordRecord> {
    let mut chosen: Vec<usize> = Vec::new();
    let mut used: HashSet<usize> = HashSet::new();

    let mut ranked: Vec<(usize, u32)> = records
        .iter()
        .enumerate()
        .filter_map(|(idx, r)| r.position.filter(|p| *p <= 10).map(|p| (idx, p)))
        .collect();
    // Stable sort: equal positions keep their original order.
    ranked.sort_by_key(|(_, position)| *position);
    for (idx, _) in ranked.into_iter().take(RANKED_SLOTS.min(limit)) {
        used.insert(idx);
        chosen.push(idx);
    }

    let mut by_volume: Vec<(usize, u64)> = records
        .iter()
        .enumerate()
        .filter(|(idx, _)| !used.contains(idx))
        .filter_map(|(idx, r)| r.volume.filter(|v| *v > 0).map(|v| (idx, v)))
        .collect();
    by_volume.sort_by(|a, b| b.1.cmp(&a.1));
    for (idx, _) in by_volume {
        if chosen.len() >= limit {
            break;
        }
        used.insert(idx);
        chosen.push(idx);
    }

    if chosen.len() < RANKED_SLOTS {
        for idx in 0..records.len() {
            if chosen.len() >= RANKED_SLOTS.min(limit) {
                break;
            }
            if used.insert(idx) {
                chosen.push(idx);
            }
        }
    }

    chosen.into_iter().map(|idx| records[idx].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(keyword: &str, position: Option<u32>, volume: Option<u64>) -> KeywordRecord {
        let mut r = KeywordRecord::new(keyword);
        r.position = position;
        r.volume = volume;
        r
    }

    #[test]
    fn position_ranked_come_before_volume_fills() {
        let records = vec![
            record("c", None, Some(1000)),
            record("a", Some(2), None),
            record("d", None, Some(50)),
            record("b", Some(5), None),
        ];
        let core = select_core_keywords(&records, 10);
        let keywords: Vec<&str> = core.iter().map(|r| r.keyword.as_str()).collect();
        // A and B by ascending position, then C before D by descending volume.
        assert_eq!(keywords, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn only_top_ten_positions_qualify_for_ranked_slots() {
        let records = vec![
            record("page-two", Some(14), Some(10)),
            record("page-one", Some(8), None),
        ];
        let core = select_core_keywords(&records, 10);
        assert_eq!(core[0].keyword, "page-one");
        // page-two still enters through the volume fill.
        assert_eq!(core[1].keyword, "page-two");
    }

    #[test]
    fn ranked_slots_cap_at_five() {
        let records: Vec<KeywordRecord> = (1..=8)
            .map(|p| record(&format!("kw{}", p), Some(p), Some(10)))
            .collect();
        let core = select_core_keywords(&records, 10);
        // First five by position, the rest come from the volume fill.
        assert_eq!(core.len(), 8);
        let first_five: Vec<&str> = core[..5].iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(first_five, vec!["kw1", "kw2", "kw3", "kw4", "kw5"]);
    }

    #[test]
    fn limit_caps_the_volume_fill() {
        let records: Vec<KeywordRecord> = (0..30)
            .map(|i| record(&format!("kw{}", i), None, Some(1000 - i as u64)))
            .collect();
        let core = select_core_keywords(&records, 10);
        assert_eq!(core.len(), 10);
    }

    #[test]
    fn padding_applies_when_nothing_ranks_or_has_volume() {
        let records = vec![
            record("one", None, None),
            record("two", None, Some(0)),
            record("three", None, None),
        ];
        let core = select_core_keywords(&records, 10);
        let keywords: Vec<&str> = core.iter().map(|r| r.keyword.as_str()).collect();
        // Original order, capped at the ranked-slot minimum of five.
        assert_eq!(keywords, vec!["one", "two", "three"]);
    }
}
