// ============================================================
// SCORING DOMAIN TYPES
// ============================================================
// Score frameworks for AI evaluations and the defaulting rules
// applied to untrusted vendor responses

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for text the AI response failed to provide.
pub const NOT_AVAILABLE: &str = "Non disponibile";

/// Evaluation sentinel carried by error result records.
pub const ERROR_EVALUATION: &str = "Errore durante la valutazione";

/// Raw vendor text kept on malformed responses is capped at this many chars.
const RAW_TEXT_CAP: usize = 500;

/// A scoring framework: the named numeric criteria the vendor JSON must carry.
#[derive(Debug, Clone, Copy)]
pub struct ScoreFramework {
    pub name: &'static str,
    pub criteria: &'static [&'static str],
    pub max_per_criterion: f64,
}

/// Seven Cs ad-angle scoring.
pub const AD_ANGLE_7C: ScoreFramework = ScoreFramework {
    name: "7C",
    criteria: &[
        "clarity",
        "conciseness",
        "concreteness",
        "correctness",
        "coherence",
        "completeness",
        "courtesy",
    ],
    max_per_criterion: 10.0,
};

/// Ten Ms landing-page scoring.
pub const LANDING_PAGE_10M: ScoreFramework = ScoreFramework {
    name: "10M",
    criteria: &[
        "magnet",
        "message",
        "market_fit",
        "mechanism",
        "motivation",
        "momentum",
        "media",
        "measurability",
        "memorability",
        "mobile",
    ],
    max_per_criterion: 10.0,
};

/// One scored criterion with the vendor's rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionScore {
    pub key: String,
    pub score: f64,
    pub rationale: String,
}

/// A fully-defaulted score record. Every numeric field is a real number and
/// every text field is populated, regardless of what the vendor returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCard {
    pub framework: String,
    pub criteria: Vec<CriterionScore>,
    pub total_score: f64,
    pub evaluation: String,
    pub detailed_analysis: String,
}

/// Outcome of interpreting one AI scoring response.
#[derive(Debug, Clone)]
pub enum AiScoreResult {
    Ok(ScoreCard),
    /// The response was not parseable JSON; carries the (truncated) raw text.
    Malformed { raw: String },
    /// The call itself failed (network, quota, vendor error).
    ServiceError { message: String },
}

impl ScoreFramework {
    pub fn max_total(&self) -> f64 {
        self.max_per_criterion * self.criteria.len() as f64
    }

    /// Defaulting pass over a parsed JSON response. Criteria may come as bare
    /// numbers or as `{score, rationale}` objects; anything missing or
    /// non-numeric becomes 0. The total and the qualitative bucket are
    /// recomputed locally whenever the vendor omitted them, so the record is
    /// internally consistent even from a partial response.
    pub fn sanitize(&self, value: &Value) -> ScoreCard {
        let mut criteria = Vec::with_capacity(self.criteria.len());
        for key in self.criteria {
            let entry = value.get(key);
            let score = match entry {
                Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(Value::Object(_)) => entry
                    .and_then(|e| e.get("score"))
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
                Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
                _ => 0.0,
            };
            let rationale = entry
                .and_then(|e| e.get("rationale"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            criteria.push(CriterionScore {
                key: (*key).to_string(),
                score,
                rationale,
            });
        }

        let computed_total: f64 = criteria.iter().map(|c| c.score).sum();
        let total_score = get_f64(value, &["total_score", "totalScore"]).unwrap_or(computed_total);

        let evaluation = get_str(value, &["evaluation", "valutazione"])
            .unwrap_or_else(|| evaluation_bucket(total_score, self.max_total()).to_string());

        let detailed_analysis = get_str(value, &["detailed_analysis", "detailedAnalysis"])
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        ScoreCard {
            framework: self.name.to_string(),
            criteria,
            total_score,
            evaluation,
            detailed_analysis,
        }
    }

    /// An all-zero card carrying the error text, so one failing item renders
    /// like any other record instead of aborting its batch.
    pub fn error_card(&self, detail: &str) -> ScoreCard {
        ScoreCard {
            framework: self.name.to_string(),
            criteria: self
                .criteria
                .iter()
                .map(|key| CriterionScore {
                    key: (*key).to_string(),
                    score: 0.0,
                    rationale: NOT_AVAILABLE.to_string(),
                })
                .collect(),
            total_score: 0.0,
            evaluation: ERROR_EVALUATION.to_string(),
            detailed_analysis: detail.to_string(),
        }
    }
}

impl AiScoreResult {
    /// Collapse into a renderable card; non-Ok variants become error cards.
    pub fn into_card(self, framework: &ScoreFramework) -> ScoreCard {
        match self {
            AiScoreResult::Ok(card) => card,
            AiScoreResult::Malformed { raw } => {
                framework.error_card(&format!("Risposta non valida: {}", raw))
            }
            AiScoreResult::ServiceError { message } => framework.error_card(&message),
        }
    }
}

/// Qualitative bucket for a total score, recomputed locally when the vendor
/// omits it.
pub fn evaluation_bucket(total: f64, max_total: f64) -> &'static str {
    if max_total <= 0.0 {
        return "Debole";
    }
    let ratio = total / max_total;
    if ratio >= 0.8 {
        "Eccellente"
    } else if ratio >= 0.6 {
        "Buono"
    } else if ratio >= 0.4 {
        "Sufficiente"
    } else {
        "Debole"
    }
}

/// Cap raw vendor text kept for diagnosis.
pub fn truncate_raw(raw: &str) -> String {
    if raw.chars().count() <= RAW_TEXT_CAP {
        raw.to_string()
    } else {
        let mut out: String = raw.chars().take(RAW_TEXT_CAP).collect();
        out.push('…');
        out
    }
}

fn get_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| value.get(k).and_then(Value::as_f64))
}

fn get_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| value.get(k).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_defaults_missing_criteria_to_zero() {
        let card = AD_ANGLE_7C.sanitize(&json!({"clarity": 8, "coherence": 6}));
        assert_eq!(card.criteria.len(), 7);
        let clarity = card.criteria.iter().find(|c| c.key == "clarity").unwrap();
        assert_eq!(clarity.score, 8.0);
        let courtesy = card.criteria.iter().find(|c| c.key == "courtesy").unwrap();
        assert_eq!(courtesy.score, 0.0);
        assert_eq!(courtesy.rationale, NOT_AVAILABLE);
    }

    #[test]
    fn total_is_recomputed_when_missing() {
        let card = AD_ANGLE_7C.sanitize(&json!({"clarity": 8, "coherence": 6}));
        assert_eq!(card.total_score, 14.0);
    }

    #[test]
    fn vendor_total_wins_when_present() {
        let card = AD_ANGLE_7C.sanitize(&json!({"clarity": 8, "total_score": 50}));
        assert_eq!(card.total_score, 50.0);
    }

    #[test]
    fn criterion_objects_and_strings_are_accepted() {
        let card = AD_ANGLE_7C.sanitize(&json!({
            "clarity": {"score": 7, "rationale": "plain language"},
            "coherence": "5",
        }));
        let clarity = card.criteria.iter().find(|c| c.key == "clarity").unwrap();
        assert_eq!(clarity.score, 7.0);
        assert_eq!(clarity.rationale, "plain language");
        let coherence = card.criteria.iter().find(|c| c.key == "coherence").unwrap();
        assert_eq!(coherence.score, 5.0);
    }

    #[test]
    fn evaluation_bucket_boundaries() {
        assert_eq!(evaluation_bucket(56.0, 70.0), "Eccellente");
        assert_eq!(evaluation_bucket(42.0, 70.0), "Buono");
        assert_eq!(evaluation_bucket(28.0, 70.0), "Sufficiente");
        assert_eq!(evaluation_bucket(10.0, 70.0), "Debole");
    }

    #[test]
    fn error_card_carries_sentinels() {
        let card = LANDING_PAGE_10M.error_card("timeout");
        assert_eq!(card.total_score, 0.0);
        assert_eq!(card.evaluation, ERROR_EVALUATION);
        assert_eq!(card.detailed_analysis, "timeout");
        assert_eq!(card.criteria.len(), 10);
    }

    #[test]
    fn truncate_raw_caps_long_text() {
        let long = "x".repeat(2000);
        let capped = truncate_raw(&long);
        assert!(capped.chars().count() <= 501);
        assert!(capped.ends_with('…'));
    }
}
