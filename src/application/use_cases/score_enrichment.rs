// ============================================================
// SCORE ENRICHMENT USE CASE
// ============================================================
// Batch AI scoring with bounded concurrency, cooperative
// cancellation, and untrusted-response sanitization

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::llm_config::LLMConfig;
use crate::domain::scoring::{
    truncate_raw, AiScoreResult, ScoreCard, ScoreFramework, AD_ANGLE_7C, LANDING_PAGE_10M,
};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::shared::cancellation::CancellationToken;

const AD_ANGLE_SYSTEM_PROMPT: &str = "You are an advertising analyst. Score the \
ad angle below on the seven Cs (clarity, conciseness, concreteness, correctness, \
coherence, completeness, courtesy), each 0-10. Reply with a single JSON object \
containing those keys plus total_score, evaluation and detailed_analysis.";

const LANDING_PAGE_SYSTEM_PROMPT: &str = "You are a conversion analyst. Score the \
landing page below on the ten Ms (magnet, message, market_fit, mechanism, \
motivation, momentum, media, measurability, memorability, mobile), each 0-10. \
Reply with a single JSON object containing those keys plus total_score, \
evaluation and detailed_analysis.";

/// One item to score: a label for the result and the text handed to the AI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreInput {
    pub name: String,
    pub content: String,
}

/// A scored item. The card is always fully populated; failures surface as
/// error sentinels inside it, never as missing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredItem {
    pub name: String,
    pub card: ScoreCard,
}

pub struct ScoreEnrichmentUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: EngineConfig,
}

impl ScoreEnrichmentUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: EngineConfig) -> Self {
        Self { llm_client, config }
    }

    /// 7C scoring for ad angles.
    pub async fn score_ad_angles(
        &self,
        llm_config: &LLMConfig,
        items: &[ScoreInput],
        token: &CancellationToken,
    ) -> Vec<ScoredItem> {
        self.score_batch(AD_ANGLE_7C, AD_ANGLE_SYSTEM_PROMPT, llm_config, items, token)
            .await
    }

    /// 10M scoring for landing pages.
    pub async fn score_landing_pages(
        &self,
        llm_config: &LLMConfig,
        items: &[ScoreInput],
        token: &CancellationToken,
    ) -> Vec<ScoredItem> {
        self.score_batch(
            LANDING_PAGE_10M,
            LANDING_PAGE_SYSTEM_PROMPT,
            llm_config,
            items,
            token,
        )
        .await
    }

    /// Run items through the vendor in batches of `ai_concurrency`. The token
    /// is checked between batches: in-flight requests finish, nothing new
    /// starts. One failing item becomes an error card, never a batch abort.
    async fn score_batch(
        &self,
        framework: ScoreFramework,
        system_prompt: &str,
        llm_config: &LLMConfig,
        items: &[ScoreInput],
        token: &CancellationToken,
    ) -> Vec<ScoredItem> {
        let concurrency = self.config.ai_concurrency.max(1);
        let mut results: Vec<ScoredItem> = Vec::with_capacity(items.len());

        for batch in items.chunks(concurrency) {
            if token.is_cancelled() {
                warn!(
                    done = results.len(),
                    total = items.len(),
                    "scoring cancelled between batches"
                );
                break;
            }

            let mut handles = Vec::with_capacity(batch.len());
            for item in batch {
                let client = self.llm_client.clone();
                let llm_config = llm_config.clone();
                let system = system_prompt.to_string();
                let item = item.clone();
                handles.push(tokio::spawn(async move {
                    let outcome = match client.generate(&llm_config, &system, &item.content).await {
                        Ok(text) => interpret_response(&framework, &text),
                        Err(e) => AiScoreResult::ServiceError {
                            message: e.to_string(),
                        },
                    };
                    ScoredItem {
                        name: item.name,
                        card: outcome.into_card(&framework),
                    }
                }));
            }

            for (handle, item) in handles.into_iter().zip(batch) {
                match handle.await {
                    Ok(scored) => results.push(scored),
                    Err(e) => results.push(ScoredItem {
                        name: item.name.clone(),
                        card: framework.error_card(&format!("Worker failed: {}", e)),
                    }),
                }
            }
        }

        results
    }
}

/// Interpret raw vendor text. The payload is unwrapped from proxy envelopes
/// and code fences first; a JSON object then goes through the defaulting
/// pass, anything else is malformed and keeps its (truncated) raw text.
pub(crate) fn interpret_response(framework: &ScoreFramework, raw: &str) -> AiScoreResult {
    let payload = extract_json_payload(raw);
    match serde_json::from_str::<Value>(&payload) {
        Ok(value) if value.is_object() => AiScoreResult::Ok(framework.sanitize(&value)),
        _ => AiScoreResult::Malformed {
            raw: truncate_raw(raw),
        },
    }
}

/// Vendors sometimes return a whole chat-completions envelope or wrap the
/// JSON in a markdown fence; unwrap both before parsing.
fn extract_json_payload(output: &str) -> String {
    let trimmed = output.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(content) = value
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
        {
            return strip_code_fence(content);
        }
        return trimmed.to_string();
    }
    strip_code_fence(trimmed)
}

fn strip_code_fence(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix("```json") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    trimmed.to_string()
}
