// ============================================================
// CROSS-TOOL HANDOFF
// ============================================================
// In-process result store keyed by a generated data id, plus the
// core-keyword slot the analysis tool imports from

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::keyword::{ComparisonResult, KeywordRecord};

/// The last published comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredComparison {
    pub data_id: String,
    pub stored_at: DateTime<Utc>,
    pub competitor_names: Vec<String>,
    pub results: Vec<ComparisonResult>,
}

/// Request for a comparison result set, correlated by request id and
/// identifying the asking tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffRequest {
    pub request_id: String,
    pub requester_id: String,
    pub data_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HandoffResponse {
    Found {
        request_id: String,
        data: StoredComparison,
    },
    NotFound {
        request_id: String,
        data_id: String,
    },
}

/// Core keywords exported by the comparison tool for import elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreKeywordHandoff {
    pub source_tool: String,
    pub stored_at: DateTime<Utc>,
    pub keywords: Vec<KeywordRecord>,
}

#[derive(Default)]
struct StoreInner {
    comparisons: HashMap<String, StoredComparison>,
    core_keywords: Option<CoreKeywordHandoff>,
}

/// Shared in-process store. A new publish discards prior comparison runs:
/// results live only for the session, and the newest run is the one that
/// matters.
#[derive(Clone, Default)]
pub struct ResultStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a comparison run and return its generated data id.
    pub fn publish_comparison(
        &self,
        competitor_names: Vec<String>,
        results: Vec<ComparisonResult>,
    ) -> String {
        let data_id = Uuid::new_v4().to_string();
        let stored = StoredComparison {
            data_id: data_id.clone(),
            stored_at: Utc::now(),
            competitor_names,
            results,
        };
        let mut inner = self.inner.lock().unwrap();
        inner.comparisons.clear();
        inner.comparisons.insert(data_id.clone(), stored);
        debug!(%data_id, "comparison results published");
        data_id
    }

    /// Answer a handoff request. Unknown ids (including ids from discarded
    /// runs) get a NotFound response echoing the request id.
    pub fn request(&self, request: &HandoffRequest) -> HandoffResponse {
        let inner = self.inner.lock().unwrap();
        match inner.comparisons.get(&request.data_id) {
            Some(stored) => HandoffResponse::Found {
                request_id: request.request_id.clone(),
                data: stored.clone(),
            },
            None => HandoffResponse::NotFound {
                request_id: request.request_id.clone(),
                data_id: request.data_id.clone(),
            },
        }
    }

    pub fn put_core_keywords(&self, source_tool: &str, keywords: Vec<KeywordRecord>) {
        let mut inner = self.inner.lock().unwrap();
        inner.core_keywords = Some(CoreKeywordHandoff {
            source_tool: source_tool.to_string(),
            stored_at: Utc::now(),
            keywords,
        });
    }

    /// Read and clear the core-keyword slot; importing consumes it.
    pub fn take_core_keywords(&self) -> Option<CoreKeywordHandoff> {
        self.inner.lock().unwrap().core_keywords.take()
    }
}
