// ============================================================
// ENGINE CONFIGURATION
// ============================================================
// Tunables for chunked processing and AI batching; loaded from an
// optional TOML file with RANKSCOPE_-prefixed env overrides

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Keywords reconciled per chunk before yielding (default: 500).
    /// Purely a responsiveness knob: the output never depends on it.
    pub chunk_size: usize,

    /// Concurrent in-flight AI scoring requests (default: 3).
    pub ai_concurrency: usize,

    /// Timeout for one AI request, in seconds.
    pub request_timeout_secs: u64,

    /// Bars in the top-items chart projection (default: 5).
    pub chart_top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            ai_concurrency: 3,
            request_timeout_secs: 120,
            chart_top_n: 5,
        }
    }
}

impl EngineConfig {
    /// Defaults, then `rankscope.toml` if present, then environment.
    pub fn load() -> Result<Self> {
        let config: EngineConfig = Figment::from(Serialized::defaults(EngineConfig::default()))
            .merge(Toml::file("rankscope.toml"))
            .merge(Env::prefixed("RANKSCOPE_"))
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid engine config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(AppError::ValidationError(
                "chunk_size must be > 0".to_string(),
            ));
        }
        if self.ai_concurrency == 0 {
            return Err(AppError::ValidationError(
                "ai_concurrency must be > 0".to_string(),
            ));
        }
        if self.chart_top_n == 0 {
            return Err(AppError::ValidationError(
                "chart_top_n must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let config = EngineConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
