pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use crate::application::use_cases::core_keywords::select_core_keywords;
pub use crate::application::use_cases::gsc_analysis::GscAnalysisUseCase;
pub use crate::application::use_cases::keyword_comparison::{
    CompetitorDataset, KeywordComparisonUseCase,
};
pub use crate::application::use_cases::score_enrichment::{
    ScoreEnrichmentUseCase, ScoreInput, ScoredItem,
};
pub use crate::domain::error::{AppError, Result};
pub use crate::domain::gsc::{GscAnalyzedItem, GscReportType, GscSectionAnalysis, GscSheetRow};
pub use crate::domain::keyword::{ComparisonResult, KeywordRecord, KeywordStatus};
pub use crate::domain::llm_config::{LLMConfig, LLMProvider};
pub use crate::domain::scoring::{AiScoreResult, ScoreCard};
pub use crate::infrastructure::config::EngineConfig;
pub use crate::infrastructure::csv::keyword_import::{KeywordCsvImporter, ToolProfile};
pub use crate::infrastructure::export::csv_export::comparison_to_csv;
pub use crate::infrastructure::export::xlsx_export::write_comparison_workbook;
pub use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
pub use crate::infrastructure::xlsx::GscWorkbook;
pub use crate::interfaces::handoff::ResultStore;
pub use crate::shared::cancellation::CancellationToken;
