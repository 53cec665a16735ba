pub mod use_cases;

pub use use_cases::gsc_analysis::GscAnalysisUseCase;
pub use use_cases::keyword_comparison::KeywordComparisonUseCase;
pub use use_cases::score_enrichment::ScoreEnrichmentUseCase;
