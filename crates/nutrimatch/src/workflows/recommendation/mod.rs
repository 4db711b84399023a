//! Supplement recommendation pipeline: anamnesis profiles, evidence lookup,
//! catalog screening, weighted comparative scoring, ranking, explanation
//! rendering, and interaction recording.
//!
//! The analysis core (eligibility, scoring, ranking) is a pure, synchronous
//! computation over in-memory snapshots; everything with I/O lives behind the
//! collaborator traits so the pipeline can be exercised in isolation.

pub mod analysis;
pub mod analytics;
pub mod catalog;
pub mod domain;
pub mod evidence;
pub mod explanation;
pub mod profile;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analysis::{
    AnalysisConfig, AnalysisEngine, AnalysisOutcome, EligibilityCheck, RankingEntry,
    RejectionReason, ScoreBreakdown, ScoredProduct,
};
pub use analytics::{
    brand_performance, BrandPerformance, BrandPerformanceReport, InteractionRecord,
    InteractionRecorder, RecorderError,
};
pub use catalog::{CatalogError, CatalogImportError, CsvCatalogImporter, ProductCatalog};
pub use domain::{
    Biometrics, BudgetRange, DietaryRestriction, DosageGuideline, EvidenceEntry, EvidenceLevel,
    MedicalCondition, NutritionFacts, Product, ProductId, ProfileId, Sex, SupplementCategory,
    TenantId, UserGoal, UserProfile,
};
pub use evidence::{EvidenceError, EvidenceStore};
pub use explanation::{
    Explanation, ExplanationSource, GenerationError, RecommendationPrompt, TextGenerator,
    NO_MATCH_MESSAGE,
};
pub use profile::{ProfileError, ProfileStore, ProfileUpdate, StoredProfile};
pub use router::recommendation_router;
pub use service::{
    RecommendationOutcome, RecommendationRequest, RecommendationService,
    RecommendationServiceError,
};
