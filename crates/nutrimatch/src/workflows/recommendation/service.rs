use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use super::analysis::{AnalysisConfig, AnalysisEngine, AnalysisOutcome};
use super::analytics::{
    BrandPerformanceReport, InteractionRecord, InteractionRecorder, RecorderError,
};
use super::catalog::{CatalogError, ProductCatalog};
use super::domain::{EvidenceEntry, ProfileId, SupplementCategory, TenantId, UserProfile};
use super::evidence::{EvidenceError, EvidenceStore};
use super::explanation::{self, Explanation, TextGenerator};
use super::profile::{ProfileError, ProfileStore, ProfileUpdate, StoredProfile};
use super::{analytics, profile};

/// Service composing the profile resolver, evidence lookup, catalog
/// snapshot, comparative analysis, explanation rendering, and interaction
/// recording into one request-scoped pipeline.
pub struct RecommendationService<P, E, C, G, L> {
    profiles: Arc<P>,
    evidence: Arc<E>,
    catalog: Arc<C>,
    generator: Arc<G>,
    recorder: Arc<L>,
    engine: AnalysisEngine,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> String {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("sess-{id:06}")
}

/// Inbound recommendation request. Either a stored profile id or an inline
/// profile must be present; the pipeline refuses to run without one.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub query: String,
    #[serde(default)]
    pub user_profile_id: Option<ProfileId>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Everything one pipeline run produced, for responses and audits.
#[derive(Debug, Clone)]
pub struct RecommendationOutcome {
    pub session_id: String,
    pub category: SupplementCategory,
    pub profile: UserProfile,
    pub evidence: Vec<EvidenceEntry>,
    pub analysis: AnalysisOutcome,
    pub explanation: Explanation,
}

impl<P, E, C, G, L> RecommendationService<P, E, C, G, L>
where
    P: ProfileStore + 'static,
    E: EvidenceStore + 'static,
    C: ProductCatalog + 'static,
    G: TextGenerator + 'static,
    L: InteractionRecorder + 'static,
{
    pub fn new(
        profiles: Arc<P>,
        evidence: Arc<E>,
        catalog: Arc<C>,
        generator: Arc<G>,
        recorder: Arc<L>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            profiles,
            evidence,
            catalog,
            generator,
            recorder,
            engine: AnalysisEngine::new(config),
        }
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    /// Run the full pipeline for one tenant-scoped request.
    ///
    /// An empty catalog or a fully filtered-out candidate set is a valid
    /// "no match" outcome, never an error. Interaction recording failures
    /// are logged and do not fail the request.
    pub fn recommend(
        &self,
        tenant_id: TenantId,
        request: RecommendationRequest,
    ) -> Result<RecommendationOutcome, RecommendationServiceError> {
        let session_id = request.session_id.unwrap_or_else(next_session_id);

        let (profile, profile_id) = match request.user_profile_id {
            Some(id) => {
                let stored = self
                    .profiles
                    .fetch(tenant_id, id)?
                    .ok_or(ProfileError::NotFound)?;
                (stored.profile, Some(id))
            }
            None => match request.profile {
                Some(profile) => (profile, None),
                None => return Err(RecommendationServiceError::MissingProfile),
            },
        };

        let category = profile.goal.default_category();
        let evidence = self.evidence.strong_evidence(category)?;
        let products = self.catalog.snapshot(tenant_id, category)?;

        let analysis = self.engine.analyze(
            &products,
            &profile.dietary_restrictions,
            &profile.medical_conditions,
        );

        let explanation = explanation::render(
            &profile,
            &analysis,
            &evidence,
            self.generator.as_ref(),
            self.engine.config().top_n,
        );

        let record = InteractionRecord {
            tenant_id,
            user_profile_id: profile_id,
            session_id: session_id.clone(),
            query_text: Some(request.query),
            recommended_products: analysis.recommended.clone(),
            ranking: analysis.ranking_record.clone(),
            selected_product_id: None,
            satisfaction_score: None,
            recorded_at: Utc::now(),
        };
        if let Err(err) = self.recorder.record(record) {
            warn!(%session_id, "interaction logging failed: {err}");
        }

        Ok(RecommendationOutcome {
            session_id,
            category,
            profile,
            evidence,
            analysis,
            explanation,
        })
    }

    /// Create a stored anamnesis profile for API callers.
    pub fn create_profile(
        &self,
        tenant_id: TenantId,
        profile: UserProfile,
    ) -> Result<StoredProfile, RecommendationServiceError> {
        Ok(self.profiles.create(tenant_id, profile)?)
    }

    /// Fetch a stored profile, surfacing `NotFound` for unknown ids.
    pub fn get_profile(
        &self,
        tenant_id: TenantId,
        id: ProfileId,
    ) -> Result<StoredProfile, RecommendationServiceError> {
        let stored = self
            .profiles
            .fetch(tenant_id, id)?
            .ok_or(ProfileError::NotFound)?;
        Ok(stored)
    }

    /// Apply a partial update to a stored profile.
    pub fn update_profile(
        &self,
        tenant_id: TenantId,
        id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<StoredProfile, RecommendationServiceError> {
        Ok(self.profiles.update(tenant_id, id, update)?)
    }

    /// Aggregate recorded interactions into a brand-performance report.
    pub fn brand_performance(
        &self,
        tenant_id: TenantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<BrandPerformanceReport, RecommendationServiceError> {
        let records = self.recorder.tenant_history(tenant_id, from, to)?;
        let products = self.catalog.tenant_products(tenant_id)?;

        Ok(BrandPerformanceReport {
            tenant_id,
            period_start: from,
            period_end: to,
            total_interactions: records.len(),
            brand_performance: analytics::brand_performance(&records, &products),
        })
    }
}

/// Error raised by the recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationServiceError {
    #[error("no user profile supplied or resolvable for this request")]
    MissingProfile,
    #[error(transparent)]
    Profile(#[from] profile::ProfileError),
    #[error(transparent)]
    Evidence(#[from] EvidenceError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Recorder(#[from] RecorderError),
}
