use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::analysis::{EligibilityCheck, RankingEntry, ScoredProduct};
use super::analytics::InteractionRecorder;
use super::catalog::ProductCatalog;
use super::domain::{ProductId, ProfileId, SupplementCategory, TenantId, UserProfile};
use super::evidence::EvidenceStore;
use super::explanation::{ExplanationSource, TextGenerator};
use super::profile::{ProfileError, ProfileStore, ProfileUpdate};
use super::service::{
    RecommendationRequest, RecommendationService, RecommendationServiceError,
};

const TENANT_HEADER: &str = "x-tenant-id";

/// Router builder exposing the recommendation pipeline over HTTP.
pub fn recommendation_router<P, E, C, G, L>(
    service: Arc<RecommendationService<P, E, C, G, L>>,
) -> Router
where
    P: ProfileStore + 'static,
    E: EvidenceStore + 'static,
    C: ProductCatalog + 'static,
    G: TextGenerator + 'static,
    L: InteractionRecorder + 'static,
{
    Router::new()
        .route(
            "/api/v1/recommendations",
            post(recommend_handler::<P, E, C, G, L>),
        )
        .route(
            "/api/v1/profiles",
            post(create_profile_handler::<P, E, C, G, L>),
        )
        .route(
            "/api/v1/profiles/:profile_id",
            get(get_profile_handler::<P, E, C, G, L>)
                .put(update_profile_handler::<P, E, C, G, L>),
        )
        .route(
            "/api/v1/analytics/brand-performance",
            get(brand_performance_handler::<P, E, C, G, L>),
        )
        .with_state(service)
}

/// Tenant scoping is explicit per request; requests without the header are
/// refused instead of falling back to any ambient tenant.
fn tenant_from_headers(headers: &HeaderMap) -> Result<TenantId, Response> {
    headers
        .get(TENANT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(TenantId)
        .ok_or_else(|| {
            let payload = json!({
                "error": "X-Tenant-ID header is required",
            });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        })
}

#[derive(Debug, Serialize)]
struct EligibilityView {
    product_id: ProductId,
    eligible: bool,
    rejections: Vec<&'static str>,
}

impl EligibilityView {
    fn from_check(check: &EligibilityCheck) -> Self {
        Self {
            product_id: check.product_id,
            eligible: check.eligible,
            rejections: check
                .rejections
                .iter()
                .map(|reason| reason.summary())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RecommendationResponse {
    session_id: String,
    category: SupplementCategory,
    response: String,
    explanation_source: ExplanationSource,
    recommended_product_ids: Vec<ProductId>,
    ranked_products: Vec<ScoredProduct>,
    eligibility: Vec<EligibilityView>,
    ranking_data: BTreeMap<ProductId, RankingEntry>,
}

pub(crate) async fn recommend_handler<P, E, C, G, L>(
    State(service): State<Arc<RecommendationService<P, E, C, G, L>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<RecommendationRequest>,
) -> Response
where
    P: ProfileStore + 'static,
    E: EvidenceStore + 'static,
    C: ProductCatalog + 'static,
    G: TextGenerator + 'static,
    L: InteractionRecorder + 'static,
{
    let tenant_id = match tenant_from_headers(&headers) {
        Ok(tenant_id) => tenant_id,
        Err(response) => return response,
    };

    match service.recommend(tenant_id, request) {
        Ok(outcome) => {
            let body = RecommendationResponse {
                session_id: outcome.session_id,
                category: outcome.category,
                response: outcome.explanation.text,
                explanation_source: outcome.explanation.source,
                recommended_product_ids: outcome.analysis.recommended,
                ranked_products: outcome.analysis.ranked,
                eligibility: outcome
                    .analysis
                    .eligibility
                    .iter()
                    .map(EligibilityView::from_check)
                    .collect(),
                ranking_data: outcome.analysis.ranking_record,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn create_profile_handler<P, E, C, G, L>(
    State(service): State<Arc<RecommendationService<P, E, C, G, L>>>,
    headers: HeaderMap,
    axum::Json(profile): axum::Json<UserProfile>,
) -> Response
where
    P: ProfileStore + 'static,
    E: EvidenceStore + 'static,
    C: ProductCatalog + 'static,
    G: TextGenerator + 'static,
    L: InteractionRecorder + 'static,
{
    let tenant_id = match tenant_from_headers(&headers) {
        Ok(tenant_id) => tenant_id,
        Err(response) => return response,
    };

    match service.create_profile(tenant_id, profile) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn get_profile_handler<P, E, C, G, L>(
    State(service): State<Arc<RecommendationService<P, E, C, G, L>>>,
    headers: HeaderMap,
    Path(profile_id): Path<u64>,
) -> Response
where
    P: ProfileStore + 'static,
    E: EvidenceStore + 'static,
    C: ProductCatalog + 'static,
    G: TextGenerator + 'static,
    L: InteractionRecorder + 'static,
{
    let tenant_id = match tenant_from_headers(&headers) {
        Ok(tenant_id) => tenant_id,
        Err(response) => return response,
    };

    match service.get_profile(tenant_id, ProfileId(profile_id)) {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn update_profile_handler<P, E, C, G, L>(
    State(service): State<Arc<RecommendationService<P, E, C, G, L>>>,
    headers: HeaderMap,
    Path(profile_id): Path<u64>,
    axum::Json(update): axum::Json<ProfileUpdate>,
) -> Response
where
    P: ProfileStore + 'static,
    E: EvidenceStore + 'static,
    C: ProductCatalog + 'static,
    G: TextGenerator + 'static,
    L: InteractionRecorder + 'static,
{
    let tenant_id = match tenant_from_headers(&headers) {
        Ok(tenant_id) => tenant_id,
        Err(response) => return response,
    };

    match service.update_profile(tenant_id, ProfileId(profile_id), update) {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(error) => service_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BrandPerformanceQuery {
    #[serde(default)]
    days: Option<i64>,
}

pub(crate) async fn brand_performance_handler<P, E, C, G, L>(
    State(service): State<Arc<RecommendationService<P, E, C, G, L>>>,
    headers: HeaderMap,
    Query(query): Query<BrandPerformanceQuery>,
) -> Response
where
    P: ProfileStore + 'static,
    E: EvidenceStore + 'static,
    C: ProductCatalog + 'static,
    G: TextGenerator + 'static,
    L: InteractionRecorder + 'static,
{
    let tenant_id = match tenant_from_headers(&headers) {
        Ok(tenant_id) => tenant_id,
        Err(response) => return response,
    };

    let days = query.days.unwrap_or(30).clamp(1, 365);
    let period_end = Utc::now();
    let period_start = period_end - Duration::days(days);

    match service.brand_performance(tenant_id, period_start, period_end) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: RecommendationServiceError) -> Response {
    let status = match &error {
        RecommendationServiceError::MissingProfile => StatusCode::UNPROCESSABLE_ENTITY,
        RecommendationServiceError::Profile(ProfileError::NotFound) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
