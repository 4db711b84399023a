use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::RankingEntry;
use super::domain::{Product, ProductId, ProfileId, TenantId};

/// Interaction row persisted for BI after each recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub tenant_id: TenantId,
    pub user_profile_id: Option<ProfileId>,
    pub session_id: String,
    pub query_text: Option<String>,
    pub recommended_products: Vec<ProductId>,
    pub ranking: BTreeMap<ProductId, RankingEntry>,
    pub selected_product_id: Option<ProductId>,
    pub satisfaction_score: Option<u8>,
    pub recorded_at: DateTime<Utc>,
}

/// Outbound hook persisting interaction records (e.g. the BI log store).
pub trait InteractionRecorder: Send + Sync {
    fn record(&self, record: InteractionRecord) -> Result<(), RecorderError>;

    fn tenant_history(
        &self,
        tenant_id: TenantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<InteractionRecord>, RecorderError>;
}

/// Error enumeration for interaction-log failures.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("interaction log unavailable: {0}")]
    Unavailable(String),
}

/// Aggregated recommendation performance for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandPerformance {
    pub brand_name: String,
    pub product_name: String,
    pub recommendation_count: usize,
    pub total_selections: usize,
    pub conversion_rate: f64,
    pub avg_satisfaction: Option<f64>,
}

#[derive(Default)]
struct ProductStats {
    recommendations: usize,
    selections: usize,
    satisfaction_total: f64,
    satisfaction_count: usize,
}

/// Aggregate interaction history into per-product performance, joined with
/// the catalog for display names and sorted by recommendation count.
pub fn brand_performance(
    records: &[InteractionRecord],
    products: &[Product],
) -> Vec<BrandPerformance> {
    let mut stats: BTreeMap<ProductId, ProductStats> = BTreeMap::new();

    for record in records {
        for product_id in &record.recommended_products {
            let entry = stats.entry(*product_id).or_default();
            entry.recommendations += 1;

            if record.selected_product_id == Some(*product_id) {
                entry.selections += 1;
            }
            if let Some(score) = record.satisfaction_score {
                entry.satisfaction_total += score as f64;
                entry.satisfaction_count += 1;
            }
        }
    }

    let mut performance: Vec<BrandPerformance> = products
        .iter()
        .filter_map(|product| {
            stats.get(&product.id).map(|entry| {
                let conversion_rate = if entry.recommendations > 0 {
                    let rate = entry.selections as f64 / entry.recommendations as f64;
                    (rate * 10_000.0).round() / 10_000.0
                } else {
                    0.0
                };
                let avg_satisfaction = if entry.satisfaction_count > 0 {
                    Some(entry.satisfaction_total / entry.satisfaction_count as f64)
                } else {
                    None
                };

                BrandPerformance {
                    brand_name: product.brand_name.clone(),
                    product_name: product.product_name.clone(),
                    recommendation_count: entry.recommendations,
                    total_selections: entry.selections,
                    conversion_rate,
                    avg_satisfaction,
                }
            })
        })
        .collect();

    performance.sort_by(|a, b| b.recommendation_count.cmp(&a.recommendation_count));
    performance
}

/// Tenant-scoped analytics report over a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandPerformanceReport {
    pub tenant_id: TenantId,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub total_interactions: usize,
    pub brand_performance: Vec<BrandPerformance>,
}
