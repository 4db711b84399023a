mod config;
mod eligibility;
mod ranking;
mod scoring;

pub use config::AnalysisConfig;
pub use eligibility::{EligibilityCheck, RejectionReason};

pub(crate) use eligibility::{check_product, screen_products};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::{DietaryRestriction, MedicalCondition, Product, ProductId};

/// Stateless engine applying the hard-constraint screen and the weighted
/// rubric to a catalog snapshot.
pub struct AnalysisEngine {
    config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Score one product in isolation.
    pub fn score(&self, product: &Product) -> ScoredProduct {
        scoring::score_product(product, &self.config)
    }

    /// Screen, score, and rank a catalog snapshot against one profile's
    /// restrictions and conditions. Deterministic for identical inputs.
    pub fn analyze(
        &self,
        products: &[Product],
        restrictions: &BTreeSet<DietaryRestriction>,
        conditions: &BTreeSet<MedicalCondition>,
    ) -> AnalysisOutcome {
        let (eligible, eligibility) =
            eligibility::screen_products(products, restrictions, conditions);

        let scored = eligible
            .iter()
            .map(|product| scoring::score_product(product, &self.config))
            .collect();
        let ranked = ranking::rank(scored);
        let recommended = ranking::select_top(&ranked, self.config.top_n);

        let ranking_record = ranked
            .iter()
            .map(|product| {
                (
                    product.product_id,
                    RankingEntry {
                        score: product.score,
                        reasons: product.reasons.clone(),
                        match_value: product.score / 100.0,
                    },
                )
            })
            .collect();

        AnalysisOutcome {
            eligibility,
            ranked,
            recommended,
            ranking_record,
        }
    }
}

/// Weighted contributions retained per component so audits and tests can see
/// how the composite score was assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub protein: f64,
    pub cost_benefit: f64,
    pub certification: f64,
    pub purity: f64,
}

/// A scored catalog product with its positive-match trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    pub product_id: ProductId,
    pub brand_name: String,
    pub product_name: String,
    pub price: f64,
    pub score: f64,
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Auditable ranking record persisted alongside each interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub score: f64,
    pub reasons: Vec<String>,
    pub match_value: f64,
}

/// Full result of one comparative analysis over a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub eligibility: Vec<EligibilityCheck>,
    pub ranked: Vec<ScoredProduct>,
    pub recommended: Vec<ProductId>,
    pub ranking_record: BTreeMap<ProductId, RankingEntry>,
}

impl AnalysisOutcome {
    pub fn eligible_count(&self) -> usize {
        self.eligibility.iter().filter(|check| check.eligible).count()
    }
}
