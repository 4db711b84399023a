use serde::{Deserialize, Serialize};

/// Rubric configuration describing the comparative-analysis weights.
///
/// Defaults reproduce the production rubric: protein adequacy saturates at
/// 30 g per serving, certifications saturate at five, and the purity bonus
/// is a flat addition outside the weighted components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub protein_target_g: f64,
    pub protein_weight: f64,
    pub cost_benefit_weight: f64,
    pub price_per_protein_factor: f64,
    pub certification_step: f64,
    pub certification_weight: f64,
    pub purity_bonus: f64,
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            protein_target_g: 30.0,
            protein_weight: 0.4,
            cost_benefit_weight: 0.3,
            price_per_protein_factor: 2.0,
            certification_step: 20.0,
            certification_weight: 0.2,
            purity_bonus: 10.0,
            top_n: 3,
        }
    }
}
