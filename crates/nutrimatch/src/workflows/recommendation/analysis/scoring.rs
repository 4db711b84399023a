use super::super::domain::Product;
use super::config::AnalysisConfig;
use super::{ScoreBreakdown, ScoredProduct};

/// Score one product against the fixed rubric. Pure function of the product
/// attributes; no cross-product normalization.
///
/// Products without declared protein earn nothing from the protein and
/// cost-benefit components and no reason for either. That is policy: a
/// product cannot claim protein merit it does not declare.
pub(crate) fn score_product(product: &Product, config: &AnalysisConfig) -> ScoredProduct {
    let facts = &product.nutrition;
    let mut reasons = Vec::new();

    let mut protein = 0.0;
    if facts.protein_g > 0.0 {
        let adequacy = (facts.protein_g / config.protein_target_g * 100.0).min(100.0);
        protein = adequacy * config.protein_weight;
        reasons.push(format!(
            "high protein content ({}g per serving)",
            facts.protein_g
        ));
    }

    let mut cost_benefit = 0.0;
    if facts.protein_g > 0.0 {
        let price_per_protein = product.price / facts.protein_g;
        let raw = (100.0 - price_per_protein * config.price_per_protein_factor).max(0.0);
        cost_benefit = raw * config.cost_benefit_weight;
        reasons.push(format!(
            "good cost-benefit ({:.2} {} per g of protein)",
            price_per_protein, product.currency
        ));
    }

    let density = (product.certifications.len() as f64 * config.certification_step).min(100.0);
    let certification = density * config.certification_weight;
    if !product.certifications.is_empty() {
        reasons.push(format!(
            "certifications: {}",
            product.certifications.join(", ")
        ));
    }

    let mut purity = 0.0;
    if !facts.contains_artificial_sweeteners {
        purity += config.purity_bonus;
        reasons.push("no artificial sweeteners".to_string());
    }
    if !facts.contains_maltodextrin {
        purity += config.purity_bonus;
        reasons.push("no maltodextrin".to_string());
    }

    let score = (protein + cost_benefit + certification + purity).clamp(0.0, 100.0);

    ScoredProduct {
        product_id: product.id,
        brand_name: product.brand_name.clone(),
        product_name: product.product_name.clone(),
        price: product.price,
        score,
        reasons,
        breakdown: ScoreBreakdown {
            protein,
            cost_benefit,
            certification,
            purity,
        },
    }
}
