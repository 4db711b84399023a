use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::super::domain::{DietaryRestriction, MedicalCondition, Product, ProductId};

/// Hard constraint that excludes a product from recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    ContainsMaltodextrin,
    ContainsLactose,
    NotVegan,
    ContainsGluten,
    ContainsArtificialSweeteners,
}

impl RejectionReason {
    pub const fn summary(self) -> &'static str {
        match self {
            Self::ContainsMaltodextrin => "contains maltodextrin (contraindicated for diabetes)",
            Self::ContainsLactose => "contains lactose",
            Self::NotVegan => "not vegan",
            Self::ContainsGluten => "contains gluten",
            Self::ContainsArtificialSweeteners => "contains artificial sweeteners",
        }
    }
}

/// Audit row kept for every candidate, eligible or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCheck {
    pub product_id: ProductId,
    pub eligible: bool,
    pub rejections: Vec<RejectionReason>,
}

/// Every rule is evaluated; failures accumulate instead of short-circuiting
/// so the audit trail names each violated constraint.
pub(crate) fn check_product(
    product: &Product,
    restrictions: &BTreeSet<DietaryRestriction>,
    conditions: &BTreeSet<MedicalCondition>,
) -> EligibilityCheck {
    let facts = &product.nutrition;
    let mut rejections = Vec::new();

    if conditions.contains(&MedicalCondition::Diabetes) && facts.contains_maltodextrin {
        rejections.push(RejectionReason::ContainsMaltodextrin);
    }

    if restrictions.contains(&DietaryRestriction::LactoseFree) && !facts.lactose_free {
        rejections.push(RejectionReason::ContainsLactose);
    }

    if restrictions.contains(&DietaryRestriction::Vegan) && !facts.vegan {
        rejections.push(RejectionReason::NotVegan);
    }

    if restrictions.contains(&DietaryRestriction::GlutenFree) && !facts.gluten_free {
        rejections.push(RejectionReason::ContainsGluten);
    }

    if restrictions.contains(&DietaryRestriction::NoArtificialSweeteners)
        && facts.contains_artificial_sweeteners
    {
        rejections.push(RejectionReason::ContainsArtificialSweeteners);
    }

    EligibilityCheck {
        product_id: product.id,
        eligible: rejections.is_empty(),
        rejections,
    }
}

pub(crate) fn screen_products<'a>(
    products: &'a [Product],
    restrictions: &BTreeSet<DietaryRestriction>,
    conditions: &BTreeSet<MedicalCondition>,
) -> (Vec<&'a Product>, Vec<EligibilityCheck>) {
    let mut eligible = Vec::new();
    let mut audit = Vec::with_capacity(products.len());

    for product in products {
        let check = check_product(product, restrictions, conditions);
        if check.eligible {
            eligible.push(product);
        }
        audit.push(check);
    }

    (eligible, audit)
}
