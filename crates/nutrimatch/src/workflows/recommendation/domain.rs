use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Identifier wrapper for tenant storefronts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TenantId(pub u64);

/// Identifier wrapper for catalog products.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProductId(pub u64);

/// Identifier wrapper for stored user profiles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProfileId(pub u64);

/// Training or health objective declared during anamnesis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UserGoal {
    WeightLoss,
    MuscleGain,
    Endurance,
    GeneralHealth,
    SportsPerformance,
    Recovery,
}

impl UserGoal {
    pub const fn label(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight loss",
            Self::MuscleGain => "muscle gain",
            Self::Endurance => "endurance",
            Self::GeneralHealth => "general health",
            Self::SportsPerformance => "sports performance",
            Self::Recovery => "recovery",
        }
    }

    /// Supplement category queried for evidence and catalog candidates.
    pub const fn default_category(self) -> SupplementCategory {
        match self {
            Self::MuscleGain | Self::WeightLoss | Self::Recovery => SupplementCategory::Protein,
            Self::Endurance => SupplementCategory::Caffeine,
            Self::SportsPerformance => SupplementCategory::Creatine,
            Self::GeneralHealth => SupplementCategory::Multivitamin,
        }
    }
}

/// Monthly spend bracket declared by the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BudgetRange {
    Low,
    Medium,
    High,
    Premium,
}

impl BudgetRange {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Premium => "premium",
        }
    }
}

/// Dietary restrictions enforced as hard constraints during screening.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    GlutenFree,
    LactoseFree,
    Vegan,
    Vegetarian,
    Keto,
    Paleo,
    NoArtificialSweeteners,
    NoSoy,
}

impl DietaryRestriction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::GlutenFree => "gluten-free",
            Self::LactoseFree => "lactose-free",
            Self::Vegan => "vegan",
            Self::Vegetarian => "vegetarian",
            Self::Keto => "keto",
            Self::Paleo => "paleo",
            Self::NoArtificialSweeteners => "no artificial sweeteners",
            Self::NoSoy => "no soy",
        }
    }
}

/// Medical conditions relevant to supplement contraindications.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MedicalCondition {
    Diabetes,
    Hypertension,
    Gastritis,
    KidneyDisease,
    LiverDisease,
    CardiacConditions,
    Allergies,
}

impl MedicalCondition {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes",
            Self::Hypertension => "hypertension",
            Self::Gastritis => "gastritis",
            Self::KidneyDisease => "kidney disease",
            Self::LiverDisease => "liver disease",
            Self::CardiacConditions => "cardiac conditions",
            Self::Allergies => "allergies",
        }
    }
}

/// Scientific-evidence strength buckets (AIS Group A maps to `Strong`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLevel {
    Strong,
    Moderate,
    Weak,
    Insufficient,
}

impl EvidenceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
            Self::Insufficient => "insufficient",
        }
    }
}

/// Closed set of supplement categories carried by catalogs and evidence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SupplementCategory {
    Protein,
    Creatine,
    Bcaas,
    PreWorkout,
    PostWorkout,
    Multivitamin,
    Omega3,
    VitaminD,
    Magnesium,
    Zinc,
    Caffeine,
    BetaAlanine,
    Citrulline,
    Glutamine,
}

impl SupplementCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Protein => "protein",
            Self::Creatine => "creatine",
            Self::Bcaas => "bcaas",
            Self::PreWorkout => "pre-workout",
            Self::PostWorkout => "post-workout",
            Self::Multivitamin => "multivitamin",
            Self::Omega3 => "omega-3",
            Self::VitaminD => "vitamin D",
            Self::Magnesium => "magnesium",
            Self::Zinc => "zinc",
            Self::Caffeine => "caffeine",
            Self::BetaAlanine => "beta-alanine",
            Self::Citrulline => "citrulline",
            Self::Glutamine => "glutamine",
        }
    }
}

/// Declared nutrition facts per serving. Catalogs frequently omit fields, so
/// every value defaults permissively: numbers to zero, flags to false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub lactose_free: bool,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub contains_maltodextrin: bool,
    #[serde(default)]
    pub contains_artificial_sweeteners: bool,
}

fn default_currency() -> String {
    "BRL".to_string()
}

const fn default_active() -> bool {
    true
}

/// Catalog product snapshot as supplied by the tenant's storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub tenant_id: TenantId,
    pub brand_name: String,
    pub product_name: String,
    pub category: SupplementCategory,
    #[serde(default)]
    pub nutrition: NutritionFacts,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Product {
    /// Candidate invariant: only active products with stock may be analyzed.
    pub fn is_available(&self) -> bool {
        self.is_active && self.stock_quantity > 0
    }

    pub fn display_name(&self) -> String {
        format!("{} - {}", self.brand_name, self.product_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
}

/// Vitals captured during anamnesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Biometrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u8,
    pub sex: Sex,
}

impl Biometrics {
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        if height_m <= 0.0 {
            return 0.0;
        }
        self.weight_kg / (height_m * height_m)
    }
}

/// Anamnesis snapshot driving one recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub goal: UserGoal,
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<DietaryRestriction>,
    #[serde(default)]
    pub medical_conditions: BTreeSet<MedicalCondition>,
    pub budget_range: BudgetRange,
    #[serde(default)]
    pub biometrics: Option<Biometrics>,
}

/// Recommended intake range published by the evidence source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosageGuideline {
    pub min: f64,
    pub max: f64,
    pub unit: String,
    #[serde(default)]
    pub timing: Option<String>,
}

/// Tenant-agnostic scientific record for one supplement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    pub supplement_name: String,
    pub category: SupplementCategory,
    pub evidence_level: EvidenceLevel,
    pub source: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub effects: BTreeMap<String, String>,
    #[serde(default)]
    pub dosage: Option<DosageGuideline>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub interactions: BTreeMap<String, String>,
}
