use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use nutrimatch::workflows::recommendation::{
    AnalysisConfig, BudgetRange, CatalogError, DietaryRestriction, DosageGuideline, EvidenceEntry,
    EvidenceError, EvidenceLevel, EvidenceStore, GenerationError, InteractionRecord,
    InteractionRecorder, MedicalCondition, NutritionFacts, Product, ProductCatalog, ProductId,
    ProfileError, ProfileId, ProfileStore, ProfileUpdate, RecommendationPrompt, RecorderError,
    StoredProfile, SupplementCategory, TenantId, TextGenerator, UserGoal, UserProfile,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Tenant used by the demo seed and the CLI walkthroughs.
pub(crate) const DEMO_TENANT: TenantId = TenantId(1);

#[derive(Default)]
pub(crate) struct InMemoryProfileStore {
    profiles: Mutex<HashMap<(TenantId, ProfileId), StoredProfile>>,
    sequence: AtomicU64,
}

impl ProfileStore for InMemoryProfileStore {
    fn create(
        &self,
        tenant_id: TenantId,
        profile: UserProfile,
    ) -> Result<StoredProfile, ProfileError> {
        let id = ProfileId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let stored = StoredProfile {
            id,
            tenant_id,
            profile,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .insert((tenant_id, id), stored.clone());
        Ok(stored)
    }

    fn fetch(
        &self,
        tenant_id: TenantId,
        id: ProfileId,
    ) -> Result<Option<StoredProfile>, ProfileError> {
        Ok(self
            .profiles
            .lock()
            .expect("profile mutex poisoned")
            .get(&(tenant_id, id))
            .cloned())
    }

    fn update(
        &self,
        tenant_id: TenantId,
        id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<StoredProfile, ProfileError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        let stored = guard
            .get_mut(&(tenant_id, id))
            .ok_or(ProfileError::NotFound)?;
        update.apply(&mut stored.profile);
        stored.updated_at = Some(Utc::now());
        Ok(stored.clone())
    }
}

pub(crate) struct InMemoryProductCatalog {
    products: Mutex<Vec<Product>>,
}

impl InMemoryProductCatalog {
    pub(crate) fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }
}

impl ProductCatalog for InMemoryProductCatalog {
    fn snapshot(
        &self,
        tenant_id: TenantId,
        category: SupplementCategory,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .products
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .filter(|product| {
                product.tenant_id == tenant_id
                    && product.category == category
                    && product.is_available()
            })
            .cloned()
            .collect())
    }

    fn tenant_products(&self, tenant_id: TenantId) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .products
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .filter(|product| product.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}

pub(crate) struct InMemoryEvidenceStore {
    entries: Vec<EvidenceEntry>,
}

impl InMemoryEvidenceStore {
    pub(crate) fn new(entries: Vec<EvidenceEntry>) -> Self {
        Self { entries }
    }
}

impl EvidenceStore for InMemoryEvidenceStore {
    fn strong_evidence(
        &self,
        category: SupplementCategory,
    ) -> Result<Vec<EvidenceEntry>, EvidenceError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| {
                entry.category == category && entry.evidence_level == EvidenceLevel::Strong
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryInteractionRecorder {
    records: Mutex<Vec<InteractionRecord>>,
}

impl InMemoryInteractionRecorder {
    pub(crate) fn records(&self) -> Vec<InteractionRecord> {
        self.records.lock().expect("recorder mutex poisoned").clone()
    }
}

impl InteractionRecorder for InMemoryInteractionRecorder {
    fn record(&self, record: InteractionRecord) -> Result<(), RecorderError> {
        self.records
            .lock()
            .expect("recorder mutex poisoned")
            .push(record);
        Ok(())
    }

    fn tenant_history(
        &self,
        tenant_id: TenantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<InteractionRecord>, RecorderError> {
        Ok(self
            .records
            .lock()
            .expect("recorder mutex poisoned")
            .iter()
            .filter(|record| {
                record.tenant_id == tenant_id
                    && record.recorded_at >= from
                    && record.recorded_at <= to
            })
            .cloned()
            .collect())
    }
}

/// Deterministic stand-in for the external text-generation service so the
/// CLI and the default deployment work without network credentials.
pub(crate) struct TemplateTextGenerator;

impl TextGenerator for TemplateTextGenerator {
    fn generate(&self, prompt: &RecommendationPrompt) -> Result<String, GenerationError> {
        let mut text = String::from("Personalized recommendation based on your profile:");
        text.push('\n');
        text.push_str(&prompt.product_details);
        if !prompt.scientific_context.is_empty() {
            text.push_str("\n\nScientific context:");
            text.push_str(&prompt.scientific_context);
        }
        if !prompt.user_context.is_empty() {
            text.push_str("\n\nYour profile:");
            text.push_str(&prompt.user_context);
        }
        Ok(text)
    }
}

pub(crate) fn default_analysis_config() -> AnalysisConfig {
    AnalysisConfig::default()
}

fn demo_product(
    id: u64,
    brand: &str,
    name: &str,
    category: SupplementCategory,
    nutrition: NutritionFacts,
    certifications: &[&str],
    price: f64,
    stock: u32,
) -> Product {
    Product {
        id: ProductId(id),
        tenant_id: DEMO_TENANT,
        brand_name: brand.to_string(),
        product_name: name.to_string(),
        category,
        nutrition,
        certifications: certifications.iter().map(|cert| cert.to_string()).collect(),
        price,
        currency: "BRL".to_string(),
        stock_quantity: stock,
        is_active: true,
    }
}

/// Demo storefront mirroring real competing whey and creatine brands.
pub(crate) fn demo_catalog() -> Vec<Product> {
    vec![
        demo_product(
            1,
            "Growth Supplements",
            "Whey Protein Concentrado",
            SupplementCategory::Protein,
            NutritionFacts {
                protein_g: 24.0,
                carbs_g: 3.5,
                fat_g: 1.8,
                calories: 120.0,
                lactose_free: false,
                gluten_free: true,
                vegan: false,
                contains_maltodextrin: false,
                contains_artificial_sweeteners: true,
            },
            &["ANVISA", "GMP"],
            89.90,
            50,
        ),
        demo_product(
            2,
            "Max Titanium",
            "Whey 3W - Whey Protein Blend",
            SupplementCategory::Protein,
            NutritionFacts {
                protein_g: 23.0,
                carbs_g: 4.0,
                fat_g: 2.0,
                calories: 120.0,
                lactose_free: false,
                gluten_free: true,
                vegan: false,
                contains_maltodextrin: true,
                contains_artificial_sweeteners: true,
            },
            &["ANVISA"],
            99.90,
            30,
        ),
        demo_product(
            3,
            "IntegralMedica",
            "Whey Zero Lactose",
            SupplementCategory::Protein,
            NutritionFacts {
                protein_g: 25.0,
                carbs_g: 2.0,
                fat_g: 1.5,
                calories: 110.0,
                lactose_free: true,
                gluten_free: true,
                vegan: false,
                contains_maltodextrin: false,
                contains_artificial_sweeteners: false,
            },
            &["ANVISA", "GMP", "SEM LACTOSE"],
            129.90,
            25,
        ),
        demo_product(
            4,
            "Dux Nutrition",
            "Whey Protein Isolado",
            SupplementCategory::Protein,
            NutritionFacts {
                protein_g: 26.0,
                carbs_g: 1.0,
                fat_g: 1.0,
                calories: 105.0,
                lactose_free: false,
                gluten_free: true,
                vegan: false,
                contains_maltodextrin: false,
                contains_artificial_sweeteners: false,
            },
            &["ANVISA", "GMP"],
            149.90,
            20,
        ),
        demo_product(
            5,
            "IntegralMedica",
            "Whey Vegan (Proteina de Ervilha)",
            SupplementCategory::Protein,
            NutritionFacts {
                protein_g: 22.0,
                carbs_g: 4.0,
                fat_g: 2.0,
                calories: 115.0,
                lactose_free: true,
                gluten_free: true,
                vegan: true,
                contains_maltodextrin: false,
                contains_artificial_sweeteners: false,
            },
            &["ANVISA", "VEGAN"],
            119.90,
            15,
        ),
        demo_product(
            6,
            "Growth Supplements",
            "Creatina Monohidratada",
            SupplementCategory::Creatine,
            NutritionFacts {
                protein_g: 0.0,
                lactose_free: true,
                gluten_free: true,
                vegan: true,
                ..NutritionFacts::default()
            },
            &["ANVISA", "GMP"],
            49.90,
            40,
        ),
        demo_product(
            7,
            "Max Titanium",
            "Creatina Creapure",
            SupplementCategory::Creatine,
            NutritionFacts {
                protein_g: 0.0,
                lactose_free: true,
                gluten_free: true,
                vegan: true,
                ..NutritionFacts::default()
            },
            &["ANVISA", "GMP", "Creapure"],
            69.90,
            35,
        ),
    ]
}

/// Strong-evidence entries mirroring the AIS/Examine seed data.
pub(crate) fn demo_evidence() -> Vec<EvidenceEntry> {
    let mut whey_effects = BTreeMap::new();
    whey_effects.insert("muscle_gain".to_string(), "strong".to_string());
    whey_effects.insert("strength".to_string(), "strong".to_string());
    whey_effects.insert("recovery".to_string(), "strong".to_string());

    let mut whey_interactions = BTreeMap::new();
    whey_interactions.insert(
        "diabetes".to_string(),
        "Monitor blood sugar: whey can cause a glycemic spike".to_string(),
    );

    let mut creatine_effects = BTreeMap::new();
    creatine_effects.insert("strength".to_string(), "strong".to_string());
    creatine_effects.insert("power_output".to_string(), "strong".to_string());

    vec![
        EvidenceEntry {
            supplement_name: "Whey Protein".to_string(),
            category: SupplementCategory::Protein,
            evidence_level: EvidenceLevel::Strong,
            source: "AIS".to_string(),
            source_url: Some("https://www.ais.gov.au/nutrition/supplements".to_string()),
            effects: whey_effects,
            dosage: Some(DosageGuideline {
                min: 20.0,
                max: 40.0,
                unit: "g".to_string(),
                timing: Some("post_workout".to_string()),
            }),
            contraindications: vec!["kidney_disease".to_string(), "lactose_intolerance".to_string()],
            interactions: whey_interactions,
        },
        EvidenceEntry {
            supplement_name: "Creatine Monohydrate".to_string(),
            category: SupplementCategory::Creatine,
            evidence_level: EvidenceLevel::Strong,
            source: "AIS".to_string(),
            source_url: Some("https://www.ais.gov.au/nutrition/supplements".to_string()),
            effects: creatine_effects,
            dosage: Some(DosageGuideline {
                min: 3.0,
                max: 5.0,
                unit: "g".to_string(),
                timing: Some("daily".to_string()),
            }),
            contraindications: vec!["kidney_disease".to_string()],
            interactions: BTreeMap::new(),
        },
    ]
}

pub(crate) fn parse_goal(raw: &str) -> Result<UserGoal, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "weight_loss" => Ok(UserGoal::WeightLoss),
        "muscle_gain" => Ok(UserGoal::MuscleGain),
        "endurance" => Ok(UserGoal::Endurance),
        "general_health" => Ok(UserGoal::GeneralHealth),
        "sports_performance" => Ok(UserGoal::SportsPerformance),
        "recovery" => Ok(UserGoal::Recovery),
        other => Err(format!("unknown goal '{other}'")),
    }
}

pub(crate) fn parse_budget(raw: &str) -> Result<BudgetRange, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(BudgetRange::Low),
        "medium" => Ok(BudgetRange::Medium),
        "high" => Ok(BudgetRange::High),
        "premium" => Ok(BudgetRange::Premium),
        other => Err(format!("unknown budget range '{other}'")),
    }
}

pub(crate) fn parse_restriction(raw: &str) -> Result<DietaryRestriction, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "gluten_free" => Ok(DietaryRestriction::GlutenFree),
        "lactose_free" => Ok(DietaryRestriction::LactoseFree),
        "vegan" => Ok(DietaryRestriction::Vegan),
        "vegetarian" => Ok(DietaryRestriction::Vegetarian),
        "keto" => Ok(DietaryRestriction::Keto),
        "paleo" => Ok(DietaryRestriction::Paleo),
        "no_artificial_sweeteners" => Ok(DietaryRestriction::NoArtificialSweeteners),
        "no_soy" => Ok(DietaryRestriction::NoSoy),
        other => Err(format!("unknown dietary restriction '{other}'")),
    }
}

pub(crate) fn parse_condition(raw: &str) -> Result<MedicalCondition, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "diabetes" => Ok(MedicalCondition::Diabetes),
        "hypertension" => Ok(MedicalCondition::Hypertension),
        "gastritis" => Ok(MedicalCondition::Gastritis),
        "kidney_disease" => Ok(MedicalCondition::KidneyDisease),
        "liver_disease" => Ok(MedicalCondition::LiverDisease),
        "cardiac_conditions" => Ok(MedicalCondition::CardiacConditions),
        "allergies" => Ok(MedicalCondition::Allergies),
        other => Err(format!("unknown medical condition '{other}'")),
    }
}
