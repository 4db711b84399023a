use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::workflows::recommendation::analysis::{AnalysisConfig, AnalysisEngine};
use crate::workflows::recommendation::analytics::{
    InteractionRecord, InteractionRecorder, RecorderError,
};
use crate::workflows::recommendation::catalog::{CatalogError, ProductCatalog};
use crate::workflows::recommendation::domain::{
    BudgetRange, DietaryRestriction, DosageGuideline, EvidenceEntry, EvidenceLevel,
    MedicalCondition, NutritionFacts, Product, ProductId, ProfileId, SupplementCategory, TenantId,
    UserGoal, UserProfile,
};
use crate::workflows::recommendation::evidence::{EvidenceError, EvidenceStore};
use crate::workflows::recommendation::explanation::{
    GenerationError, RecommendationPrompt, TextGenerator,
};
use crate::workflows::recommendation::profile::{
    ProfileError, ProfileStore, ProfileUpdate, StoredProfile,
};
use crate::workflows::recommendation::service::RecommendationService;

pub(super) const TENANT: TenantId = TenantId(1);

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn engine() -> AnalysisEngine {
    AnalysisEngine::new(AnalysisConfig::default())
}

fn product(
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
        tenant_id: TENANT,
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

pub(super) fn whey_concentrate() -> Product {
    product(
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
    )
}

pub(super) fn whey_blend_with_maltodextrin() -> Product {
    product(
        2,
        "Max Titanium",
        "Whey 3W",
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
    )
}

pub(super) fn whey_zero_lactose() -> Product {
    product(
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
    )
}

pub(super) fn whey_isolate() -> Product {
    product(
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
    )
}

pub(super) fn pea_protein_vegan() -> Product {
    product(
        5,
        "IntegralMedica",
        "Whey Vegan",
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
    )
}

pub(super) fn creatine() -> Product {
    product(
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
    )
}

pub(super) fn protein_catalog() -> Vec<Product> {
    vec![
        whey_concentrate(),
        whey_blend_with_maltodextrin(),
        whey_zero_lactose(),
        whey_isolate(),
        pea_protein_vegan(),
    ]
}

pub(super) fn muscle_gain_profile() -> UserProfile {
    UserProfile {
        goal: UserGoal::MuscleGain,
        dietary_restrictions: BTreeSet::new(),
        medical_conditions: BTreeSet::new(),
        budget_range: BudgetRange::Medium,
        biometrics: None,
    }
}

pub(super) fn lactose_free_diabetic_profile() -> UserProfile {
    let mut profile = muscle_gain_profile();
    profile
        .dietary_restrictions
        .insert(DietaryRestriction::LactoseFree);
    profile.medical_conditions.insert(MedicalCondition::Diabetes);
    profile
}

pub(super) fn vegan_profile() -> UserProfile {
    let mut profile = muscle_gain_profile();
    profile.dietary_restrictions.insert(DietaryRestriction::Vegan);
    profile
}

pub(super) fn whey_evidence() -> EvidenceEntry {
    let mut effects = BTreeMap::new();
    effects.insert("muscle_gain".to_string(), "strong".to_string());
    effects.insert("recovery".to_string(), "strong".to_string());

    let mut interactions = BTreeMap::new();
    interactions.insert(
        "diabetes".to_string(),
        "Monitor blood sugar: whey can cause a glycemic spike".to_string(),
    );

    EvidenceEntry {
        supplement_name: "Whey Protein".to_string(),
        category: SupplementCategory::Protein,
        evidence_level: EvidenceLevel::Strong,
        source: "AIS".to_string(),
        source_url: Some("https://www.ais.gov.au/nutrition/supplements".to_string()),
        effects,
        dosage: Some(DosageGuideline {
            min: 20.0,
            max: 40.0,
            unit: "g".to_string(),
            timing: Some("post_workout".to_string()),
        }),
        contraindications: vec!["kidney_disease".to_string()],
        interactions,
    }
}

#[derive(Default)]
pub(super) struct MemoryProfileStore {
    profiles: Mutex<HashMap<(TenantId, ProfileId), StoredProfile>>,
    sequence: AtomicU64,
}

impl ProfileStore for MemoryProfileStore {
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
        let stored = guard.get_mut(&(tenant_id, id)).ok_or(ProfileError::NotFound)?;
        update.apply(&mut stored.profile);
        stored.updated_at = Some(Utc::now());
        Ok(stored.clone())
    }
}

pub(super) struct MemoryEvidenceStore {
    entries: Vec<EvidenceEntry>,
}

impl MemoryEvidenceStore {
    pub(super) fn new(entries: Vec<EvidenceEntry>) -> Self {
        Self { entries }
    }
}

impl EvidenceStore for MemoryEvidenceStore {
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

pub(super) struct MemoryCatalog {
    products: Vec<Product>,
}

impl MemoryCatalog {
    pub(super) fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl ProductCatalog for MemoryCatalog {
    fn snapshot(
        &self,
        tenant_id: TenantId,
        category: SupplementCategory,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .products
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
            .iter()
            .filter(|product| product.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryRecorder {
    records: Mutex<Vec<InteractionRecord>>,
}

impl MemoryRecorder {
    pub(super) fn records(&self) -> Vec<InteractionRecord> {
        self.records.lock().expect("recorder mutex poisoned").clone()
    }
}

impl InteractionRecorder for MemoryRecorder {
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

pub(super) struct StaticTextGenerator;

impl TextGenerator for StaticTextGenerator {
    fn generate(&self, prompt: &RecommendationPrompt) -> Result<String, GenerationError> {
        Ok(format!(
            "Personalized comparison:\n{}\n{}",
            prompt.product_details, prompt.user_context
        ))
    }
}

pub(super) struct FailingTextGenerator;

impl TextGenerator for FailingTextGenerator {
    fn generate(&self, _prompt: &RecommendationPrompt) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("model offline".to_string()))
    }
}

pub(super) struct FailingRecorder;

impl InteractionRecorder for FailingRecorder {
    fn record(&self, _record: InteractionRecord) -> Result<(), RecorderError> {
        Err(RecorderError::Unavailable("log store offline".to_string()))
    }

    fn tenant_history(
        &self,
        _tenant_id: TenantId,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<InteractionRecord>, RecorderError> {
        Err(RecorderError::Unavailable("log store offline".to_string()))
    }
}

pub(super) type MemoryService = RecommendationService<
    MemoryProfileStore,
    MemoryEvidenceStore,
    MemoryCatalog,
    StaticTextGenerator,
    MemoryRecorder,
>;

pub(super) fn build_service(
    products: Vec<Product>,
) -> (MemoryService, Arc<MemoryProfileStore>, Arc<MemoryRecorder>) {
    let profiles = Arc::new(MemoryProfileStore::default());
    let recorder = Arc::new(MemoryRecorder::default());
    let service = RecommendationService::new(
        profiles.clone(),
        Arc::new(MemoryEvidenceStore::new(vec![whey_evidence()])),
        Arc::new(MemoryCatalog::new(products)),
        Arc::new(StaticTextGenerator),
        recorder.clone(),
        AnalysisConfig::default(),
    );
    (service, profiles, recorder)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
