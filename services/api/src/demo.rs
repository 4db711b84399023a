use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Args;
use nutrimatch::error::AppError;
use nutrimatch::workflows::recommendation::{
    CsvCatalogImporter, Product, RecommendationOutcome, RecommendationRequest,
    RecommendationService, UserProfile,
};

use crate::infra::{
    default_analysis_config, demo_catalog, demo_evidence, parse_budget, parse_condition,
    parse_goal, parse_restriction, InMemoryEvidenceStore, InMemoryInteractionRecorder,
    InMemoryProductCatalog, InMemoryProfileStore, TemplateTextGenerator, DEMO_TENANT,
};

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// User goal (weight_loss, muscle_gain, endurance, general_health,
    /// sports_performance, recovery)
    #[arg(long, value_parser = parse_goal)]
    pub(crate) goal: nutrimatch::workflows::recommendation::UserGoal,
    /// Budget range (low, medium, high, premium)
    #[arg(long, default_value = "medium", value_parser = parse_budget)]
    pub(crate) budget: nutrimatch::workflows::recommendation::BudgetRange,
    /// Dietary restriction, repeatable (e.g. --restriction lactose_free)
    #[arg(long = "restriction", value_parser = parse_restriction)]
    pub(crate) restrictions: Vec<nutrimatch::workflows::recommendation::DietaryRestriction>,
    /// Medical condition, repeatable (e.g. --condition diabetes)
    #[arg(long = "condition", value_parser = parse_condition)]
    pub(crate) conditions: Vec<nutrimatch::workflows::recommendation::MedicalCondition>,
    /// Optional catalog CSV to analyze instead of the seeded demo storefront
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Include the per-product eligibility audit in the output
    #[arg(long)]
    pub(crate) list_eligibility: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional catalog CSV to analyze instead of the seeded demo storefront
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Skip the brand-performance analytics portion of the demo
    #[arg(long)]
    pub(crate) skip_analytics: bool,
}

type DemoService = RecommendationService<
    InMemoryProfileStore,
    InMemoryEvidenceStore,
    InMemoryProductCatalog,
    TemplateTextGenerator,
    InMemoryInteractionRecorder,
>;

fn load_catalog(catalog_csv: Option<PathBuf>) -> Result<(Vec<Product>, bool), AppError> {
    match catalog_csv {
        Some(path) => {
            let products = CsvCatalogImporter::from_path(path, DEMO_TENANT)?;
            Ok((products, true))
        }
        None => Ok((demo_catalog(), false)),
    }
}

fn build_service(products: Vec<Product>) -> (Arc<DemoService>, Arc<InMemoryInteractionRecorder>) {
    let recorder = Arc::new(InMemoryInteractionRecorder::default());
    let service = Arc::new(RecommendationService::new(
        Arc::new(InMemoryProfileStore::default()),
        Arc::new(InMemoryEvidenceStore::new(demo_evidence())),
        Arc::new(InMemoryProductCatalog::new(products)),
        Arc::new(TemplateTextGenerator),
        recorder.clone(),
        default_analysis_config(),
    ));
    (service, recorder)
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        goal,
        budget,
        restrictions,
        conditions,
        catalog_csv,
        list_eligibility,
    } = args;

    let (products, imported) = load_catalog(catalog_csv)?;
    let (service, _recorder) = build_service(products);

    let profile = UserProfile {
        goal,
        dietary_restrictions: restrictions.into_iter().collect::<BTreeSet<_>>(),
        medical_conditions: conditions.into_iter().collect::<BTreeSet<_>>(),
        budget_range: budget,
        biometrics: None,
    };

    let outcome = service.recommend(
        DEMO_TENANT,
        RecommendationRequest {
            query: "cli recommendation".to_string(),
            user_profile_id: None,
            profile: Some(profile),
            session_id: None,
        },
    )?;

    println!("Supplement recommendation");
    if imported {
        println!("Data source: catalog CSV import");
    } else {
        println!("Data source: seeded demo storefront");
    }
    render_outcome(&outcome, list_eligibility);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        catalog_csv,
        skip_analytics,
    } = args;

    let (products, imported) = load_catalog(catalog_csv)?;
    let (service, recorder) = build_service(products);

    println!("Recommendation pipeline demo");
    if imported {
        println!("Data source: catalog CSV import");
    } else {
        println!("Data source: seeded demo storefront");
    }

    for (label, profile) in demo_personas() {
        println!("\n=== {label} ===");
        let outcome = service.recommend(
            DEMO_TENANT,
            RecommendationRequest {
                query: format!("demo persona: {label}"),
                user_profile_id: None,
                profile: Some(profile),
                session_id: None,
            },
        )?;
        render_outcome(&outcome, true);
    }

    if skip_analytics {
        return Ok(());
    }

    println!("\nBrand performance (last 30 days)");
    let now = Utc::now();
    let report = service.brand_performance(DEMO_TENANT, now - Duration::days(30), now)?;
    println!("- {} interactions recorded", report.total_interactions);
    for brand in &report.brand_performance {
        println!(
            "- {} {}: {} recommendations, {} selections ({:.2}% conversion)",
            brand.brand_name,
            brand.product_name,
            brand.recommendation_count,
            brand.total_selections,
            brand.conversion_rate * 100.0
        );
    }

    let stored = recorder.records();
    println!("- {} interaction records in the log store", stored.len());

    Ok(())
}

fn demo_personas() -> Vec<(&'static str, UserProfile)> {
    use nutrimatch::workflows::recommendation::{
        BudgetRange, DietaryRestriction, MedicalCondition, UserGoal,
    };

    let mut lactose_free_diabetic = UserProfile {
        goal: UserGoal::MuscleGain,
        dietary_restrictions: BTreeSet::new(),
        medical_conditions: BTreeSet::new(),
        budget_range: BudgetRange::Medium,
        biometrics: None,
    };
    lactose_free_diabetic
        .dietary_restrictions
        .insert(DietaryRestriction::LactoseFree);
    lactose_free_diabetic
        .medical_conditions
        .insert(MedicalCondition::Diabetes);

    let mut vegan = UserProfile {
        goal: UserGoal::MuscleGain,
        dietary_restrictions: BTreeSet::new(),
        medical_conditions: BTreeSet::new(),
        budget_range: BudgetRange::High,
        biometrics: None,
    };
    vegan.dietary_restrictions.insert(DietaryRestriction::Vegan);

    let athlete = UserProfile {
        goal: UserGoal::SportsPerformance,
        dietary_restrictions: BTreeSet::new(),
        medical_conditions: BTreeSet::new(),
        budget_range: BudgetRange::Low,
        biometrics: None,
    };

    vec![
        ("Muscle gain, lactose-free, diabetic", lactose_free_diabetic),
        ("Muscle gain, vegan", vegan),
        ("Sports performance on a budget", athlete),
    ]
}

fn render_outcome(outcome: &RecommendationOutcome, list_eligibility: bool) {
    println!(
        "Category: {} | session {}",
        outcome.category.label(),
        outcome.session_id
    );

    if list_eligibility {
        println!("\nEligibility audit");
        for check in &outcome.analysis.eligibility {
            if check.eligible {
                println!("- product {}: eligible", check.product_id.0);
            } else {
                let reasons = check
                    .rejections
                    .iter()
                    .map(|reason| reason.summary())
                    .collect::<Vec<_>>()
                    .join("; ");
                println!("- product {}: rejected ({reasons})", check.product_id.0);
            }
        }
    }

    if outcome.analysis.ranked.is_empty() {
        println!("\nNo products matched this profile.");
    } else {
        println!("\nRanking");
        for (index, product) in outcome.analysis.ranked.iter().enumerate() {
            println!(
                "{}. {} - {} | score {:.1} | protein {:.1} / cost {:.1} / certs {:.1} / purity {:.1}",
                index + 1,
                product.brand_name,
                product.product_name,
                product.score,
                product.breakdown.protein,
                product.breakdown.cost_benefit,
                product.breakdown.certification,
                product.breakdown.purity
            );
        }
    }

    println!("\n{}", outcome.explanation.text);
}
