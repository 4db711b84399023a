use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use super::common::*;
use crate::workflows::recommendation::analytics::{brand_performance, InteractionRecord};
use crate::workflows::recommendation::domain::ProductId;

fn record(
    session: &str,
    recommended: Vec<ProductId>,
    selected: Option<ProductId>,
    satisfaction: Option<u8>,
) -> InteractionRecord {
    InteractionRecord {
        tenant_id: TENANT,
        user_profile_id: None,
        session_id: session.to_string(),
        query_text: Some("best whey for me".to_string()),
        recommended_products: recommended,
        ranking: BTreeMap::new(),
        selected_product_id: selected,
        satisfaction_score: satisfaction,
        recorded_at: Utc::now(),
    }
}

#[test]
fn aggregates_recommendations_selections_and_satisfaction() {
    let catalog = protein_catalog();
    let concentrate = whey_concentrate().id;
    let zero_lactose = whey_zero_lactose().id;

    let records = vec![
        record("s1", vec![concentrate, zero_lactose], Some(zero_lactose), Some(5)),
        record("s2", vec![zero_lactose], Some(zero_lactose), Some(4)),
        record("s3", vec![concentrate], None, None),
    ];

    let performance = brand_performance(&records, &catalog);

    assert_eq!(performance.len(), 2);
    // Sorted by recommendation count; both have two recommendations, so the
    // catalog join order decides and the concentrate comes first.
    let top = &performance[0];
    assert_eq!(top.product_name, "Whey Protein Concentrado");
    assert_eq!(top.recommendation_count, 2);
    assert_eq!(top.total_selections, 0);
    assert_close(top.conversion_rate, 0.0);
    assert_eq!(top.avg_satisfaction, Some(5.0));

    let runner_up = &performance[1];
    assert_eq!(runner_up.product_name, "Whey Zero Lactose");
    assert_eq!(runner_up.recommendation_count, 2);
    assert_eq!(runner_up.total_selections, 2);
    assert_close(runner_up.conversion_rate, 1.0);
    assert_eq!(runner_up.avg_satisfaction, Some(4.5));
}

#[test]
fn conversion_rate_rounds_to_four_decimals() {
    let catalog = protein_catalog();
    let concentrate = whey_concentrate().id;

    let records = vec![
        record("s1", vec![concentrate], Some(concentrate), None),
        record("s2", vec![concentrate], None, None),
        record("s3", vec![concentrate], None, None),
    ];

    let performance = brand_performance(&records, &catalog);

    assert_eq!(performance.len(), 1);
    assert_close(performance[0].conversion_rate, 0.3333);
}

#[test]
fn products_never_recommended_are_absent_from_the_report() {
    let catalog = protein_catalog();
    let records = vec![record("s1", vec![whey_isolate().id], None, None)];

    let performance = brand_performance(&records, &catalog);

    assert_eq!(performance.len(), 1);
    assert_eq!(performance[0].product_name, "Whey Protein Isolado");
}

#[test]
fn empty_history_produces_an_empty_report() {
    let performance = brand_performance(&[], &protein_catalog());
    assert!(performance.is_empty());
}

#[test]
fn service_report_covers_the_requested_window() {
    let (service, _profiles, recorder) = build_service(protein_catalog());

    let request = crate::workflows::recommendation::service::RecommendationRequest {
        query: "whey for muscle gain".to_string(),
        user_profile_id: None,
        profile: Some(muscle_gain_profile()),
        session_id: Some("sess-report".to_string()),
    };
    service.recommend(TENANT, request).expect("pipeline runs");
    assert_eq!(recorder.records().len(), 1);

    let now = Utc::now();
    let report = service
        .brand_performance(TENANT, now - Duration::days(30), now + Duration::seconds(1))
        .expect("report builds");

    assert_eq!(report.total_interactions, 1);
    assert_eq!(report.brand_performance.len(), 3);

    let outside = service
        .brand_performance(
            TENANT,
            now - Duration::days(60),
            now - Duration::days(30),
        )
        .expect("report builds");
    assert_eq!(outside.total_interactions, 0);
    assert!(outside.brand_performance.is_empty());
}
