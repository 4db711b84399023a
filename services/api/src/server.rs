use crate::cli::ServeArgs;
use crate::infra::{
    default_analysis_config, demo_catalog, demo_evidence, AppState, InMemoryEvidenceStore,
    InMemoryInteractionRecorder, InMemoryProductCatalog, InMemoryProfileStore,
    TemplateTextGenerator,
};
use crate::routes::with_recommendation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use nutrimatch::config::AppConfig;
use nutrimatch::error::AppError;
use nutrimatch::telemetry;
use nutrimatch::workflows::recommendation::RecommendationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let recommendation_service = Arc::new(RecommendationService::new(
        Arc::new(InMemoryProfileStore::default()),
        Arc::new(InMemoryEvidenceStore::new(demo_evidence())),
        Arc::new(InMemoryProductCatalog::new(demo_catalog())),
        Arc::new(TemplateTextGenerator),
        Arc::new(InMemoryInteractionRecorder::default()),
        default_analysis_config(),
    ));

    let app = with_recommendation_routes(recommendation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "supplement recommendation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
