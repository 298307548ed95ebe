use crate::cli::ServeArgs;
use crate::infra::{seed_demo_data, AppState, InMemoryAuditTrail, InMemoryEvaluationRepository};
use crate::routes::with_recruitment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruitment_eval::config::AppConfig;
use recruitment_eval::error::AppError;
use recruitment_eval::telemetry;
use recruitment_eval::workflows::recruitment::RecruitmentEvaluationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let repository = Arc::new(InMemoryEvaluationRepository::default());
    if args.seed_demo {
        if let Err(err) = seed_demo_data(&repository) {
            warn!(%err, "demo data not seeded");
        }
    }
    let audit = Arc::new(InMemoryAuditTrail::default());
    let evaluation_service = Arc::new(RecruitmentEvaluationService::new(
        repository,
        audit,
        config.evaluation.clone(),
    ));

    let app = with_recruitment_routes(evaluation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        job_family_lookup = ?config.evaluation.job_family_lookup,
        "recruitment evaluation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
