use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::extract::State;
use axum::Extension;
use axum::Json;
use recruitment_eval::error::AppError;
use recruitment_eval::workflows::recruitment::{
    recruitment_router, AuditTrail, CandidateId, ConsolidationInput, ConsolidationResult,
    EvaluationEngine, EvaluationRepository, RecruitmentEvaluationService, RecruitmentServiceError,
    ScoreSheetImporter, TechnicalScores,
};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Score sheet CSV plus technical results, consolidated without touching the repository.
/// The job family code goes through the configured lookup mode.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreSheetRequest {
    pub(crate) job_family: String,
    pub(crate) score_sheet_csv: String,
    #[serde(default)]
    pub(crate) technical: TechnicalScores,
}

pub(crate) fn with_recruitment_routes<R, A>(
    service: Arc<RecruitmentEvaluationService<R, A>>,
) -> axum::Router
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    let score_sheets = axum::Router::new()
        .route(
            "/api/v1/score-sheets/consolidation",
            axum::routing::post(score_sheet_endpoint),
        )
        .with_state(Arc::new(service.engine().clone()));

    recruitment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .merge(score_sheets)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_sheet_endpoint(
    State(engine): State<Arc<EvaluationEngine>>,
    Json(payload): Json<ScoreSheetRequest>,
) -> Result<Json<ConsolidationResult>, AppError> {
    let ScoreSheetRequest {
        job_family,
        score_sheet_csv,
        technical,
    } = payload;

    let candidate_id = CandidateId("score-sheet".to_string());
    let reader = Cursor::new(score_sheet_csv.into_bytes());
    let scores = ScoreSheetImporter::new(engine.config()).read(reader, &candidate_id)?;
    let input = ConsolidationInput::from_records(&scores, technical);
    let result = engine
        .consolidate_code(&job_family, &input)
        .map_err(RecruitmentServiceError::from)?;

    Ok(Json(result))
}
