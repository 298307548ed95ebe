use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CandidateId, FaceToFaceSubmission, JobFamily, TechnicalScores};
use super::evaluation::{policy_table, ConsolidationInput, PolicyRow};
use super::repository::{AuditTrail, EvaluationRepository, RepositoryError};
use super::service::{RecruitmentEvaluationService, RecruitmentServiceError};

type SharedService<R, A> = Arc<RecruitmentEvaluationService<R, A>>;

/// Body of the stateless consolidation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsolidationRequest {
    pub job_family: String,
    #[serde(flatten)]
    pub input: ConsolidationInput,
}

#[derive(Debug, Serialize)]
struct PolicyListing {
    job_family: JobFamily,
    label: &'static str,
    requires_simulation: bool,
    #[serde(flatten)]
    policy: PolicyRow,
}

/// Router builder exposing the policy table, consolidation and the simulation gate.
pub fn recruitment_router<R, A>(service: SharedService<R, A>) -> Router
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    Router::new()
        .route("/api/v1/policies", get(policies_handler))
        .route("/api/v1/consolidation", post(consolidate_handler::<R, A>))
        .route(
            "/api/v1/candidates/:candidate_id/consolidation",
            post(consolidate_candidate_handler::<R, A>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/decision",
            get(decision_handler::<R, A>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/simulation-unlock",
            get(simulation_unlock_handler::<R, A>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/phase1-summary",
            get(phase1_summary_handler::<R, A>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/face-to-face",
            put(face_to_face_handler::<R, A>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/technical-scores",
            put(technical_scores_handler::<R, A>),
        )
        .with_state(service)
}

pub(crate) async fn policies_handler() -> Response {
    let listings: Vec<PolicyListing> = policy_table()
        .map(|(job_family, policy)| PolicyListing {
            job_family,
            label: job_family.label(),
            requires_simulation: job_family.requires_simulation(),
            policy: *policy,
        })
        .collect();
    (StatusCode::OK, axum::Json(listings)).into_response()
}

pub(crate) async fn consolidate_handler<R, A>(
    State(service): State<SharedService<R, A>>,
    axum::Json(request): axum::Json<ConsolidationRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    match service.consolidate_input(&request.job_family, &request.input) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn consolidate_candidate_handler<R, A>(
    State(service): State<SharedService<R, A>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    match service.consolidate_candidate(&CandidateId(candidate_id)) {
        Ok(decision) => (StatusCode::OK, axum::Json(decision)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn decision_handler<R, A>(
    State(service): State<SharedService<R, A>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    let id = CandidateId(candidate_id);
    match service.decision(&id) {
        Ok(decision) => (StatusCode::OK, axum::Json(decision.status_view())).into_response(),
        Err(RecruitmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "candidate_id": id.0,
                "final_decision": serde_json::Value::Null,
                "decision_rationale": "pending consolidation",
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn simulation_unlock_handler<R, A>(
    State(service): State<SharedService<R, A>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    match service.simulation_unlock(&CandidateId(candidate_id)) {
        Ok(status) => (StatusCode::OK, axum::Json(status)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn phase1_summary_handler<R, A>(
    State(service): State<SharedService<R, A>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    match service.phase1_summary(&CandidateId(candidate_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn face_to_face_handler<R, A>(
    State(service): State<SharedService<R, A>>,
    Path(candidate_id): Path<String>,
    axum::Json(submission): axum::Json<FaceToFaceSubmission>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    match service.submit_face_to_face(&CandidateId(candidate_id), submission) {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn technical_scores_handler<R, A>(
    State(service): State<SharedService<R, A>>,
    Path(candidate_id): Path<String>,
    axum::Json(scores): axum::Json<TechnicalScores>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    match service.record_technical_scores(&CandidateId(candidate_id), scores) {
        Ok(scores) => (StatusCode::OK, axum::Json(scores)).into_response(),
        Err(other) => error_response(other),
    }
}

fn error_response(error: RecruitmentServiceError) -> Response {
    match error {
        RecruitmentServiceError::SimulationLocked { missing_conditions } => {
            let payload = json!({
                "error": "simulation is locked",
                "missing_conditions": missing_conditions,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        error @ (RecruitmentServiceError::Validation(_)
        | RecruitmentServiceError::UnknownJobFamily(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        error if error.is_not_found() => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
