use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::recruitment::domain::{
    Candidate, CandidateId, EvaluationPhase, FaceToFaceScore, FaceToFaceSubmission, JobFamily,
    JurorDecision, JurorRole, JuryMemberId, ScoreValue, SessionId, SessionJuror, TechnicalScores,
};
use crate::workflows::recruitment::evaluation::{EvaluationConfig, JobFamilyLookup};
use crate::workflows::recruitment::repository::{
    AuditEntry, AuditError, AuditTrail, CandidateDecision, EvaluationRepository, RepositoryError,
};
use crate::workflows::recruitment::{recruitment_router, RecruitmentEvaluationService};

pub(super) type MemoryService = RecruitmentEvaluationService<MemoryRepository, MemoryAudit>;

pub(super) fn evaluation_config() -> EvaluationConfig {
    EvaluationConfig {
        job_family_lookup: JobFamilyLookup::Lenient,
        score_scale_max: 5.0,
    }
}

pub(super) fn session_id() -> SessionId {
    SessionId("session-2025-03".to_string())
}

pub(super) fn juror(
    id: &str,
    name: &str,
    role_type: JurorRole,
    specialite: Option<JobFamily>,
    was_present: bool,
) -> SessionJuror {
    SessionJuror {
        jury_member_id: JuryMemberId(id.to_string()),
        full_name: name.to_string(),
        role_type,
        specialite,
        was_present,
    }
}

/// DRH, EPC, one business representative per simulation family, and an absent WFM juror.
pub(super) fn roster() -> Vec<SessionJuror> {
    vec![
        juror("drh-1", "Nadia Bennani", JurorRole::Drh, None, true),
        juror("epc-1", "Youssef Alaoui", JurorRole::Epc, None, true),
        juror(
            "rm-agences",
            "Salma Idrissi",
            JurorRole::RepresentantMetier,
            Some(JobFamily::Agences),
            true,
        ),
        juror(
            "rm-televente",
            "Karim Tazi",
            JurorRole::RepresentantMetier,
            Some(JobFamily::Televente),
            true,
        ),
        juror("wfm-1", "Imane Fassi", JurorRole::WfmJury, None, false),
    ]
}

/// Jurors expected to evaluate an AGENCES candidate on [`roster`].
pub(super) const AGENCES_JURORS: [&str; 3] = ["drh-1", "epc-1", "rm-agences"];

pub(super) fn candidate(id: &str, job_family: JobFamily) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        session_id: session_id(),
        full_name: format!("Candidate {id}"),
        job_family,
    }
}

/// Face-to-face record with every phase-1 criterion set to `score`.
pub(super) fn ff_score(
    candidate_id: &str,
    juror_id: &str,
    phase: EvaluationPhase,
    score: f64,
) -> FaceToFaceScore {
    FaceToFaceScore {
        candidate_id: CandidateId(candidate_id.to_string()),
        jury_member_id: JuryMemberId(juror_id.to_string()),
        phase,
        score,
        presentation_visuelle: Some(score),
        verbal_communication: Some(score),
        voice_quality: Some(score),
        appetence_digitale: None,
        simulation_sens_negociation: None,
        simulation_capacite_persuasion: None,
        simulation_sens_combativite: None,
        decision: JurorDecision::Favorable,
        comments: None,
        evaluated_at: Utc
            .with_ymd_and_hms(2025, 3, 12, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn submission(juror_id: &str, phase: EvaluationPhase, score: f64) -> FaceToFaceSubmission {
    FaceToFaceSubmission {
        jury_member_id: JuryMemberId(juror_id.to_string()),
        phase,
        score: ScoreValue::Number(score),
        presentation_visuelle: Some(ScoreValue::Number(score)),
        verbal_communication: Some(ScoreValue::Number(score)),
        voice_quality: Some(ScoreValue::Number(score)),
        appetence_digitale: None,
        simulation_sens_negociation: None,
        simulation_capacite_persuasion: None,
        simulation_sens_combativite: None,
        decision: JurorDecision::Favorable,
        comments: None,
    }
}

pub(super) fn passing_technical() -> TechnicalScores {
    TechnicalScores {
        typing_speed: Some(ScoreValue::Number(32.0)),
        typing_accuracy: Some(ScoreValue::Number(92.0)),
        excel_test: Some(ScoreValue::Number(4.0)),
        dictation: Some(ScoreValue::Number(17.0)),
        sales_simulation: Some(ScoreValue::Number(4.0)),
        psychotechnical_test: Some(ScoreValue::Number(9.0)),
        analysis_exercise: Some(ScoreValue::Number(7.0)),
    }
}

pub(super) fn build_service() -> (MemoryService, Arc<MemoryRepository>, Arc<MemoryAudit>) {
    let repository = Arc::new(MemoryRepository::default());
    repository.add_session(session_id(), roster());
    let audit = Arc::new(MemoryAudit::default());
    let service =
        RecruitmentEvaluationService::new(repository.clone(), audit.clone(), evaluation_config());
    (service, repository, audit)
}

pub(super) fn recruitment_router_with_service(service: MemoryService) -> axum::Router {
    recruitment_router(Arc::new(service))
}

type ScoreKey = (CandidateId, JuryMemberId, EvaluationPhase);

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    candidates: Arc<Mutex<HashMap<CandidateId, Candidate>>>,
    sessions: Arc<Mutex<HashMap<SessionId, Vec<SessionJuror>>>>,
    scores: Arc<Mutex<HashMap<ScoreKey, FaceToFaceScore>>>,
    technical: Arc<Mutex<HashMap<CandidateId, TechnicalScores>>>,
    decisions: Arc<Mutex<HashMap<CandidateId, CandidateDecision>>>,
}

impl MemoryRepository {
    pub(super) fn add_session(&self, id: SessionId, roster: Vec<SessionJuror>) {
        self.sessions
            .lock()
            .expect("repository mutex poisoned")
            .insert(id, roster);
    }

    pub(super) fn add_candidate(&self, candidate: Candidate) {
        self.candidates
            .lock()
            .expect("repository mutex poisoned")
            .insert(candidate.id.clone(), candidate);
    }

    pub(super) fn add_scores(&self, scores: impl IntoIterator<Item = FaceToFaceScore>) {
        let mut guard = self.scores.lock().expect("repository mutex poisoned");
        for score in scores {
            guard.insert(
                (
                    score.candidate_id.clone(),
                    score.jury_member_id.clone(),
                    score.phase,
                ),
                score,
            );
        }
    }
}

impl EvaluationRepository for MemoryRepository {
    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let guard = self.candidates.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn session_roster(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Vec<SessionJuror>>, RepositoryError> {
        let guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard.get(session_id).cloned())
    }

    fn face_to_face_scores(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<FaceToFaceScore>, RepositoryError> {
        let guard = self.scores.lock().expect("repository mutex poisoned");
        let mut scores: Vec<FaceToFaceScore> = guard
            .values()
            .filter(|score| &score.candidate_id == candidate_id)
            .cloned()
            .collect();
        scores.sort_by(|a, b| {
            (a.phase, &a.jury_member_id).cmp(&(b.phase, &b.jury_member_id))
        });
        Ok(scores)
    }

    fn upsert_face_to_face(
        &self,
        score: FaceToFaceScore,
    ) -> Result<FaceToFaceScore, RepositoryError> {
        self.add_scores([score.clone()]);
        Ok(score)
    }

    fn technical_scores(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<TechnicalScores>, RepositoryError> {
        let guard = self.technical.lock().expect("repository mutex poisoned");
        Ok(guard.get(candidate_id).cloned())
    }

    fn upsert_technical_scores(
        &self,
        candidate_id: &CandidateId,
        scores: TechnicalScores,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.technical.lock().expect("repository mutex poisoned");
        guard.insert(candidate_id.clone(), scores);
        Ok(())
    }

    fn save_decision(&self, decision: CandidateDecision) -> Result<(), RepositoryError> {
        let mut guard = self.decisions.lock().expect("repository mutex poisoned");
        guard.insert(decision.candidate_id.clone(), decision);
        Ok(())
    }

    fn decision(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<CandidateDecision>, RepositoryError> {
        let guard = self.decisions.lock().expect("repository mutex poisoned");
        Ok(guard.get(candidate_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditTrail for MemoryAudit {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl EvaluationRepository for UnavailableRepository {
    fn candidate(&self, _id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn session_roster(
        &self,
        _session_id: &SessionId,
    ) -> Result<Option<Vec<SessionJuror>>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn face_to_face_scores(
        &self,
        _candidate_id: &CandidateId,
    ) -> Result<Vec<FaceToFaceScore>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_face_to_face(
        &self,
        _score: FaceToFaceScore,
    ) -> Result<FaceToFaceScore, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn technical_scores(
        &self,
        _candidate_id: &CandidateId,
    ) -> Result<Option<TechnicalScores>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_technical_scores(
        &self,
        _candidate_id: &CandidateId,
        _scores: TechnicalScores,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_decision(&self, _decision: CandidateDecision) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn decision(
        &self,
        _candidate_id: &CandidateId,
    ) -> Result<Option<CandidateDecision>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflineAudit;

impl AuditTrail for OfflineAudit {
    fn record(&self, _entry: AuditEntry) -> Result<(), AuditError> {
        Err(AuditError::Transport("audit sink offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
