use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::domain::{
    Candidate, CandidateId, EvaluationPhase, FaceToFaceScore, FaceToFaceSubmission, JobFamily,
    ScoreValue, SessionId, SessionJuror, TechnicalScores, UnknownJobFamily,
};
use super::evaluation::{
    juror_decisions, phase_average, policy_for, tally, ConsolidationInput, ConsolidationResult,
    DecisionTally, EvaluationConfig, EvaluationEngine, JurorDecisionView, Phase1Averages,
    PhaseScore, TechnicalTest, UnlockStatus,
};
use super::repository::{
    AuditAction, AuditEntry, AuditError, AuditTrail, CandidateDecision, EvaluationRepository,
    RepositoryError,
};

/// Service composing the repository, the audit trail, and the rule engine.
pub struct RecruitmentEvaluationService<R, A> {
    repository: Arc<R>,
    audit: Arc<A>,
    engine: Arc<EvaluationEngine>,
}

/// Phase-1 picture of a candidate for jury dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phase1Summary {
    pub candidate_id: CandidateId,
    pub job_family: JobFamily,
    pub average_score: f64,
    pub criteria: Phase1Averages,
    pub tally: DecisionTally,
    pub decisions: Vec<JurorDecisionView>,
}

impl<R, A> RecruitmentEvaluationService<R, A>
where
    R: EvaluationRepository + 'static,
    A: AuditTrail + 'static,
{
    pub fn new(repository: Arc<R>, audit: Arc<A>, config: EvaluationConfig) -> Self {
        Self {
            repository,
            audit,
            engine: Arc::new(EvaluationEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    /// Stateless consolidation for callers holding a raw job family code.
    pub fn consolidate_input(
        &self,
        job_family: &str,
        input: &ConsolidationInput,
    ) -> Result<ConsolidationResult, RecruitmentServiceError> {
        Ok(self.engine.consolidate_code(job_family, input)?)
    }

    /// Consolidate a registered candidate and persist the resulting decision.
    pub fn consolidate_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateDecision, RecruitmentServiceError> {
        let candidate = self.load_candidate(candidate_id)?;
        let scores = self.repository.face_to_face_scores(candidate_id)?;
        let technical = self
            .repository
            .technical_scores(candidate_id)?
            .unwrap_or_default();

        let input = ConsolidationInput::from_records(&scores, technical);
        let result = self.engine.consolidate(candidate.job_family, &input);
        let decision = CandidateDecision::from_result(candidate.id.clone(), result, Utc::now());

        self.repository.save_decision(decision.clone())?;

        let mut details = BTreeMap::new();
        details.insert(
            "final_decision".to_string(),
            decision.final_decision.label().to_string(),
        );
        details.insert(
            "average_phase1".to_string(),
            format!("{:.2}", decision.consolidation.average_phase1),
        );
        details.insert(
            "average_phase2".to_string(),
            format!("{:.2}", decision.consolidation.average_phase2),
        );
        self.audit.record(AuditEntry {
            action: AuditAction::DecisionConsolidated,
            candidate_id: candidate.id.clone(),
            actor: None,
            details,
            recorded_at: decision.decided_at,
        })?;

        info!(
            candidate = %candidate.id,
            job_family = %candidate.job_family,
            decision = decision.final_decision.label(),
            "candidate decision consolidated"
        );

        Ok(decision)
    }

    /// Last persisted decision for a candidate.
    pub fn decision(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateDecision, RecruitmentServiceError> {
        self.load_candidate(candidate_id)?;
        let decision = self
            .repository
            .decision(candidate_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(decision)
    }

    /// Simulation-unlock status recomputed from the current roster and phase-1 scores.
    pub fn simulation_unlock(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<UnlockStatus, RecruitmentServiceError> {
        let candidate = self.load_candidate(candidate_id)?;
        let roster = self.load_roster(&candidate.session_id)?;
        let scores = self.repository.face_to_face_scores(candidate_id)?;

        Ok(self
            .engine
            .check_unlock(candidate.job_family, &roster, &scores))
    }

    pub fn phase1_summary(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Phase1Summary, RecruitmentServiceError> {
        let candidate = self.load_candidate(candidate_id)?;
        let roster = self.load_roster(&candidate.session_id)?;
        let scores = self.repository.face_to_face_scores(candidate_id)?;
        let phase_scores: Vec<PhaseScore> = scores.iter().map(PhaseScore::from).collect();

        Ok(Phase1Summary {
            candidate_id: candidate.id,
            job_family: candidate.job_family,
            average_score: phase_average(&phase_scores, EvaluationPhase::Phase1),
            criteria: Phase1Averages::compute(candidate.job_family, &scores),
            tally: tally(&scores, EvaluationPhase::Phase1),
            decisions: juror_decisions(&roster, &scores, EvaluationPhase::Phase1),
        })
    }

    /// Validate and store a juror's evaluation, replacing any earlier one for the same phase.
    pub fn submit_face_to_face(
        &self,
        candidate_id: &CandidateId,
        submission: FaceToFaceSubmission,
    ) -> Result<FaceToFaceScore, RecruitmentServiceError> {
        let candidate = self.load_candidate(candidate_id)?;
        let roster = self.load_roster(&candidate.session_id)?;

        let juror = roster
            .iter()
            .find(|juror| juror.jury_member_id == submission.jury_member_id)
            .ok_or_else(|| {
                RecruitmentServiceError::Validation(format!(
                    "jury member {} is not on the session roster",
                    submission.jury_member_id
                ))
            })?;
        if !juror.was_present {
            return Err(RecruitmentServiceError::Validation(format!(
                "jury member {} was absent from session {}",
                juror.jury_member_id, candidate.session_id
            )));
        }
        if !juror.evaluates(candidate.job_family) {
            return Err(RecruitmentServiceError::Validation(format!(
                "jury member {} does not evaluate {} candidates",
                juror.jury_member_id, candidate.job_family
            )));
        }

        if submission.phase == EvaluationPhase::Phase2 {
            self.ensure_phase2_open(&candidate, &roster)?;
        }

        let score = self.normalize_submission(&candidate.id, submission)?;
        let stored = self.repository.upsert_face_to_face(score)?;

        let mut details = BTreeMap::new();
        details.insert("phase".to_string(), u8::from(stored.phase).to_string());
        details.insert("score".to_string(), format!("{:.2}", stored.score));
        details.insert("decision".to_string(), stored.decision.label().to_string());
        self.audit.record(AuditEntry {
            action: AuditAction::FaceToFaceRecorded,
            candidate_id: candidate.id.clone(),
            actor: Some(stored.jury_member_id.clone()),
            details,
            recorded_at: stored.evaluated_at,
        })?;

        info!(
            candidate = %candidate.id,
            juror = %stored.jury_member_id,
            phase = u8::from(stored.phase),
            "face-to-face evaluation recorded"
        );

        Ok(stored)
    }

    /// Store the candidate's technical test results as submitted; the engine normalizes them.
    pub fn record_technical_scores(
        &self,
        candidate_id: &CandidateId,
        scores: TechnicalScores,
    ) -> Result<TechnicalScores, RecruitmentServiceError> {
        let candidate = self.load_candidate(candidate_id)?;

        let details: BTreeMap<String, String> = TechnicalTest::ordered()
            .into_iter()
            .filter_map(|test| {
                test.value_in(&scores)
                    .map(|value| (format!("{test:?}"), value.to_string()))
            })
            .collect();

        self.repository
            .upsert_technical_scores(&candidate.id, scores.clone())?;
        self.audit.record(AuditEntry {
            action: AuditAction::TechnicalScoresRecorded,
            candidate_id: candidate.id,
            actor: None,
            details,
            recorded_at: Utc::now(),
        })?;

        Ok(scores)
    }

    fn load_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Candidate, RecruitmentServiceError> {
        self.repository
            .candidate(candidate_id)?
            .ok_or_else(|| RecruitmentServiceError::CandidateNotFound(candidate_id.clone()))
    }

    fn load_roster(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<SessionJuror>, RecruitmentServiceError> {
        self.repository
            .session_roster(session_id)?
            .ok_or_else(|| RecruitmentServiceError::SessionNotFound(session_id.clone()))
    }

    fn ensure_phase2_open(
        &self,
        candidate: &Candidate,
        roster: &[SessionJuror],
    ) -> Result<(), RecruitmentServiceError> {
        if !policy_for(candidate.job_family).requires_phase2 {
            return Err(RecruitmentServiceError::Validation(format!(
                "{} candidates have no phase 2",
                candidate.job_family
            )));
        }

        if candidate.job_family.requires_simulation() {
            let scores = self.repository.face_to_face_scores(&candidate.id)?;
            let status = self
                .engine
                .check_unlock(candidate.job_family, roster, &scores);
            if !status.unlocked {
                return Err(RecruitmentServiceError::SimulationLocked {
                    missing_conditions: status.missing_conditions,
                });
            }
        }

        Ok(())
    }

    fn normalize_submission(
        &self,
        candidate_id: &CandidateId,
        submission: FaceToFaceSubmission,
    ) -> Result<FaceToFaceScore, RecruitmentServiceError> {
        let optional = |value: &Option<ScoreValue>, field: &'static str| {
            value
                .as_ref()
                .map(|value| self.normalize_value(value, field))
                .transpose()
        };

        Ok(FaceToFaceScore {
            candidate_id: candidate_id.clone(),
            jury_member_id: submission.jury_member_id.clone(),
            phase: submission.phase,
            score: self.normalize_value(&submission.score, "score")?,
            presentation_visuelle: optional(
                &submission.presentation_visuelle,
                "presentation_visuelle",
            )?,
            verbal_communication: optional(
                &submission.verbal_communication,
                "verbal_communication",
            )?,
            voice_quality: optional(&submission.voice_quality, "voice_quality")?,
            appetence_digitale: optional(&submission.appetence_digitale, "appetence_digitale")?,
            simulation_sens_negociation: optional(
                &submission.simulation_sens_negociation,
                "simulation_sens_negociation",
            )?,
            simulation_capacite_persuasion: optional(
                &submission.simulation_capacite_persuasion,
                "simulation_capacite_persuasion",
            )?,
            simulation_sens_combativite: optional(
                &submission.simulation_sens_combativite,
                "simulation_sens_combativite",
            )?,
            decision: submission.decision,
            comments: submission.comments,
            evaluated_at: Utc::now(),
        })
    }

    fn normalize_value(
        &self,
        value: &ScoreValue,
        field: &'static str,
    ) -> Result<f64, RecruitmentServiceError> {
        let max = self.engine.config().score_scale_max;
        let normalized = value
            .to_f64()
            .map_err(|err| RecruitmentServiceError::Validation(format!("{field}: {err}")))?;

        if (0.0..=max).contains(&normalized) {
            Ok(normalized)
        } else {
            Err(RecruitmentServiceError::Validation(format!(
                "{field} must be between 0 and {max}, found {normalized}"
            )))
        }
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum RecruitmentServiceError {
    #[error("candidate {0} not found")]
    CandidateNotFound(CandidateId),
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("invalid evaluation: {0}")]
    Validation(String),
    #[error("simulation is locked: {}", .missing_conditions.join("; "))]
    SimulationLocked { missing_conditions: Vec<String> },
    #[error(transparent)]
    UnknownJobFamily(#[from] UnknownJobFamily),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl RecruitmentServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RecruitmentServiceError::CandidateNotFound(_)
                | RecruitmentServiceError::SessionNotFound(_)
                | RecruitmentServiceError::Repository(RepositoryError::NotFound)
        )
    }
}
