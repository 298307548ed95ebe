use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Candidate, CandidateId, FaceToFaceScore, JuryMemberId, JurorDecision, SessionId,
    SessionJuror, TechnicalScores,
};
use super::evaluation::{policy_for, ConsolidationResult};

/// Final hire/no-hire outcome stored on the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalDecision {
    Admitted,
    NotAdmitted,
}

impl FinalDecision {
    pub const fn label(self) -> &'static str {
        match self {
            FinalDecision::Admitted => "admitted",
            FinalDecision::NotAdmitted => "not_admitted",
        }
    }
}

/// Repository record of the last consolidation run for a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDecision {
    pub candidate_id: CandidateId,
    pub final_decision: FinalDecision,
    pub phase1_ff_decision: JurorDecision,
    /// `None` when the job family has no phase 2.
    pub phase2_ff_decision: Option<JurorDecision>,
    pub consolidation: ConsolidationResult,
    pub decided_at: DateTime<Utc>,
}

impl CandidateDecision {
    pub fn from_result(
        candidate_id: CandidateId,
        consolidation: ConsolidationResult,
        decided_at: DateTime<Utc>,
    ) -> Self {
        let verdict = |passed: bool| {
            if passed {
                JurorDecision::Favorable
            } else {
                JurorDecision::Defavorable
            }
        };

        let phase1_ff_decision = verdict(consolidation.details.phase1_passed);
        let phase2_ff_decision = policy_for(consolidation.job_family)
            .requires_phase2
            .then(|| verdict(consolidation.details.phase2_passed));
        let final_decision = if consolidation.is_admitted {
            FinalDecision::Admitted
        } else {
            FinalDecision::NotAdmitted
        };

        Self {
            candidate_id,
            final_decision,
            phase1_ff_decision,
            phase2_ff_decision,
            consolidation,
            decided_at,
        }
    }

    pub fn rationale(&self) -> String {
        self.consolidation.summary()
    }

    pub fn status_view(&self) -> CandidateDecisionView {
        CandidateDecisionView {
            candidate_id: self.candidate_id.clone(),
            final_decision: self.final_decision.label(),
            decision_rationale: self.rationale(),
            average_phase1: self.consolidation.average_phase1,
            average_phase2: self.consolidation.average_phase2,
            decided_at: self.decided_at,
        }
    }
}

/// Sanitized representation of a candidate's decision for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateDecisionView {
    pub candidate_id: CandidateId,
    pub final_decision: &'static str,
    pub decision_rationale: String,
    pub average_phase1: f64,
    pub average_phase2: f64,
    pub decided_at: DateTime<Utc>,
}

/// Data access the evaluation service needs. The rule engine itself never calls it.
pub trait EvaluationRepository: Send + Sync {
    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    /// Presence sheet of a session, `None` when the session does not exist.
    fn session_roster(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Vec<SessionJuror>>, RepositoryError>;
    fn face_to_face_scores(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<FaceToFaceScore>, RepositoryError>;
    /// Insert or replace the score keyed by (candidate, juror, phase).
    fn upsert_face_to_face(
        &self,
        score: FaceToFaceScore,
    ) -> Result<FaceToFaceScore, RepositoryError>;
    fn technical_scores(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<TechnicalScores>, RepositoryError>;
    fn upsert_technical_scores(
        &self,
        candidate_id: &CandidateId,
        scores: TechnicalScores,
    ) -> Result<(), RepositoryError>;
    fn save_decision(&self, decision: CandidateDecision) -> Result<(), RepositoryError>;
    fn decision(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<CandidateDecision>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound audit log hook (database table, log shipper, ...).
pub trait AuditTrail: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    FaceToFaceRecorded,
    TechnicalScoresRecorded,
    DecisionConsolidated,
}

/// Audit payload so routes and tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub candidate_id: CandidateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<JuryMemberId>,
    pub details: BTreeMap<String, String>,
    pub recorded_at: DateTime<Utc>,
}

/// Audit dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit trail unavailable: {0}")]
    Transport(String),
}
