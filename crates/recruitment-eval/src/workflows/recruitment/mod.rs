//! Recruitment evaluation: threshold policies, phase averaging, consolidation of the
//! admission decision, and the gate that opens the phase-2 simulation for AGENCES and
//! TELEVENTE candidates.

pub mod domain;
pub mod evaluation;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateId, EvaluationPhase, FaceToFaceScore, FaceToFaceSubmission, InvalidScore,
    JobFamily, JurorDecision, JurorRef, JurorRole, JuryMemberId, ScoreValue, SessionId,
    SessionJuror, TechnicalScores, UnknownJobFamily,
};
pub use evaluation::{
    ConsolidationInput, ConsolidationResult, EvaluationConfig, EvaluationEngine, JobFamilyLookup,
    PolicyRow, TechnicalTest, UnlockStatus,
};
pub use import::{ScoreSheetImportError, ScoreSheetImporter};
pub use repository::{
    AuditAction, AuditEntry, AuditError, AuditTrail, CandidateDecision, CandidateDecisionView,
    EvaluationRepository, FinalDecision, RepositoryError,
};
pub use router::{recruitment_router, ConsolidationRequest};
pub use service::{Phase1Summary, RecruitmentEvaluationService, RecruitmentServiceError};
