mod averaging;
mod config;
mod consolidation;
mod policy;
mod tally;
mod unlock;

pub use averaging::{mean, mean_of_present, phase_average, Phase1Averages, PhaseScore};
pub use config::{EvaluationConfig, JobFamilyLookup};
pub use consolidation::{
    consolidate, ConsolidationDetails, ConsolidationInput, ConsolidationResult,
    TechnicalTestResult,
};
pub use policy::{
    lookup_policy, policy_for, policy_table, resolve_job_family, PolicyRow, TechnicalTest,
    TypingThreshold,
};
pub use tally::{juror_decisions, tally, DecisionTally, JurorDecisionView};
pub use unlock::{
    check_unlock, expected_jurors, UnlockConditions, UnlockStatus, SIMULATION_UNLOCK_THRESHOLD,
};

use super::domain::{FaceToFaceScore, JobFamily, SessionJuror, UnknownJobFamily};

/// Stateless evaluator applying the policy table; carries only lookup settings.
#[derive(Debug, Clone, Default)]
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl EvaluationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn consolidate(
        &self,
        job_family: JobFamily,
        input: &ConsolidationInput,
    ) -> ConsolidationResult {
        consolidate(job_family, input)
    }

    /// Consolidate from a raw job family code, resolved per the configured lookup mode.
    pub fn consolidate_code(
        &self,
        job_family: &str,
        input: &ConsolidationInput,
    ) -> Result<ConsolidationResult, UnknownJobFamily> {
        let family = resolve_job_family(job_family, self.config.job_family_lookup)?;
        Ok(consolidate(family, input))
    }

    pub fn check_unlock(
        &self,
        job_family: JobFamily,
        roster: &[SessionJuror],
        scores: &[FaceToFaceScore],
    ) -> UnlockStatus {
        check_unlock(job_family, roster, scores)
    }
}
