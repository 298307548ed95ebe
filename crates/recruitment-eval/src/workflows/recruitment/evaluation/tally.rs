//! Juror verdicts, collected for display.
//!
//! Nothing in here is read by the simulation gate or the consolidation engine: both
//! decide on criterion averages, and individual FAVORABLE/DEFAVORABLE votes stay
//! informational.

use serde::{Deserialize, Serialize};

use super::super::domain::{
    EvaluationPhase, FaceToFaceScore, JuryMemberId, JurorDecision, SessionJuror,
};

/// One juror's verdict for a phase, with the roster name when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurorDecisionView {
    pub jury_member_id: JuryMemberId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub decision: JurorDecision,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTally {
    pub favorable: usize,
    pub defavorable: usize,
    pub pending: usize,
}

impl DecisionTally {
    pub fn total(&self) -> usize {
        self.favorable + self.defavorable + self.pending
    }
}

pub fn juror_decisions(
    roster: &[SessionJuror],
    scores: &[FaceToFaceScore],
    phase: EvaluationPhase,
) -> Vec<JurorDecisionView> {
    scores
        .iter()
        .filter(|score| score.phase == phase)
        .map(|score| JurorDecisionView {
            jury_member_id: score.jury_member_id.clone(),
            full_name: roster
                .iter()
                .find(|juror| juror.jury_member_id == score.jury_member_id)
                .map(|juror| juror.full_name.clone()),
            decision: score.decision,
        })
        .collect()
}

pub fn tally(scores: &[FaceToFaceScore], phase: EvaluationPhase) -> DecisionTally {
    scores
        .iter()
        .filter(|score| score.phase == phase)
        .fold(DecisionTally::default(), |mut tally, score| {
            match score.decision {
                JurorDecision::Favorable => tally.favorable += 1,
                JurorDecision::Defavorable => tally.defavorable += 1,
                JurorDecision::Pending => tally.pending += 1,
            }
            tally
        })
}
