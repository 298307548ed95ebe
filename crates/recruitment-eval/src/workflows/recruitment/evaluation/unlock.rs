use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::super::domain::{
    EvaluationPhase, FaceToFaceScore, JobFamily, JuryMemberId, JurorRef, SessionJuror,
};
use super::averaging::Phase1Averages;
use super::tally::{juror_decisions, JurorDecisionView};

/// Every phase-1 criterion average must reach this value on the 0–5 scale.
pub const SIMULATION_UNLOCK_THRESHOLD: f64 = 3.0;

pub(crate) const NOT_SIMULATION_FAMILY: &str = "Job family does not require simulation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockConditions {
    pub all_jurys_evaluated_phase1: bool,
    pub all_averages_above_threshold: bool,
    pub is_correct_metier: bool,
}

/// Whether the phase-2 simulation is open for a candidate, and why not when it is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockStatus {
    pub unlocked: bool,
    pub conditions: UnlockConditions,
    pub phase1_averages: Phase1Averages,
    pub missing_jurys: Vec<JurorRef>,
    pub missing_conditions: Vec<String>,
    /// Display only. Votes never open or close the gate.
    pub juror_decisions: Vec<JurorDecisionView>,
}

/// Jurors who must score this candidate: present members of the session, with
/// business representatives limited to their own job family.
pub fn expected_jurors(job_family: JobFamily, roster: &[SessionJuror]) -> Vec<&SessionJuror> {
    roster
        .iter()
        .filter(|juror| juror.was_present && juror.evaluates(job_family))
        .collect()
}

/// Decide whether phase 2 opens.
///
/// The gate is average-based: it opens once every expected juror has scored phase 1
/// and the verbal, voice and (for AGENCES) presentation averages reach the threshold.
/// Individual juror decisions are reported but do not take part in the decision, so a
/// candidate can be unlocked even when some jurors voted DEFAVORABLE.
pub fn check_unlock(
    job_family: JobFamily,
    roster: &[SessionJuror],
    scores: &[FaceToFaceScore],
) -> UnlockStatus {
    let is_correct_metier = job_family.requires_simulation();
    if !is_correct_metier {
        return UnlockStatus {
            unlocked: false,
            conditions: UnlockConditions {
                all_jurys_evaluated_phase1: false,
                all_averages_above_threshold: false,
                is_correct_metier,
            },
            phase1_averages: Phase1Averages::empty(),
            missing_jurys: Vec::new(),
            missing_conditions: vec![NOT_SIMULATION_FAMILY.to_string()],
            juror_decisions: Vec::new(),
        };
    }

    let phase1: Vec<FaceToFaceScore> = scores
        .iter()
        .filter(|score| score.phase == EvaluationPhase::Phase1)
        .cloned()
        .collect();

    let expected = expected_jurors(job_family, roster);
    let evaluated: BTreeSet<&JuryMemberId> =
        phase1.iter().map(|score| &score.jury_member_id).collect();
    let missing_jurys: Vec<JurorRef> = expected
        .iter()
        .filter(|juror| !evaluated.contains(&juror.jury_member_id))
        .map(|juror| juror.reference())
        .collect();

    let all_jurys_evaluated_phase1 = missing_jurys.is_empty() && !expected.is_empty();

    let averages = Phase1Averages::compute(job_family, &phase1);
    let verbal_ok = averages.verbal_communication >= SIMULATION_UNLOCK_THRESHOLD;
    let voice_ok = averages.voice_quality >= SIMULATION_UNLOCK_THRESHOLD;
    let presentation_ok = averages
        .presentation_visuelle
        .map_or(true, |average| average >= SIMULATION_UNLOCK_THRESHOLD);
    let all_averages_above_threshold = verbal_ok && voice_ok && presentation_ok;

    let mut missing_conditions = Vec::new();
    if expected.is_empty() {
        missing_conditions
            .push("No present juror is expected to evaluate this candidate".to_string());
    } else if !missing_jurys.is_empty() {
        let names = missing_jurys
            .iter()
            .map(|juror| format!("{} ({})", juror.full_name, juror.role_type.label()))
            .collect::<Vec<_>>()
            .join(", ");
        missing_conditions.push(format!("Phase 1 evaluation missing from: {names}"));
    }
    if !verbal_ok {
        missing_conditions.push(format!(
            "Verbal communication average {:.2} is below {}",
            averages.verbal_communication, SIMULATION_UNLOCK_THRESHOLD
        ));
    }
    if !voice_ok {
        missing_conditions.push(format!(
            "Voice quality average {:.2} is below {}",
            averages.voice_quality, SIMULATION_UNLOCK_THRESHOLD
        ));
    }
    if !presentation_ok {
        missing_conditions.push(format!(
            "Visual presentation average {:.2} is below {}",
            averages.presentation_visuelle.unwrap_or(0.0),
            SIMULATION_UNLOCK_THRESHOLD
        ));
    }

    let unlocked = all_jurys_evaluated_phase1 && all_averages_above_threshold && is_correct_metier;

    UnlockStatus {
        unlocked,
        conditions: UnlockConditions {
            all_jurys_evaluated_phase1,
            all_averages_above_threshold,
            is_correct_metier,
        },
        phase1_averages: averages,
        missing_jurys,
        missing_conditions,
        juror_decisions: juror_decisions(roster, &phase1, EvaluationPhase::Phase1),
    }
}
