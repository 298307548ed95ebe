use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::super::domain::{EvaluationPhase, FaceToFaceScore, JobFamily, TechnicalScores};
use super::averaging::{phase_average, PhaseScore};
use super::policy::{policy_for, TechnicalTest};

/// Everything the engine reads for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationInput {
    #[serde(default)]
    pub face_to_face_scores: Vec<PhaseScore>,
    #[serde(flatten)]
    pub technical: TechnicalScores,
}

impl ConsolidationInput {
    pub fn from_records(scores: &[FaceToFaceScore], technical: TechnicalScores) -> Self {
        Self {
            face_to_face_scores: scores.iter().map(PhaseScore::from).collect(),
            technical,
        }
    }
}

/// Outcome of a single technical test against its policy minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalTestResult {
    pub passed: bool,
    pub value: f64,
    /// Minimum the job family requires.
    pub required: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationDetails {
    pub phase1_passed: bool,
    pub phase2_passed: bool,
    pub technical_tests: BTreeMap<TechnicalTest, TechnicalTestResult>,
}

/// Admission decision with the averages and per-test trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationResult {
    pub job_family: JobFamily,
    pub is_admitted: bool,
    pub average_phase1: f64,
    pub average_phase2: f64,
    pub details: ConsolidationDetails,
}

impl ConsolidationResult {
    pub fn summary(&self) -> String {
        if self.is_admitted {
            return format!(
                "admitted ({}, phase 1 {:.2}, phase 2 {:.2})",
                self.job_family, self.average_phase1, self.average_phase2
            );
        }

        let mut reasons = Vec::new();
        if !self.details.phase1_passed {
            reasons.push(format!("phase 1 average {:.2}", self.average_phase1));
        }
        if !self.details.phase2_passed {
            reasons.push(format!("phase 2 average {:.2}", self.average_phase2));
        }
        for (test, result) in &self.details.technical_tests {
            if !result.passed {
                reasons.push(format!(
                    "{} {} below {}",
                    test.label(),
                    result.value,
                    result.required
                ));
            }
        }

        format!("not admitted: {}", reasons.join("; "))
    }
}

/// Apply the job family's policy row to phase averages and technical results.
///
/// Phase averages are taken per phase. A required test with no value on file is
/// treated as not evaluated yet and does not block admission; an unreadable value
/// is logged and treated the same way.
pub fn consolidate(job_family: JobFamily, input: &ConsolidationInput) -> ConsolidationResult {
    let policy = policy_for(job_family);

    let average_phase1 = phase_average(&input.face_to_face_scores, EvaluationPhase::Phase1);
    let average_phase2 = phase_average(&input.face_to_face_scores, EvaluationPhase::Phase2);

    let phase1_passed = average_phase1 >= policy.min_phase1;
    let phase2_passed = !policy.requires_phase2 || average_phase2 >= policy.min_phase2;

    let mut is_admitted = true;
    let mut technical_tests = BTreeMap::new();

    for (test, minimum) in policy.required_tests() {
        let Some(raw) = test.value_in(&input.technical) else {
            continue;
        };

        let value = match raw.to_f64() {
            Ok(value) => value,
            Err(err) => {
                warn!(%job_family, test = ?test, %err, "skipping unreadable technical score");
                continue;
            }
        };

        let passed = value >= minimum;
        is_admitted &= passed;
        technical_tests.insert(
            test,
            TechnicalTestResult {
                passed,
                value,
                required: minimum,
            },
        );
    }

    let is_admitted = is_admitted && phase1_passed && phase2_passed;

    debug!(
        %job_family,
        average_phase1,
        average_phase2,
        phase1_passed,
        phase2_passed,
        is_admitted,
        "consolidated candidate"
    );

    ConsolidationResult {
        job_family,
        is_admitted,
        average_phase1,
        average_phase2,
        details: ConsolidationDetails {
            phase1_passed,
            phase2_passed,
            technical_tests,
        },
    }
}
