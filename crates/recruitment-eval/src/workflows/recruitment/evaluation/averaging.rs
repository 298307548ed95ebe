use serde::{Deserialize, Serialize};

use super::super::domain::{EvaluationPhase, FaceToFaceScore, JobFamily};

/// Overall score of one juror for one phase, the only field consolidation reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseScore {
    pub phase: EvaluationPhase,
    pub score: f64,
}

impl From<&FaceToFaceScore> for PhaseScore {
    fn from(score: &FaceToFaceScore) -> Self {
        Self {
            phase: score.phase,
            score: score.score,
        }
    }
}

/// Arithmetic mean; `0.0` when there is nothing to average, so "no evaluations yet"
/// fails every threshold instead of passing it.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mean over the entries that carry a value; unset entries leave the denominator.
pub fn mean_of_present<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    mean(values.into_iter().flatten())
}

/// Mean overall score of the records that belong to `phase`.
pub fn phase_average<'a, I>(scores: I, phase: EvaluationPhase) -> f64
where
    I: IntoIterator<Item = &'a PhaseScore>,
{
    mean(
        scores
            .into_iter()
            .filter(|score| score.phase == phase)
            .map(|score| score.score),
    )
}

/// Per-criterion phase-1 averages across jurors.
///
/// Verbal communication and voice quality count every phase-1 record (an unset value
/// weighs as zero). Visual presentation is only scored for AGENCES and appetence
/// digitale only for RESEAUX_SOCIAUX; both average over the records that carry them
/// and are `None` for other job families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase1Averages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_visuelle: Option<f64>,
    pub verbal_communication: f64,
    pub voice_quality: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appetence_digitale: Option<f64>,
}

impl Phase1Averages {
    pub fn compute(job_family: JobFamily, scores: &[FaceToFaceScore]) -> Self {
        let phase1 = || {
            scores
                .iter()
                .filter(|score| score.phase == EvaluationPhase::Phase1)
        };

        let verbal_communication = mean(
            phase1().map(|score| score.verbal_communication.unwrap_or(0.0)),
        );
        let voice_quality = mean(phase1().map(|score| score.voice_quality.unwrap_or(0.0)));

        let presentation_visuelle = (job_family == JobFamily::Agences)
            .then(|| mean_of_present(phase1().map(|score| score.presentation_visuelle)));
        let appetence_digitale = (job_family == JobFamily::ReseauxSociaux)
            .then(|| mean_of_present(phase1().map(|score| score.appetence_digitale)));

        Self {
            presentation_visuelle,
            verbal_communication,
            voice_quality,
            appetence_digitale,
        }
    }

    pub fn empty() -> Self {
        Self {
            presentation_visuelle: None,
            verbal_communication: 0.0,
            voice_quality: 0.0,
            appetence_digitale: None,
        }
    }
}
