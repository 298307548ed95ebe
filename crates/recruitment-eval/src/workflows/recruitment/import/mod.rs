mod parser;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::Utc;

use super::domain::{
    CandidateId, EvaluationPhase, FaceToFaceScore, JuryMemberId, JurorDecision, ScoreValue,
};
use super::evaluation::EvaluationConfig;

#[derive(Debug)]
pub enum ScoreSheetImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, message: String },
}

impl std::fmt::Display for ScoreSheetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreSheetImportError::Io(err) => write!(f, "failed to read score sheet: {}", err),
            ScoreSheetImportError::Csv(err) => write!(f, "invalid score sheet CSV: {}", err),
            ScoreSheetImportError::InvalidRow { line, message } => {
                write!(f, "score sheet line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for ScoreSheetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScoreSheetImportError::Io(err) => Some(err),
            ScoreSheetImportError::Csv(err) => Some(err),
            ScoreSheetImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for ScoreSheetImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ScoreSheetImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads a candidate's jury score sheet exported from the evaluation spreadsheet.
///
/// A sheet holds at most one row per (juror, phase) and every value must sit on the
/// configured score scale.
#[derive(Debug, Clone)]
pub struct ScoreSheetImporter {
    score_scale_max: f64,
}

impl Default for ScoreSheetImporter {
    fn default() -> Self {
        Self::new(&EvaluationConfig::default())
    }
}

impl ScoreSheetImporter {
    pub fn new(config: &EvaluationConfig) -> Self {
        Self {
            score_scale_max: config.score_scale_max,
        }
    }

    pub fn read_path<P: AsRef<Path>>(
        &self,
        path: P,
        candidate_id: &CandidateId,
    ) -> Result<Vec<FaceToFaceScore>, ScoreSheetImportError> {
        let file = std::fs::File::open(path)?;
        self.read(file, candidate_id)
    }

    pub fn read<R: Read>(
        &self,
        reader: R,
        candidate_id: &CandidateId,
    ) -> Result<Vec<FaceToFaceScore>, ScoreSheetImportError> {
        let evaluated_at = Utc::now();
        let max = self.score_scale_max;
        let mut seen: HashMap<(String, EvaluationPhase), usize> = HashMap::new();
        let mut scores = Vec::new();

        for (line, row) in parser::parse_rows(reader)? {
            let invalid = |message: String| ScoreSheetImportError::InvalidRow { line, message };
            let number = |raw: &str, field: &str| {
                let value = ScoreValue::Text(raw.to_string())
                    .to_f64()
                    .map_err(|err| invalid(format!("{field}: {err}")))?;
                if (0.0..=max).contains(&value) {
                    Ok(value)
                } else {
                    Err(invalid(format!(
                        "{field} must be between 0 and {max}, found {value}"
                    )))
                }
            };
            let optional = |raw: &Option<String>, field: &str| {
                raw.as_deref().map(|raw| number(raw, field)).transpose()
            };

            if row.juror.is_empty() {
                return Err(invalid("juror is empty".to_string()));
            }
            let phase = EvaluationPhase::try_from(row.phase).map_err(invalid)?;
            if let Some(first) = seen.insert((row.juror.clone(), phase), line) {
                return Err(invalid(format!(
                    "juror {} already has a phase {} row on line {}",
                    row.juror,
                    u8::from(phase),
                    first
                )));
            }
            let decision = match row.decision.as_deref() {
                Some(raw) => JurorDecision::parse(raw)
                    .ok_or_else(|| invalid(format!("unknown decision '{raw}'")))?,
                None => JurorDecision::Pending,
            };

            scores.push(FaceToFaceScore {
                candidate_id: candidate_id.clone(),
                jury_member_id: JuryMemberId(row.juror.clone()),
                phase,
                score: number(row.score.as_str(), "score")?,
                presentation_visuelle: optional(&row.presentation, "presentation")?,
                verbal_communication: optional(&row.verbal, "verbal")?,
                voice_quality: optional(&row.voice, "voice")?,
                appetence_digitale: optional(&row.appetence, "appetence")?,
                simulation_sens_negociation: None,
                simulation_capacite_persuasion: None,
                simulation_sens_combativite: None,
                decision,
                comments: None,
                evaluated_at,
            });
        }

        Ok(scores)
    }
}
