use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier wrapper for recruitment sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Identifier wrapper for jury members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JuryMemberId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for JuryMemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job family (métier) a candidate is recruited for. Selects the threshold policy row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobFamily {
    CallCenter,
    Agences,
    BoReclam,
    Televente,
    ReseauxSociaux,
    Supervision,
    BotCognitiveTrainer,
    SmcFixe,
    SmcMobile,
}

impl JobFamily {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::CallCenter,
            Self::Agences,
            Self::BoReclam,
            Self::Televente,
            Self::ReseauxSociaux,
            Self::Supervision,
            Self::BotCognitiveTrainer,
            Self::SmcFixe,
            Self::SmcMobile,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::CallCenter => "CALL_CENTER",
            Self::Agences => "AGENCES",
            Self::BoReclam => "BO_RECLAM",
            Self::Televente => "TELEVENTE",
            Self::ReseauxSociaux => "RESEAUX_SOCIAUX",
            Self::Supervision => "SUPERVISION",
            Self::BotCognitiveTrainer => "BOT_COGNITIVE_TRAINER",
            Self::SmcFixe => "SMC_FIXE",
            Self::SmcMobile => "SMC_MOBILE",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CallCenter => "Call Center",
            Self::Agences => "Agences",
            Self::BoReclam => "BO Réclam",
            Self::Televente => "Télévente",
            Self::ReseauxSociaux => "Réseaux Sociaux",
            Self::Supervision => "Supervision",
            Self::BotCognitiveTrainer => "Bot Cognitive Trainer",
            Self::SmcFixe => "SMC Fixe",
            Self::SmcMobile => "SMC Mobile",
        }
    }

    /// Job families whose phase 2 is a simulation gated on phase-1 results.
    pub const fn requires_simulation(self) -> bool {
        matches!(self, Self::Agences | Self::Televente)
    }
}

impl fmt::Display for JobFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for JobFamily {
    type Err = UnknownJobFamily;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().replace(['-', ' '], "_").to_ascii_uppercase();
        Self::ordered()
            .into_iter()
            .find(|family| family.code() == normalized)
            .ok_or_else(|| UnknownJobFamily(raw.to_string()))
    }
}

/// Raised when a job family code matches no policy row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job family '{0}'")]
pub struct UnknownJobFamily(pub String);

/// Role a jury member holds within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JurorRole {
    Drh,
    Epc,
    RepresentantMetier,
    WfmJury,
}

impl JurorRole {
    pub const fn label(self) -> &'static str {
        match self {
            JurorRole::Drh => "DRH",
            JurorRole::Epc => "EPC",
            JurorRole::RepresentantMetier => "REPRESENTANT_METIER",
            JurorRole::WfmJury => "WFM_JURY",
        }
    }
}

/// Face-to-face evaluation stage. Serialized as `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EvaluationPhase {
    Phase1,
    Phase2,
}

impl From<EvaluationPhase> for u8 {
    fn from(phase: EvaluationPhase) -> Self {
        match phase {
            EvaluationPhase::Phase1 => 1,
            EvaluationPhase::Phase2 => 2,
        }
    }
}

impl TryFrom<u8> for EvaluationPhase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EvaluationPhase::Phase1),
            2 => Ok(EvaluationPhase::Phase2),
            other => Err(format!("evaluation phase must be 1 or 2, found {other}")),
        }
    }
}

/// Individual juror verdict. Informational only; never feeds the gate or the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JurorDecision {
    Favorable,
    Defavorable,
    #[default]
    Pending,
}

impl JurorDecision {
    pub const fn label(self) -> &'static str {
        match self {
            JurorDecision::Favorable => "FAVORABLE",
            JurorDecision::Defavorable => "DEFAVORABLE",
            JurorDecision::Pending => "PENDING",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "FAVORABLE" => Some(JurorDecision::Favorable),
            "DEFAVORABLE" | "DÉFAVORABLE" => Some(JurorDecision::Defavorable),
            "PENDING" | "" => Some(JurorDecision::Pending),
            _ => None,
        }
    }
}

/// Numeric value as it arrives from forms, spreadsheets, or the persistence layer:
/// a plain float, a fixed-point decimal, or text that still has to be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(f64),
    Decimal(Decimal),
    Text(String),
}

impl ScoreValue {
    /// Single normalization point: every comparison in the engine runs on the returned `f64`.
    pub fn to_f64(&self) -> Result<f64, InvalidScore> {
        let value = match self {
            ScoreValue::Number(value) => Some(*value),
            ScoreValue::Decimal(decimal) => decimal.to_f64(),
            ScoreValue::Text(raw) => parse_numeric_text(raw),
        };

        value
            .filter(|value| value.is_finite())
            .ok_or_else(|| InvalidScore {
                raw: self.to_string(),
            })
    }
}

fn parse_numeric_text(raw: &str) -> Option<f64> {
    // French-formatted sheets use a decimal comma.
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    Decimal::from_str(&normalized)
        .ok()
        .and_then(|decimal| decimal.to_f64())
        .or_else(|| normalized.parse::<f64>().ok())
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Number(value) => write!(f, "{value}"),
            ScoreValue::Decimal(decimal) => write!(f, "{decimal}"),
            ScoreValue::Text(raw) => f.write_str(raw),
        }
    }
}

impl From<f64> for ScoreValue {
    fn from(value: f64) -> Self {
        ScoreValue::Number(value)
    }
}

impl From<Decimal> for ScoreValue {
    fn from(value: Decimal) -> Self {
        ScoreValue::Decimal(value)
    }
}

/// Raised when a submitted value cannot be read as a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a numeric score")]
pub struct InvalidScore {
    pub raw: String,
}

/// Candidate registered in a recruitment session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub session_id: SessionId,
    pub full_name: String,
    pub job_family: JobFamily,
}

/// Jury member as recorded on a session's presence sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionJuror {
    pub jury_member_id: JuryMemberId,
    pub full_name: String,
    pub role_type: JurorRole,
    #[serde(default)]
    pub specialite: Option<JobFamily>,
    pub was_present: bool,
}

impl SessionJuror {
    /// Business representatives only evaluate candidates of their own job family.
    pub fn evaluates(&self, job_family: JobFamily) -> bool {
        match self.role_type {
            JurorRole::RepresentantMetier => self.specialite == Some(job_family),
            JurorRole::Drh | JurorRole::Epc | JurorRole::WfmJury => true,
        }
    }

    pub fn reference(&self) -> JurorRef {
        JurorRef {
            jury_member_id: self.jury_member_id.clone(),
            full_name: self.full_name.clone(),
            role_type: self.role_type,
            specialite: self.specialite,
        }
    }
}

/// Public roster entry returned alongside gate results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurorRef {
    pub jury_member_id: JuryMemberId,
    pub full_name: String,
    pub role_type: JurorRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialite: Option<JobFamily>,
}

/// Stored face-to-face evaluation, unique per (candidate, juror, phase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceToFaceScore {
    pub candidate_id: CandidateId,
    pub jury_member_id: JuryMemberId,
    pub phase: EvaluationPhase,
    pub score: f64,
    #[serde(default)]
    pub presentation_visuelle: Option<f64>,
    #[serde(default)]
    pub verbal_communication: Option<f64>,
    #[serde(default)]
    pub voice_quality: Option<f64>,
    #[serde(default)]
    pub appetence_digitale: Option<f64>,
    #[serde(default)]
    pub simulation_sens_negociation: Option<f64>,
    #[serde(default)]
    pub simulation_capacite_persuasion: Option<f64>,
    #[serde(default)]
    pub simulation_sens_combativite: Option<f64>,
    #[serde(default)]
    pub decision: JurorDecision,
    #[serde(default)]
    pub comments: Option<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// Juror-submitted evaluation before normalization and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceToFaceSubmission {
    pub jury_member_id: JuryMemberId,
    pub phase: EvaluationPhase,
    pub score: ScoreValue,
    #[serde(default)]
    pub presentation_visuelle: Option<ScoreValue>,
    #[serde(default)]
    pub verbal_communication: Option<ScoreValue>,
    #[serde(default)]
    pub voice_quality: Option<ScoreValue>,
    #[serde(default)]
    pub appetence_digitale: Option<ScoreValue>,
    #[serde(default)]
    pub simulation_sens_negociation: Option<ScoreValue>,
    #[serde(default)]
    pub simulation_capacite_persuasion: Option<ScoreValue>,
    #[serde(default)]
    pub simulation_sens_combativite: Option<ScoreValue>,
    #[serde(default)]
    pub decision: JurorDecision,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Technical test results recorded by WFM staff, one record per candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalScores {
    pub typing_speed: Option<ScoreValue>,
    pub typing_accuracy: Option<ScoreValue>,
    pub excel_test: Option<ScoreValue>,
    pub dictation: Option<ScoreValue>,
    pub sales_simulation: Option<ScoreValue>,
    pub psychotechnical_test: Option<ScoreValue>,
    pub analysis_exercise: Option<ScoreValue>,
}
