use serde::{Deserialize, Serialize};

/// How raw job family codes that match no policy row are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobFamilyLookup {
    /// Unknown codes fall back to the CALL_CENTER row, as recorded decisions already assume.
    #[default]
    Lenient,
    /// Unknown codes are rejected.
    Strict,
}

impl JobFamilyLookup {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Self::Strict,
            _ => Self::Lenient,
        }
    }
}

/// Engine settings shared by consolidation and score validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub job_family_lookup: JobFamilyLookup,
    pub score_scale_max: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            job_family_lookup: JobFamilyLookup::Lenient,
            score_scale_max: 5.0,
        }
    }
}
