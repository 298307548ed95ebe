use serde::{Deserialize, Serialize};
use tracing::warn;

use super::super::domain::{JobFamily, ScoreValue, TechnicalScores, UnknownJobFamily};
use super::config::JobFamilyLookup;

/// Technical tests a policy row may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalTest {
    TypingSpeed,
    TypingAccuracy,
    Excel,
    Dictation,
    SalesSimulation,
    Psychotechnical,
    AnalysisExercise,
}

impl TechnicalTest {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::TypingSpeed,
            Self::TypingAccuracy,
            Self::Excel,
            Self::Dictation,
            Self::SalesSimulation,
            Self::Psychotechnical,
            Self::AnalysisExercise,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TypingSpeed => "Typing speed (wpm)",
            Self::TypingAccuracy => "Typing accuracy (%)",
            Self::Excel => "Excel (/5)",
            Self::Dictation => "Dictation (/20)",
            Self::SalesSimulation => "Sales simulation (/5)",
            Self::Psychotechnical => "Psychotechnical (/10)",
            Self::AnalysisExercise => "Analysis exercise (/10)",
        }
    }

    pub(crate) fn value_in(self, scores: &TechnicalScores) -> Option<&ScoreValue> {
        match self {
            Self::TypingSpeed => scores.typing_speed.as_ref(),
            Self::TypingAccuracy => scores.typing_accuracy.as_ref(),
            Self::Excel => scores.excel_test.as_ref(),
            Self::Dictation => scores.dictation.as_ref(),
            Self::SalesSimulation => scores.sales_simulation.as_ref(),
            Self::Psychotechnical => scores.psychotechnical_test.as_ref(),
            Self::AnalysisExercise => scores.analysis_exercise.as_ref(),
        }
    }
}

/// Typing test thresholds: words per minute and accuracy percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypingThreshold {
    pub min_speed: f64,
    pub min_accuracy: f64,
}

/// Pass thresholds for one job family. `None` means the test is not required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyRow {
    pub min_phase1: f64,
    pub requires_phase2: bool,
    pub min_phase2: f64,
    pub typing: Option<TypingThreshold>,
    pub min_excel: Option<f64>,
    pub min_dictation: Option<f64>,
    pub min_sales_simulation: Option<f64>,
    pub min_psychotechnical: Option<f64>,
    pub min_analysis_exercise: Option<f64>,
}

impl PolicyRow {
    /// Minimum required for `test`, or `None` when the job family does not require it.
    pub fn requirement(&self, test: TechnicalTest) -> Option<f64> {
        match test {
            TechnicalTest::TypingSpeed => self.typing.map(|typing| typing.min_speed),
            TechnicalTest::TypingAccuracy => self.typing.map(|typing| typing.min_accuracy),
            TechnicalTest::Excel => self.min_excel,
            TechnicalTest::Dictation => self.min_dictation,
            TechnicalTest::SalesSimulation => self.min_sales_simulation,
            TechnicalTest::Psychotechnical => self.min_psychotechnical,
            TechnicalTest::AnalysisExercise => self.min_analysis_exercise,
        }
    }

    pub fn required_tests(&self) -> impl Iterator<Item = (TechnicalTest, f64)> + '_ {
        TechnicalTest::ordered()
            .into_iter()
            .filter_map(|test| self.requirement(test).map(|minimum| (test, minimum)))
    }
}

const STANDARD_TYPING: TypingThreshold = TypingThreshold {
    min_speed: 17.0,
    min_accuracy: 85.0,
};

const BASE_ROW: PolicyRow = PolicyRow {
    min_phase1: 3.0,
    requires_phase2: true,
    min_phase2: 3.0,
    typing: Some(STANDARD_TYPING),
    min_excel: None,
    min_dictation: Some(16.0),
    min_sales_simulation: None,
    min_psychotechnical: None,
    min_analysis_exercise: None,
};

static POLICY_TABLE: [(JobFamily, PolicyRow); 9] = [
    (
        JobFamily::CallCenter,
        PolicyRow {
            min_excel: Some(3.0),
            ..BASE_ROW
        },
    ),
    (
        JobFamily::Agences,
        PolicyRow {
            min_sales_simulation: Some(3.0),
            ..BASE_ROW
        },
    ),
    (
        JobFamily::BoReclam,
        PolicyRow {
            requires_phase2: false,
            min_phase2: 0.0,
            min_excel: Some(3.0),
            min_psychotechnical: Some(8.0),
            ..BASE_ROW
        },
    ),
    (
        JobFamily::Televente,
        PolicyRow {
            min_sales_simulation: Some(3.0),
            ..BASE_ROW
        },
    ),
    (JobFamily::ReseauxSociaux, BASE_ROW),
    (
        JobFamily::Supervision,
        PolicyRow {
            min_excel: Some(3.0),
            ..BASE_ROW
        },
    ),
    (
        JobFamily::BotCognitiveTrainer,
        PolicyRow {
            typing: None,
            min_excel: Some(3.0),
            min_analysis_exercise: Some(6.0),
            ..BASE_ROW
        },
    ),
    (
        JobFamily::SmcFixe,
        PolicyRow {
            min_excel: Some(3.0),
            ..BASE_ROW
        },
    ),
    (
        JobFamily::SmcMobile,
        PolicyRow {
            min_excel: Some(3.0),
            ..BASE_ROW
        },
    ),
];

/// Policy row for a job family. Every family has exactly one row.
pub fn policy_for(job_family: JobFamily) -> &'static PolicyRow {
    POLICY_TABLE
        .iter()
        .find(|(family, _)| *family == job_family)
        .map(|(_, row)| row)
        .unwrap_or(&POLICY_TABLE[0].1)
}

/// Full table in declaration order, for listings.
pub fn policy_table() -> impl Iterator<Item = (JobFamily, &'static PolicyRow)> {
    POLICY_TABLE.iter().map(|(family, row)| (*family, row))
}

/// Resolve a raw job family code.
///
/// Lenient lookup maps unknown codes to CALL_CENTER, which silently hides bad data
/// but matches how existing decisions were computed. Strict lookup rejects them.
pub fn resolve_job_family(
    raw: &str,
    lookup: JobFamilyLookup,
) -> Result<JobFamily, UnknownJobFamily> {
    match raw.parse::<JobFamily>() {
        Ok(family) => Ok(family),
        Err(err) if lookup == JobFamilyLookup::Strict => Err(err),
        Err(_) => {
            warn!(job_family = raw, "unknown job family, applying CALL_CENTER policy");
            Ok(JobFamily::CallCenter)
        }
    }
}

/// Lenient lookup by raw code.
pub fn lookup_policy(raw: &str) -> &'static PolicyRow {
    match resolve_job_family(raw, JobFamilyLookup::Lenient) {
        Ok(family) => policy_for(family),
        Err(_) => policy_for(JobFamily::CallCenter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_job_family_has_exactly_one_row() {
        for family in JobFamily::ordered() {
            let rows = policy_table().filter(|(entry, _)| *entry == family).count();
            assert_eq!(rows, 1, "{family} should have one policy row");
        }
        assert_eq!(policy_table().count(), JobFamily::ordered().len());
    }

    #[test]
    fn phase_thresholds_are_three_on_five() {
        for (family, row) in policy_table() {
            assert_eq!(row.min_phase1, 3.0, "{family}");
            if row.requires_phase2 {
                assert_eq!(row.min_phase2, 3.0, "{family}");
            }
        }
        let bo_reclam = policy_for(JobFamily::BoReclam);
        assert!(!bo_reclam.requires_phase2);
        assert_eq!(bo_reclam.min_phase2, 0.0);
    }

    #[test]
    fn technical_requirements_match_published_grid() {
        let call_center = policy_for(JobFamily::CallCenter);
        assert_eq!(
            call_center.required_tests().collect::<Vec<_>>(),
            vec![
                (TechnicalTest::TypingSpeed, 17.0),
                (TechnicalTest::TypingAccuracy, 85.0),
                (TechnicalTest::Excel, 3.0),
                (TechnicalTest::Dictation, 16.0),
            ]
        );

        let agences = policy_for(JobFamily::Agences);
        assert_eq!(agences.requirement(TechnicalTest::Excel), None);
        assert_eq!(agences.requirement(TechnicalTest::SalesSimulation), Some(3.0));

        let bo_reclam = policy_for(JobFamily::BoReclam);
        assert_eq!(bo_reclam.requirement(TechnicalTest::Psychotechnical), Some(8.0));

        let reseaux = policy_for(JobFamily::ReseauxSociaux);
        assert_eq!(
            reseaux.required_tests().map(|(test, _)| test).collect::<Vec<_>>(),
            vec![
                TechnicalTest::TypingSpeed,
                TechnicalTest::TypingAccuracy,
                TechnicalTest::Dictation,
            ]
        );

        let bot = policy_for(JobFamily::BotCognitiveTrainer);
        assert_eq!(bot.typing, None);
        assert_eq!(bot.requirement(TechnicalTest::AnalysisExercise), Some(6.0));
        assert_eq!(bot.requirement(TechnicalTest::Excel), Some(3.0));

        for family in [
            JobFamily::Supervision,
            JobFamily::SmcFixe,
            JobFamily::SmcMobile,
        ] {
            assert_eq!(policy_for(family), call_center, "{family}");
        }
        assert_eq!(
            policy_for(JobFamily::Televente),
            policy_for(JobFamily::Agences)
        );
    }

    #[test]
    fn lenient_lookup_falls_back_to_call_center() {
        assert_eq!(
            resolve_job_family("RECOUVREMENT", JobFamilyLookup::Lenient),
            Ok(JobFamily::CallCenter)
        );
        assert_eq!(
            lookup_policy("RECOUVREMENT"),
            policy_for(JobFamily::CallCenter)
        );
        assert_eq!(lookup_policy("bo_reclam"), policy_for(JobFamily::BoReclam));
    }

    #[test]
    fn strict_lookup_rejects_unknown_codes() {
        assert_eq!(
            resolve_job_family("RECOUVREMENT", JobFamilyLookup::Strict),
            Err(UnknownJobFamily("RECOUVREMENT".to_string()))
        );
        assert_eq!(
            resolve_job_family("TELEVENTE", JobFamilyLookup::Strict),
            Ok(JobFamily::Televente)
        );
    }
}
