use crate::infra::{seed_demo_data, InMemoryAuditTrail, InMemoryEvaluationRepository};
use chrono::SecondsFormat;
use clap::Args;
use recruitment_eval::config::AppConfig;
use recruitment_eval::error::AppError;
use recruitment_eval::workflows::recruitment::evaluation::{
    policy_for, policy_table, resolve_job_family,
};
use recruitment_eval::workflows::recruitment::{
    CandidateId, ConsolidationInput, ConsolidationResult, EvaluationEngine, EvaluationPhase,
    FaceToFaceSubmission, JobFamily, JuryMemberId, JurorDecision, PolicyRow,
    RecruitmentEvaluationService, RecruitmentServiceError, ScoreSheetImporter, ScoreValue,
    TechnicalScores, UnlockStatus,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PolicyArgs {
    /// Only print the row for this job family (e.g. AGENCES, bo-reclam)
    #[arg(long)]
    pub(crate) job_family: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ConsolidateArgs {
    /// Job family code of the candidate
    #[arg(long)]
    pub(crate) job_family: String,
    /// Jury score sheet CSV (Juror, Phase, Score, Presentation, Verbal, Voice, Appetence, Decision)
    #[arg(long)]
    pub(crate) scores: PathBuf,
    /// Typing speed in words per minute
    #[arg(long)]
    pub(crate) typing_speed: Option<String>,
    /// Typing accuracy percentage
    #[arg(long)]
    pub(crate) typing_accuracy: Option<String>,
    /// Excel test score (/5)
    #[arg(long)]
    pub(crate) excel: Option<String>,
    /// Dictation score (/20)
    #[arg(long)]
    pub(crate) dictation: Option<String>,
    /// Sales simulation score (/5)
    #[arg(long)]
    pub(crate) sales_simulation: Option<String>,
    /// Psychotechnical test score (/10)
    #[arg(long)]
    pub(crate) psychotechnical: Option<String>,
    /// Analysis exercise score (/10)
    #[arg(long)]
    pub(crate) analysis_exercise: Option<String>,
    /// Print the result as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

impl ConsolidateArgs {
    fn technical_scores(&self) -> TechnicalScores {
        let value = |raw: &Option<String>| raw.clone().map(ScoreValue::Text);
        TechnicalScores {
            typing_speed: value(&self.typing_speed),
            typing_accuracy: value(&self.typing_accuracy),
            excel_test: value(&self.excel),
            dictation: value(&self.dictation),
            sales_simulation: value(&self.sales_simulation),
            psychotechnical_test: value(&self.psychotechnical),
            analysis_exercise: value(&self.analysis_exercise),
        }
    }
}

pub(crate) fn run_policy(args: PolicyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    match args.job_family {
        Some(raw) => {
            let job_family = resolve_job_family(&raw, config.evaluation.job_family_lookup)
                .map_err(RecruitmentServiceError::from)?;
            render_policy(job_family, policy_for(job_family));
        }
        None => {
            println!("Threshold policy table");
            for (job_family, policy) in policy_table() {
                render_policy(job_family, policy);
            }
        }
    }

    Ok(())
}

pub(crate) fn run_consolidate(args: ConsolidateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let importer = ScoreSheetImporter::new(&config.evaluation);
    let engine = EvaluationEngine::new(config.evaluation);

    let candidate_id = CandidateId(
        args.scores
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cli".to_string()),
    );
    let scores = importer.read_path(&args.scores, &candidate_id)?;
    let input = ConsolidationInput::from_records(&scores, args.technical_scores());
    let result = engine
        .consolidate_code(&args.job_family, &input)
        .map_err(RecruitmentServiceError::from)?;

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Result payload unavailable: {}", err),
        }
    } else {
        println!(
            "Consolidated {} evaluations from {}",
            scores.len(),
            args.scores.display()
        );
        render_consolidation(&result);
    }

    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let repository = Arc::new(InMemoryEvaluationRepository::default());
    let audit = Arc::new(InMemoryAuditTrail::default());
    seed_demo_data(&repository).map_err(|err| AppError::Evaluation(err.into()))?;
    let service =
        RecruitmentEvaluationService::new(repository, audit.clone(), config.evaluation);

    println!("Recruitment evaluation demo");
    let candidate = CandidateId("cand-agences-01".to_string());
    println!("\nCandidate {} (AGENCES), phase 1 jury", candidate);

    let phase1 = [
        ("drh-01", 3.5, JurorDecision::Favorable),
        ("epc-01", 3.0, JurorDecision::Defavorable),
    ];
    for (juror, score, decision) in phase1 {
        service.submit_face_to_face(
            &candidate,
            demo_submission(juror, EvaluationPhase::Phase1, score, decision),
        )?;
        println!("- {} scored {:.1} ({})", juror, score, decision.label());
    }

    let status = service.simulation_unlock(&candidate)?;
    render_unlock(&status);

    service.submit_face_to_face(
        &candidate,
        demo_submission(
            "rm-agences-01",
            EvaluationPhase::Phase1,
            4.0,
            JurorDecision::Favorable,
        ),
    )?;
    println!("- rm-agences-01 scored 4.0 (FAVORABLE)");

    let status = service.simulation_unlock(&candidate)?;
    render_unlock(&status);

    println!("\nPhase 2 simulation");
    for (juror, score) in [("drh-01", 3.5), ("epc-01", 3.0), ("rm-agences-01", 4.0)] {
        service.submit_face_to_face(
            &candidate,
            demo_submission(juror, EvaluationPhase::Phase2, score, JurorDecision::Favorable),
        )?;
        println!("- {} scored {:.1}", juror, score);
    }

    service.record_technical_scores(
        &candidate,
        TechnicalScores {
            typing_speed: Some(ScoreValue::Number(24.0)),
            typing_accuracy: Some(ScoreValue::Text("91,5".to_string())),
            dictation: Some(ScoreValue::Number(17.0)),
            sales_simulation: Some(ScoreValue::Number(3.5)),
            ..TechnicalScores::default()
        },
    )?;

    let decision = service.consolidate_candidate(&candidate)?;
    println!();
    render_consolidation(&decision.consolidation);
    match serde_json::to_string_pretty(&decision.status_view()) {
        Ok(json) => println!("  Public decision payload:\n{}", json),
        Err(err) => println!("  Public decision payload unavailable: {}", err),
    }

    let entries = audit.entries();
    println!("\nAudit trail: {} entries", entries.len());
    for entry in &entries {
        println!(
            "  {} {:?} {}",
            entry.recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.action,
            entry
                .actor
                .as_ref()
                .map(|actor| actor.to_string())
                .unwrap_or_else(|| "system".to_string())
        );
    }

    let locked = CandidateId("cand-callcenter-01".to_string());
    let status = service.simulation_unlock(&locked)?;
    println!("\nCandidate {} (CALL_CENTER)", locked);
    render_unlock(&status);

    Ok(())
}

fn demo_submission(
    juror: &str,
    phase: EvaluationPhase,
    score: f64,
    decision: JurorDecision,
) -> FaceToFaceSubmission {
    FaceToFaceSubmission {
        jury_member_id: JuryMemberId(juror.to_string()),
        phase,
        score: ScoreValue::Number(score),
        presentation_visuelle: Some(ScoreValue::Number(score)),
        verbal_communication: Some(ScoreValue::Number(score)),
        voice_quality: Some(ScoreValue::Number(score)),
        appetence_digitale: None,
        simulation_sens_negociation: None,
        simulation_capacite_persuasion: None,
        simulation_sens_combativite: None,
        decision,
        comments: None,
    }
}

fn render_policy(job_family: JobFamily, policy: &PolicyRow) {
    let phase2 = if policy.requires_phase2 {
        format!(">= {}", policy.min_phase2)
    } else {
        "not required".to_string()
    };
    println!(
        "- {} ({}): phase 1 >= {} | phase 2 {}{}",
        job_family,
        job_family.label(),
        policy.min_phase1,
        phase2,
        if job_family.requires_simulation() {
            " | simulation gated"
        } else {
            ""
        }
    );
    for (test, minimum) in policy.required_tests() {
        println!("    {} >= {}", test.label(), minimum);
    }
}

fn render_unlock(status: &UnlockStatus) {
    if status.unlocked {
        println!("  Simulation unlocked");
    } else {
        println!("  Simulation locked");
        for condition in &status.missing_conditions {
            println!("    - {}", condition);
        }
    }
    if !status.juror_decisions.is_empty() {
        let votes = status
            .juror_decisions
            .iter()
            .map(|view| format!("{}={}", view.jury_member_id, view.decision.label()))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  Juror decisions (informational): {}", votes);
    }
}

fn render_consolidation(result: &ConsolidationResult) {
    println!(
        "{}: phase 1 {:.2} ({}) | phase 2 {:.2} ({})",
        result.job_family,
        result.average_phase1,
        pass_label(result.details.phase1_passed),
        result.average_phase2,
        pass_label(result.details.phase2_passed)
    );
    for (test, outcome) in &result.details.technical_tests {
        println!(
            "  - {}: {} (required {}) {}",
            test.label(),
            outcome.value,
            outcome.required,
            pass_label(outcome.passed)
        );
    }
    println!("  Decision: {}", result.summary());
}

fn pass_label(passed: bool) -> &'static str {
    if passed {
        "passed"
    } else {
        "failed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_technical_values_are_kept_as_text() {
        let args = ConsolidateArgs {
            job_family: "CALL_CENTER".to_string(),
            scores: PathBuf::from("sheet.csv"),
            typing_speed: Some("18".to_string()),
            typing_accuracy: None,
            excel: Some("3,5".to_string()),
            dictation: None,
            sales_simulation: None,
            psychotechnical: None,
            analysis_exercise: None,
            json: false,
        };

        let scores = args.technical_scores();

        assert_eq!(scores.typing_speed, Some(ScoreValue::Text("18".to_string())));
        assert_eq!(
            scores.excel_test.as_ref().map(ScoreValue::to_f64),
            Some(Ok(3.5))
        );
        assert!(scores.dictation.is_none());
    }
}
