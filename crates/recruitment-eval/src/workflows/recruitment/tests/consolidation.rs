use super::common::*;
use crate::workflows::recruitment::domain::{EvaluationPhase, JobFamily, ScoreValue, TechnicalScores};
use crate::workflows::recruitment::evaluation::{
    consolidate, ConsolidationInput, EvaluationEngine, JobFamilyLookup, PhaseScore, TechnicalTest,
};
use crate::workflows::recruitment::EvaluationConfig;
use rust_decimal::Decimal;
use std::str::FromStr;

fn phase_scores(entries: &[(EvaluationPhase, f64)]) -> Vec<PhaseScore> {
    entries
        .iter()
        .map(|&(phase, score)| PhaseScore { phase, score })
        .collect()
}

fn call_center_input() -> ConsolidationInput {
    ConsolidationInput {
        face_to_face_scores: phase_scores(&[
            (EvaluationPhase::Phase1, 4.0),
            (EvaluationPhase::Phase2, 2.0),
        ]),
        technical: TechnicalScores {
            typing_speed: Some(ScoreValue::Number(20.0)),
            typing_accuracy: Some(ScoreValue::Number(90.0)),
            excel_test: Some(ScoreValue::Number(4.0)),
            dictation: Some(ScoreValue::Number(17.0)),
            ..TechnicalScores::default()
        },
    }
}

#[test]
fn call_center_phase_averages_are_filtered_by_phase() {
    let result = consolidate(JobFamily::CallCenter, &call_center_input());

    assert_eq!(result.average_phase1, 4.0);
    assert_eq!(result.average_phase2, 2.0);
    assert!(result.details.phase1_passed);
    assert!(!result.details.phase2_passed);
    assert!(!result.is_admitted);
    assert!(result
        .details
        .technical_tests
        .values()
        .all(|test| test.passed));
}

#[test]
fn bo_reclam_never_requires_phase_two() {
    let input = ConsolidationInput {
        face_to_face_scores: phase_scores(&[(EvaluationPhase::Phase1, 3.0)]),
        technical: TechnicalScores {
            typing_speed: Some(ScoreValue::Number(17.0)),
            typing_accuracy: Some(ScoreValue::Number(85.0)),
            excel_test: Some(ScoreValue::Number(3.0)),
            dictation: Some(ScoreValue::Number(16.0)),
            psychotechnical_test: Some(ScoreValue::Number(8.0)),
            ..TechnicalScores::default()
        },
    };

    let result = consolidate(JobFamily::BoReclam, &input);

    assert_eq!(result.average_phase2, 0.0);
    assert!(result.details.phase2_passed);
    assert!(result.is_admitted, "{}", result.summary());
}

#[test]
fn thresholds_are_inclusive() {
    let mut input = call_center_input();
    input.face_to_face_scores = phase_scores(&[
        (EvaluationPhase::Phase1, 3.0),
        (EvaluationPhase::Phase2, 3.0),
    ]);
    input.technical.typing_speed = Some(ScoreValue::Number(17.0));
    input.technical.typing_accuracy = Some(ScoreValue::Number(85.0));
    input.technical.excel_test = Some(ScoreValue::Number(3.0));
    input.technical.dictation = Some(ScoreValue::Number(16.0));

    let result = consolidate(JobFamily::CallCenter, &input);

    let typing = result.details.technical_tests[&TechnicalTest::TypingSpeed];
    assert!(typing.passed);
    assert_eq!(typing.value, 17.0);
    assert_eq!(typing.required, 17.0);
    assert!(result.is_admitted);
}

#[test]
fn just_below_threshold_fails_the_test() {
    let mut input = call_center_input();
    input.face_to_face_scores = phase_scores(&[
        (EvaluationPhase::Phase1, 4.0),
        (EvaluationPhase::Phase2, 4.0),
    ]);
    input.technical.typing_speed = Some(ScoreValue::Number(16.99));

    let result = consolidate(JobFamily::CallCenter, &input);

    assert!(!result.details.technical_tests[&TechnicalTest::TypingSpeed].passed);
    assert!(!result.is_admitted);
    assert!(result.summary().contains("Typing speed"));
}

#[test]
fn missing_required_test_is_not_penalized() {
    let input = ConsolidationInput {
        face_to_face_scores: phase_scores(&[
            (EvaluationPhase::Phase1, 4.0),
            (EvaluationPhase::Phase2, 4.0),
        ]),
        technical: TechnicalScores::default(),
    };

    let result = consolidate(JobFamily::Agences, &input);

    assert!(result.details.technical_tests.is_empty());
    assert!(result.is_admitted);
}

#[test]
fn unreadable_technical_value_is_skipped() {
    let mut input = call_center_input();
    input.face_to_face_scores = phase_scores(&[
        (EvaluationPhase::Phase1, 4.0),
        (EvaluationPhase::Phase2, 4.0),
    ]);
    input.technical.excel_test = Some(ScoreValue::Text("n/a".to_string()));

    let result = consolidate(JobFamily::CallCenter, &input);

    assert!(!result
        .details
        .technical_tests
        .contains_key(&TechnicalTest::Excel));
    assert!(result.is_admitted);
}

#[test]
fn tests_outside_the_policy_are_ignored() {
    let mut input = call_center_input();
    input.face_to_face_scores = phase_scores(&[
        (EvaluationPhase::Phase1, 4.0),
        (EvaluationPhase::Phase2, 4.0),
    ]);
    input.technical.sales_simulation = Some(ScoreValue::Number(0.0));

    let result = consolidate(JobFamily::CallCenter, &input);

    assert!(!result
        .details
        .technical_tests
        .contains_key(&TechnicalTest::SalesSimulation));
    assert!(result.is_admitted);
}

#[test]
fn decimal_and_text_values_normalize_before_comparison() {
    let mut input = call_center_input();
    input.face_to_face_scores = phase_scores(&[
        (EvaluationPhase::Phase1, 4.0),
        (EvaluationPhase::Phase2, 4.0),
    ]);
    input.technical.dictation = Some(ScoreValue::Decimal(
        Decimal::from_str("16.00").expect("decimal"),
    ));
    input.technical.excel_test = Some(ScoreValue::Text("3,5".to_string()));

    let result = consolidate(JobFamily::CallCenter, &input);

    assert_eq!(
        result.details.technical_tests[&TechnicalTest::Dictation].value,
        16.0
    );
    assert_eq!(
        result.details.technical_tests[&TechnicalTest::Excel].value,
        3.5
    );
    assert!(result.is_admitted);
}

#[test]
fn no_evaluations_fail_phase_one() {
    let result = consolidate(JobFamily::Supervision, &ConsolidationInput::default());

    assert_eq!(result.average_phase1, 0.0);
    assert!(!result.details.phase1_passed);
    assert!(!result.is_admitted);
}

#[test]
fn consolidation_is_idempotent() {
    let input = call_center_input();

    let first = consolidate(JobFamily::CallCenter, &input);
    let second = consolidate(JobFamily::CallCenter, &input);

    assert_eq!(
        serde_json::to_vec(&first).expect("serialize"),
        serde_json::to_vec(&second).expect("serialize")
    );
}

#[test]
fn lenient_engine_falls_back_to_call_center() {
    let engine = EvaluationEngine::new(evaluation_config());

    let result = engine
        .consolidate_code("UNKNOWN_FAMILY", &call_center_input())
        .expect("lenient lookup");

    assert_eq!(result.job_family, JobFamily::CallCenter);
}

#[test]
fn strict_engine_rejects_unknown_family() {
    let engine = EvaluationEngine::new(EvaluationConfig {
        job_family_lookup: JobFamilyLookup::Strict,
        ..evaluation_config()
    });

    let err = engine
        .consolidate_code("UNKNOWN_FAMILY", &call_center_input())
        .expect_err("strict lookup");

    assert_eq!(err.to_string(), "unknown job family 'UNKNOWN_FAMILY'");
}

#[test]
fn input_deserializes_from_flat_payload() {
    let payload = serde_json::json!({
        "face_to_face_scores": [{"phase": 1, "score": 4}, {"phase": 2, "score": 3.5}],
        "typing_speed": 20,
        "typing_accuracy": "90.5",
        "excel_test": "3,5",
    });

    let input: ConsolidationInput = serde_json::from_value(payload).expect("input parses");

    assert_eq!(input.face_to_face_scores.len(), 2);
    assert_eq!(
        input.technical.typing_speed.as_ref().map(ScoreValue::to_f64),
        Some(Ok(20.0))
    );
    assert_eq!(
        input.technical.excel_test.as_ref().map(ScoreValue::to_f64),
        Some(Ok(3.5))
    );
}
