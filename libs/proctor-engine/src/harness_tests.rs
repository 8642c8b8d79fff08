//! End-to-end harness tests against a scripted execution service.
//!
//! The real service is HTTP + sandbox; these tests swap in a mock that
//! replays canned outcomes so the full pipeline (encode → synthesize →
//! execute → normalize → compare → aggregate) runs hermetically.

use async_trait::async_trait;
use proctor_common::{DiagnosticKind, SubmissionRequest, TestCase};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

use crate::client::{ExecutionError, ExecutionOutcome, ExecutionRequest, ExecutionService};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::harness::Harness;
use crate::normalize;

struct ScriptedService {
    outcomes: Mutex<VecDeque<Result<ExecutionOutcome, ExecutionError>>>,
    requests: Mutex<Vec<ExecutionRequest>>,
}

impl ScriptedService {
    fn new(outcomes: Vec<Result<ExecutionOutcome, ExecutionError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// One clean run per entry, printing the given stdout.
    fn printing(stdouts: &[&str]) -> Self {
        Self::new(
            stdouts
                .iter()
                .map(|out| {
                    Ok(ExecutionOutcome {
                        stdout: out.to_string(),
                        ..Default::default()
                    })
                })
                .collect(),
        )
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ExecutionService for &ScriptedService {
    async fn run(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, ExecutionError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExecutionOutcome::default()))
    }
}

fn submission(language: &str, cases: Vec<(Value, Value)>) -> SubmissionRequest {
    SubmissionRequest {
        id: Uuid::new_v4(),
        language: language.to_string(),
        source_code: "def solution(*args):\n    pass".to_string(),
        test_cases: cases
            .into_iter()
            .map(|(input, expected_output)| TestCase {
                input,
                expected_output,
            })
            .collect(),
        templates: Default::default(),
        problem_title: None,
    }
}

fn harness(service: &ScriptedService) -> Harness<&ScriptedService> {
    Harness::new(service, EngineConfig::default())
}

#[tokio::test]
async fn test_two_sum_scenario_passes() {
    let service = ScriptedService::printing(&["0 1\n"]);
    let request = submission(
        "python",
        vec![(json!({"nums": [2, 7, 11, 15], "target": 9}), json!([0, 1]))],
    );

    let summary = harness(&service).execute(&request).await.unwrap();

    assert!(summary.success);
    assert_eq!(summary.passed_tests, 1);
    assert_eq!(
        summary.test_results[0].actual_output,
        Some(json!([0, 1]))
    );
}

#[tokio::test]
async fn test_empty_list_scenario_passes() {
    let service = ScriptedService::printing(&[""]);
    let request = submission("python", vec![(json!({"head": []}), json!([]))]);

    let summary = harness(&service).execute(&request).await.unwrap();

    assert!(summary.success);
    assert_eq!(summary.test_results[0].actual_output, Some(json!([])));
}

#[tokio::test]
async fn test_merge_mismatch_cites_first_differing_index() {
    let service = ScriptedService::printing(&["1 1 2 2 4 4\n"]);
    let request = submission(
        "python",
        vec![(
            json!({"list1": [1, 2, 4], "list2": [1, 3, 4]}),
            json!([1, 1, 2, 3, 4, 4]),
        )],
    );

    let summary = harness(&service).execute(&request).await.unwrap();

    assert!(!summary.success);
    let diagnostic = summary.test_results[0].diagnostic.as_ref().unwrap();
    assert_eq!(diagnostic.kind, DiagnosticKind::ContentMismatch);
    assert!(diagnostic.detail.contains("index 3"));
}

#[tokio::test]
async fn test_boolean_output_compares_case_insensitively() {
    let service = ScriptedService::printing(&["True\n"]);
    let request = submission("python", vec![(json!({"head": [1]}), json!(true))]);

    let summary = harness(&service).execute(&request).await.unwrap();

    assert!(summary.success);
}

#[tokio::test]
async fn test_unsupported_language_rejected_before_any_execution() {
    let service = ScriptedService::new(vec![]);
    let request = submission("ruby", vec![(json!({"head": [1]}), json!([1]))]);

    let err = harness(&service).execute(&request).await.unwrap_err();

    match err {
        EngineError::UnsupportedLanguage(tag) => assert_eq!(tag, "ruby"),
        other => panic!("expected unsupported language, got {:?}", other),
    }
    assert_eq!(service.request_count(), 0);
}

#[tokio::test]
async fn test_compile_error_recorded_and_later_cases_run() {
    let service = ScriptedService::new(vec![
        Ok(ExecutionOutcome {
            compile_error: Some("main.cpp:3: error: expected ';'".to_string()),
            ..Default::default()
        }),
        Ok(ExecutionOutcome {
            stdout: "1 2\n".to_string(),
            ..Default::default()
        }),
    ]);
    let request = submission(
        "cpp",
        vec![
            (json!({"head": [2, 1]}), json!([1, 2])),
            (json!({"head": [2, 1]}), json!([1, 2])),
        ],
    );

    let summary = harness(&service).execute(&request).await.unwrap();

    assert_eq!(summary.total_tests, 2);
    assert!(!summary.test_results[0].passed);
    assert_eq!(
        summary.test_results[0].diagnostic.as_ref().unwrap().kind,
        DiagnosticKind::CompileError
    );
    assert!(summary.test_results[0]
        .error
        .as_ref()
        .unwrap()
        .contains("expected ';'"));
    assert!(summary.test_results[1].passed);
    assert_eq!(service.request_count(), 2);
}

#[tokio::test]
async fn test_transport_timeout_recorded_and_later_cases_run() {
    let service = ScriptedService::new(vec![
        Err(ExecutionError::Timeout(22_000)),
        Ok(ExecutionOutcome {
            stdout: "3\n".to_string(),
            ..Default::default()
        }),
    ]);
    let request = submission(
        "javascript",
        vec![
            (json!({"head": [3]}), json!(3)),
            (json!({"head": [3]}), json!(3)),
        ],
    );

    let summary = harness(&service).execute(&request).await.unwrap();

    assert!(!summary.test_results[0].passed);
    assert_eq!(
        summary.test_results[0].diagnostic.as_ref().unwrap().kind,
        DiagnosticKind::Timeout
    );
    assert!(summary.test_results[0]
        .error
        .as_ref()
        .unwrap()
        .contains("timed out"));
    assert!(summary.test_results[1].passed);
}

#[tokio::test]
async fn test_runtime_error_attaches_stderr() {
    let service = ScriptedService::new(vec![Ok(ExecutionOutcome {
        stderr: "Traceback (most recent call last): ZeroDivisionError".to_string(),
        exit_code: 1,
        ..Default::default()
    })]);
    let request = submission("python", vec![(json!({"head": [1]}), json!([1]))]);

    let summary = harness(&service).execute(&request).await.unwrap();

    let result = &summary.test_results[0];
    assert!(!result.passed);
    assert_eq!(
        result.diagnostic.as_ref().unwrap().kind,
        DiagnosticKind::RuntimeError
    );
    assert!(result.error.as_ref().unwrap().contains("ZeroDivisionError"));
}

#[tokio::test]
async fn test_result_count_always_matches_case_count() {
    let service = ScriptedService::new(vec![
        Ok(ExecutionOutcome {
            stdout: "1\n".to_string(),
            ..Default::default()
        }),
        Err(ExecutionError::Transport("connection refused".to_string())),
        Ok(ExecutionOutcome {
            stdout: "3\n".to_string(),
            ..Default::default()
        }),
    ]);
    let request = submission(
        "python",
        vec![
            (json!({"head": [1]}), json!(1)),
            (json!({"head": [2]}), json!(2)),
            (json!({"head": [3]}), json!(3)),
        ],
    );

    let summary = harness(&service).execute(&request).await.unwrap();

    assert_eq!(summary.total_tests, 3);
    assert_eq!(summary.test_results.len(), 3);
    assert_eq!(summary.passed_tests, 2);
    assert!(!summary.success);
    let recounted = summary.test_results.iter().filter(|r| r.passed).count();
    assert_eq!(summary.passed_tests, recounted);
    for (index, result) in summary.test_results.iter().enumerate() {
        assert_eq!(result.index, index);
    }
}

#[tokio::test]
async fn test_empty_test_battery_yields_vacuous_success() {
    let service = ScriptedService::new(vec![]);
    let request = submission("python", vec![]);

    let summary = harness(&service).execute(&request).await.unwrap();

    assert_eq!(summary.total_tests, 0);
    assert!(summary.success);
    assert!(summary.error.is_none());
}

#[tokio::test]
async fn test_invalid_submission_rejected_before_any_execution() {
    let service = ScriptedService::new(vec![]);
    let mut request = submission("python", vec![(json!({"head": [1]}), json!([1]))]);
    request.problem_title = Some("Reverse String".to_string());
    request.source_code = "def solution(head): return head.next".to_string();

    let err = harness(&service).execute(&request).await.unwrap_err();

    assert!(matches!(err, EngineError::InvalidSubmission(_)));
    assert_eq!(service.request_count(), 0);
}

#[test]
fn test_encoder_normalizer_round_trip() {
    // The values line a driver echoes back must normalize to the original
    // sequence.
    for sequence in [
        json!([1, 2, 3]),
        json!([0, 1]),
        json!([1.5, 2.25]),
        json!([42]),
    ] {
        let items = sequence.as_array().unwrap();
        let rendering = items
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let recovered = normalize::normalize(&rendering, &sequence);
        assert!(
            crate::compare::values_equal(&recovered, &sequence),
            "round trip failed for {}",
            sequence
        );
    }
}
