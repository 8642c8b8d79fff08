//! Runs one submission's test cases end to end and aggregates the result
//! envelope.
//!
//! Test cases run strictly one after another: the execution service is the
//! bottleneck, most problems have at most ten cases, and sequential
//! execution keeps per-test diagnostics attributable without correlation
//! ids. The harness holds no state between cases and no state between
//! submissions: each invocation owns its own summary, so concurrent
//! submissions need no coordination.

use chrono::Utc;
use proctor_common::{
    Diagnostic, DiagnosticKind, ExecutionSummary, Language, SubmissionRequest, TestCase, TestResult,
};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::client::{ExecutionError, ExecutionRequest, ExecutionService};
use crate::compare;
use crate::config::EngineConfig;
use crate::driver;
use crate::error::EngineError;
use crate::normalize;
use crate::stdin;
use crate::validate;

pub struct Harness<S> {
    service: S,
    config: EngineConfig,
}

impl<S: ExecutionService> Harness<S> {
    pub fn new(service: S, config: EngineConfig) -> Self {
        Self { service, config }
    }

    /// Validate one submission against its test battery.
    ///
    /// Structural failures (unsupported language, invalid submission)
    /// return `Err` before any execution attempt. Everything that happens
    /// during a test case: transport errors, compile failures, runtime
    /// crashes, wrong answers: is recorded on that case's `TestResult`,
    /// and later cases always run.
    pub async fn execute(
        &self,
        request: &SubmissionRequest,
    ) -> Result<ExecutionSummary, EngineError> {
        let language = Language::parse(&request.language)
            .ok_or_else(|| EngineError::UnsupportedLanguage(request.language.clone()))?;

        validate::check_submission(&request.source_code, request.problem_title.as_deref())?;

        let started = Instant::now();
        info!(
            submission_id = %request.id,
            language = %language,
            test_count = request.test_cases.len(),
            source_bytes = request.source_code.len(),
            "Starting submission validation"
        );

        let mut test_results = Vec::with_capacity(request.test_cases.len());
        for (index, test_case) in request.test_cases.iter().enumerate() {
            let result = self.run_case(language, request, index, test_case).await;
            debug!(
                submission_id = %request.id,
                test_index = index,
                passed = result.passed,
                "Test case finished"
            );
            test_results.push(result);
        }

        let passed_tests = test_results.iter().filter(|r| r.passed).count();
        let summary = ExecutionSummary {
            total_tests: test_results.len(),
            passed_tests,
            success: passed_tests == test_results.len(),
            duration_ms: started.elapsed().as_millis() as u64,
            finished_at: Utc::now(),
            test_results,
            error: None,
        };

        info!(
            submission_id = %request.id,
            passed = summary.passed_tests,
            total = summary.total_tests,
            success = summary.success,
            duration_ms = summary.duration_ms,
            "Submission validation complete"
        );
        Ok(summary)
    }

    async fn run_case(
        &self,
        language: Language,
        request: &SubmissionRequest,
        index: usize,
        test_case: &TestCase,
    ) -> TestResult {
        let stdin_text = stdin::encode(&test_case.input);
        let program = driver::synthesize(
            &request.source_code,
            language,
            test_case,
            request.templates.get(language),
        );

        let exec = ExecutionRequest {
            language,
            program,
            stdin: stdin_text,
            run_timeout_ms: self.config.run_timeout_ms,
            compile_timeout_ms: self.config.compile_timeout_ms,
        };

        let outcome = match self.service.run(&exec).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    submission_id = %request.id,
                    test_index = index,
                    error = %err,
                    "Execution service call failed"
                );
                let kind = match err {
                    ExecutionError::Timeout(_) => DiagnosticKind::Timeout,
                    _ => DiagnosticKind::RuntimeError,
                };
                return failed(index, test_case, err.to_string(), kind);
            }
        };

        if let Some(diagnostics) = outcome.compile_error {
            return failed(index, test_case, diagnostics, DiagnosticKind::CompileError);
        }

        if outcome.exit_code != 0 {
            let detail = if outcome.stderr.trim().is_empty() {
                format!("process exited with code {}", outcome.exit_code)
            } else {
                outcome.stderr.trim().to_string()
            };
            return failed(index, test_case, detail, DiagnosticKind::RuntimeError);
        }

        let actual = normalize::normalize(&outcome.stdout, &test_case.expected_output);
        if compare::values_equal(&actual, &test_case.expected_output) {
            TestResult {
                index,
                passed: true,
                input: test_case.input.clone(),
                expected_output: test_case.expected_output.clone(),
                actual_output: Some(actual),
                error: None,
                diagnostic: None,
            }
        } else {
            let mismatch = compare::explain(&actual, &test_case.expected_output);
            TestResult {
                index,
                passed: false,
                input: test_case.input.clone(),
                expected_output: test_case.expected_output.clone(),
                actual_output: Some(actual),
                error: None,
                diagnostic: Some(Diagnostic {
                    kind: mismatch.kind(),
                    detail: mismatch.to_string(),
                }),
            }
        }
    }
}

/// Failing result for a case that never produced a comparable output.
fn failed(index: usize, test_case: &TestCase, detail: String, kind: DiagnosticKind) -> TestResult {
    TestResult {
        index,
        passed: false,
        input: test_case.input.clone(),
        expected_output: test_case.expected_output.clone(),
        actual_output: None,
        error: Some(detail.clone()),
        diagnostic: Some(Diagnostic { kind, detail }),
    }
}
