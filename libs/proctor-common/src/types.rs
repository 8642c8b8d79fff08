use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::language::Language;

/// A single typed test case, supplied read-only by the problem catalog.
///
/// `input` is usually an object mapping named fields to primitives or
/// sequences (e.g. `{"nums": [2, 7, 11, 15], "target": 9}`); bare primitives
/// are accepted too. `expected_output` may be a primitive, a sequence, or
/// null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Value,
    pub expected_output: Value,
}

/// Per-language driver material supplied by a problem definition.
///
/// `template` is the candidate-facing stub; `driver_code` is a full program
/// containing a single insertion marker where candidate source is spliced in.
/// `entry_point` names the function the driver (or the generic fallback)
/// calls; problems that omit it fall back to symbol guessing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
}

/// Immutable per-problem collection of driver templates, keyed by language.
///
/// Injected into the harness rather than read from global state so it can be
/// exercised against synthetic catalogs in tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverTemplates {
    templates: HashMap<Language, DriverTemplate>,
}

impl DriverTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, language: Language, template: DriverTemplate) -> Self {
        self.templates.insert(language, template);
        self
    }

    pub fn get(&self, language: Language) -> Option<&DriverTemplate> {
        self.templates.get(&language)
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// One submission from the interview orchestration layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Raw language tag as received; normalized by the engine.
    pub language: String,
    pub source_code: String,
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub templates: DriverTemplates,
    /// Used only by the pre-flight submission check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_title: Option<String>,
}

/// Classification of a failing test, used downstream to phrase feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Timeout,
    CompileError,
    RuntimeError,
    TypeMismatch,
    LengthMismatch,
    ContentMismatch,
    ValueMismatch,
}

/// Structured facts about a failing test: not natural language, but the
/// material the feedback generator phrases from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
}

/// Outcome of one test case, ordered by `index` to match submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub index: usize,
    pub passed: bool,
    pub input: Value,
    pub expected_output: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

/// Aggregated result envelope for one submission. Finalized once at harness
/// completion and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub total_tests: usize,
    pub passed_tests: usize,
    pub success: bool,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
    pub test_results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionSummary {
    /// Summary form for structural failures that abort the whole submission:
    /// zero results, zero passed, a top-level error instead of per-test
    /// detail.
    pub fn fatal(error: impl Into<String>) -> Self {
        Self {
            total_tests: 0,
            passed_tests: 0,
            success: false,
            duration_ms: 0,
            finished_at: Utc::now(),
            test_results: Vec::new(),
            error: Some(error.into()),
        }
    }
}
