use thiserror::Error;

/// Structural failures that occur before any test case starts. These are the
/// only errors that propagate past the harness boundary; everything that
/// happens during a test case is recorded on its `TestResult` instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("malformed test cases: {0}")]
    MalformedTestCases(String),
}
