pub mod language;
pub mod types;

pub use language::Language;
pub use types::{
    Diagnostic, DiagnosticKind, DriverTemplate, DriverTemplates, ExecutionSummary,
    SubmissionRequest, TestCase, TestResult,
};
