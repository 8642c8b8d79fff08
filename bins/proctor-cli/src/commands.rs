// CLI commands for running submissions against the validation engine
use anyhow::{Context, Result};
use proctor_common::{DriverTemplates, ExecutionSummary, Language, SubmissionRequest, TestCase};
use proctor_engine::{EngineConfig, EngineError, Harness, SandboxClient};
use std::fs;
use uuid::Uuid;

/// Load files, run the harness, print the envelope. Returns the summary's
/// success flag so main can set the exit code.
pub async fn run_submission(
    code_path: &str,
    language: &str,
    tests_path: &str,
    drivers_path: Option<&str>,
    problem_title: Option<String>,
) -> Result<bool> {
    let source_code = fs::read_to_string(code_path)
        .with_context(|| format!("Failed to read candidate source: {}", code_path))?;

    let raw_tests = fs::read_to_string(tests_path)
        .with_context(|| format!("Failed to read test cases: {}", tests_path))?;
    let test_cases: Vec<TestCase> = match serde_json::from_str(&raw_tests) {
        Ok(cases) => cases,
        Err(e) => {
            // Malformed catalog data aborts the whole submission with a
            // top-level error instead of partial results.
            let summary =
                ExecutionSummary::fatal(EngineError::MalformedTestCases(e.to_string()).to_string());
            print_summary(&summary);
            return Ok(false);
        }
    };

    let templates: DriverTemplates = match drivers_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read driver templates: {}", path))?;
            serde_json::from_str(&raw).context("Failed to parse driver templates")?
        }
        None => DriverTemplates::new(),
    };

    let request = SubmissionRequest {
        id: Uuid::new_v4(),
        language: language.to_string(),
        source_code,
        test_cases,
        templates,
        problem_title,
    };

    println!("→ Validating submission {}", request.id);
    println!("  Language: {}", request.language);
    println!("  Test cases: {}", request.test_cases.len());
    println!();

    let config = EngineConfig::from_env();
    let harness = Harness::new(SandboxClient::new(&config), config);

    let summary = match harness.execute(&request).await {
        Ok(summary) => summary,
        Err(err) => ExecutionSummary::fatal(err.to_string()),
    };

    print_summary(&summary);
    Ok(summary.success)
}

fn print_summary(summary: &ExecutionSummary) {
    if let Some(error) = &summary.error {
        println!("✗ Submission rejected: {}", error);
        return;
    }

    for result in &summary.test_results {
        if result.passed {
            println!("  ✓ Test {} passed", result.index + 1);
        } else if let Some(error) = &result.error {
            println!("  ✗ Test {} failed: {}", result.index + 1, first_line(error));
        } else if let Some(diagnostic) = &result.diagnostic {
            println!("  ✗ Test {} failed: {}", result.index + 1, diagnostic.detail);
        } else {
            println!("  ✗ Test {} failed", result.index + 1);
        }
    }

    println!();
    println!("→ {} / {} tests passed in {}ms", summary.passed_tests, summary.total_tests, summary.duration_ms);
    if summary.success {
        println!("✓ Submission accepted");
    } else {
        println!("✗ Submission failed");
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

pub fn list_languages() {
    println!("Supported languages:");
    for language in Language::all() {
        println!("  {:<12} → {}", language.to_string(), language.source_file());
    }
}
