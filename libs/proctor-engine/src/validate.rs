//! Pre-flight submission checks that run before any execution attempt.
//!
//! This is a narrow, problem-specific sanity check, not static analysis:
//! it catches submissions that are obviously answering a different problem
//! (e.g. linked-list code for a string problem) so the interview layer can
//! respond without burning an execution round-trip.

use tracing::debug;

use crate::error::EngineError;

struct Rule {
    /// Lowercase keyword matched against the problem title.
    title_keyword: &'static str,
    /// Tokens that must not appear in the candidate source.
    forbidden: &'static [&'static str],
    reason: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        title_keyword: "string",
        forbidden: &["ListNode", "list_node", ".next", "->next"],
        reason: "references linked-list structures in a string problem",
    },
    Rule {
        title_keyword: "sum",
        forbidden: &["ListNode", "list_node"],
        reason: "references linked-list structures in an array problem",
    },
];

/// Reject a submission outright when its vocabulary contradicts the
/// problem. No problem title means no check.
pub fn check_submission(source_code: &str, problem_title: Option<&str>) -> Result<(), EngineError> {
    let Some(title) = problem_title else {
        return Ok(());
    };
    let title = title.to_lowercase();

    for rule in RULES {
        if !title.contains(rule.title_keyword) {
            continue;
        }
        for token in rule.forbidden {
            if source_code.contains(token) {
                debug!(token, title = %title, "Pre-flight check rejected submission");
                return Err(EngineError::InvalidSubmission(format!(
                    "submission {} (found `{}`)",
                    rule.reason, token
                )));
            }
        }
    }
    Ok(())
}
