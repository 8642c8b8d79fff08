//! Client for the external sandboxed execution service.
//!
//! The engine knows HOW to talk to the service, not how code is isolated -
//! sandboxing, resource limits, and interpreter/compiler dispatch all live
//! on the service side. One execution per test case, no retry: a failed or
//! slow case is recorded and the harness moves on.

use async_trait::async_trait;
use proctor_common::Language;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::EngineConfig;

/// One synthesized program + encoded stdin pair. Constructed fresh per test
/// case and discarded after use; nothing is retained between cases.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub language: Language,
    pub program: String,
    pub stdin: String,
    pub run_timeout_ms: u64,
    pub compile_timeout_ms: u64,
}

/// Raw result of one sandboxed execution.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    /// Compiler diagnostics when the service reported a failed compile
    /// stage; `None` for interpreted runs and clean compiles.
    pub compile_error: Option<String>,
    pub exit_code: i64,
}

/// Failures on the way to or from the service. A transport timeout is a
/// distinct kind so the harness can record it separately from compile and
/// runtime failures the service itself reports.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("execution timed out after {0} ms")]
    Timeout(u64),

    #[error("execution service transport error: {0}")]
    Transport(String),

    #[error("malformed execution service response: {0}")]
    BadResponse(String),
}

/// Boundary to whatever actually runs candidate programs. Swappable so the
/// harness can be exercised against a scripted service in tests.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    async fn run(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, ExecutionError>;
}

/// Production client speaking the execute API of a Piston-style sandbox
/// service over HTTP.
pub struct SandboxClient {
    http: reqwest::Client,
    execute_url: String,
    transport_margin_ms: u64,
}

impl SandboxClient {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            execute_url: config.sandbox_url.clone(),
            transport_margin_ms: config.transport_margin_ms,
        }
    }
}

#[derive(Serialize)]
struct ExecutePayload<'a> {
    language: &'a str,
    files: Vec<FilePayload<'a>>,
    stdin: &'a str,
    run_timeout: u64,
    compile_timeout: u64,
}

#[derive(Serialize)]
struct FilePayload<'a> {
    name: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    run: StageResponse,
    #[serde(default)]
    compile: Option<StageResponse>,
}

#[derive(Deserialize, Default)]
struct StageResponse {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    code: Option<i64>,
}

#[async_trait]
impl ExecutionService for SandboxClient {
    async fn run(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, ExecutionError> {
        // Outer bound strictly larger than run + compile so the service can
        // answer with its own timeout error before the client severs.
        let transport_timeout = Duration::from_millis(
            request.run_timeout_ms + request.compile_timeout_ms + self.transport_margin_ms,
        );

        let payload = ExecutePayload {
            language: request.language.as_str(),
            files: vec![FilePayload {
                name: request.language.source_file(),
                content: &request.program,
            }],
            stdin: &request.stdin,
            run_timeout: request.run_timeout_ms,
            compile_timeout: request.compile_timeout_ms,
        };

        debug!(
            language = %request.language,
            program_bytes = request.program.len(),
            stdin_bytes = request.stdin.len(),
            "Submitting program to execution service"
        );

        let response = self
            .http
            .post(&self.execute_url)
            .timeout(transport_timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExecutionError::Timeout(transport_timeout.as_millis() as u64)
                } else {
                    ExecutionError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ExecutionError::Transport(format!(
                "execution service returned HTTP {}",
                response.status()
            )));
        }

        let body: ExecuteResponse = response
            .json()
            .await
            .map_err(|e| ExecutionError::BadResponse(e.to_string()))?;

        let compile_error = body
            .compile
            .as_ref()
            .filter(|stage| stage.code.unwrap_or(0) != 0)
            .map(|stage| {
                if stage.stderr.trim().is_empty() {
                    stage.stdout.clone()
                } else {
                    stage.stderr.clone()
                }
            });

        Ok(ExecutionOutcome {
            stdout: body.run.stdout,
            stderr: body.run.stderr,
            exit_code: body.run.code.unwrap_or(0),
            compile_error,
        })
    }
}
