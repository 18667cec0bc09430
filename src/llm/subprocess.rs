use async_trait::async_trait;
use log::debug;
use std::io::ErrorKind;
use tokio::process::Command;

use super::{BackendError, CompletionBackend};
use crate::config::CONFIG;

/// Out-of-process backend: defers the whole exchange to the external `llm`
/// tool and captures its stdout as the response.
pub struct LlmCli {
    program: String,
}

impl LlmCli {
    pub fn new(program: &str) -> Self {
        LlmCli {
            program: program.to_string(),
        }
    }
}

#[async_trait]
impl CompletionBackend for LlmCli {
    async fn complete(&self, system: &str, buffer: &str) -> Result<String, BackendError> {
        // The tool takes a single prompt argument, so the instruction rides
        // in front of the buffer.
        let prompt = format!("{}\n\n{}", system, buffer);

        debug!("spawning {} with model {}", self.program, CONFIG.cli_model);
        let output = Command::new(&self.program)
            .arg("prompt")
            .arg(&prompt)
            .args(["-m", CONFIG.cli_model.as_str(), "--no-stream", "--no-log"])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    BackendError::MissingCapability
                } else {
                    BackendError::Backend(e.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(output.status.code(), stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

// The subprocess only hands back raw text, so substring matching is the one
// signal available for telling credential trouble apart from everything else.
fn classify_failure(code: Option<i32>, stderr: &str) -> BackendError {
    let lowered = stderr.to_lowercase();
    if lowered.contains("api_key") || lowered.contains("authentication") {
        return BackendError::Authentication;
    }
    match code {
        Some(code) => BackendError::Backend(format!("llm exited with status {}: {}", code, stderr)),
        None => BackendError::Backend(format!("llm terminated by signal: {}", stderr)),
    }
}
