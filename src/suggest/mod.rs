pub mod mode;

use log::debug;

use crate::config::CONFIG;
use crate::llm::{self, BackendError, CompletionBackend};
use crate::render::Highlighter;
use self::mode::Mode;

const MISSING_PREREQUISITES: &str = "zsh-llm-suggest missing prerequisites:";

/// The prompt adapter: one completion request in, one printable block out.
/// Every outcome, success or failure, is an ordinary String for stdout so
/// the invoking zsh widget never sees a hard failure.
pub struct Suggest {
    backend: Box<dyn CompletionBackend>,
    highlighter: Highlighter,
}

impl Suggest {
    pub fn new() -> Self {
        Suggest {
            backend: llm::backend_from_config(&CONFIG),
            highlighter: Highlighter::new(),
        }
    }

    #[cfg(test)]
    fn with_backend(backend: Box<dyn CompletionBackend>) -> Self {
        Suggest {
            backend,
            highlighter: Highlighter::new(),
        }
    }

    pub async fn run(&self, mode_arg: &str, buffer: &str) -> String {
        let mode = match Mode::parse(mode_arg) {
            Some(mode) => mode,
            None => return unknown_mode(mode_arg),
        };

        debug!("dispatching {} request, buffer is {} bytes", mode, buffer.len());
        match self.backend.complete(mode.instruction(), buffer).await {
            Ok(response) => {
                let response = response.trim();
                match mode {
                    Mode::Generate => response.to_string(),
                    Mode::Explain => self.highlighter.try_highlight(response),
                }
            }
            Err(err) => render_error(&err),
        }
    }
}

pub fn unknown_mode(mode_arg: &str) -> String {
    format!(
        "ERROR: something went wrong in zsh-llm-suggest, please report a bug. Got unknown mode: {}",
        mode_arg
    )
}

fn render_error(err: &BackendError) -> String {
    match err {
        BackendError::MissingCapability => format!(
            "echo \"{} Install the llm CLI.\" && pip3 install llm-openrouter",
            MISSING_PREREQUISITES
        ),
        BackendError::Authentication => [
            "Error: OpenRouter API key not set or invalid. Please set it using one of the following methods:",
            "1. Run: llm keys set openrouter --value YOUR_API_KEY",
            "2. Set the OPENROUTER_API_KEY environment variable",
            "3. Store your key using secret-tool: secret-tool store --label='OpenRouter API Key' service openrouter.ai",
        ]
        .join("\n"),
        BackendError::Backend(message) => {
            format!("Error running OpenRouter LLM command: {}", message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use colored::control;
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubBackend {
        response: Result<String, BackendError>,
        calls: Arc<AtomicUsize>,
    }

    impl StubBackend {
        fn ok(text: &str) -> (Box<dyn CompletionBackend>, Arc<AtomicUsize>) {
            Self::build(Ok(text.to_string()))
        }

        fn err(err: BackendError) -> (Box<dyn CompletionBackend>, Arc<AtomicUsize>) {
            Self::build(Err(err))
        }

        fn build(
            response: Result<String, BackendError>,
        ) -> (Box<dyn CompletionBackend>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let backend = StubBackend {
                response,
                calls: calls.clone(),
            };
            (Box::new(backend), calls)
        }
    }

    #[async_trait]
    impl CompletionBackend for StubBackend {
        async fn complete(&self, _system: &str, _buffer: &str) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(BackendError::MissingCapability) => Err(BackendError::MissingCapability),
                Err(BackendError::Authentication) => Err(BackendError::Authentication),
                Err(BackendError::Backend(message)) => Err(BackendError::Backend(message.clone())),
            }
        }
    }

    #[tokio::test]
    async fn test_generate_trims_response_verbatim() {
        let (backend, calls) = StubBackend::ok("  ls -la \n");
        let suggest = Suggest::with_backend(backend);
        let output = suggest.run("generate", "list all files").await;
        assert_eq!(output, "ls -la");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_explain_highlights_when_colors_available() {
        control::set_override(true);
        let (backend, _) = StubBackend::ok("**bold** explanation");
        let suggest = Suggest::with_backend(backend);
        let output = suggest.run("explain", "ls -la").await;
        control::unset_override();

        assert!(!output.is_empty());
        assert_ne!(output, "**bold** explanation");
    }

    #[tokio::test]
    #[serial]
    async fn test_explain_falls_back_to_trimmed_raw_text() {
        control::set_override(false);
        let (backend, _) = StubBackend::ok(" **bold** explanation \n");
        let suggest = Suggest::with_backend(backend);
        let output = suggest.run("explain", "ls -la").await;
        control::unset_override();

        assert_eq!(output, "**bold** explanation");
    }

    #[tokio::test]
    async fn test_unknown_mode_skips_backend() {
        let (backend, calls) = StubBackend::ok("unused");
        let suggest = Suggest::with_backend(backend);
        let output = suggest.run("bogus", "whatever").await;
        assert!(output.contains("bogus"));
        assert_eq!(output.lines().count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authentication_failure_lists_all_remediations() {
        let (backend, calls) = StubBackend::err(BackendError::Authentication);
        let suggest = Suggest::with_backend(backend);
        let output = suggest.run("generate", "list all files").await;
        assert!(output.contains("llm keys set openrouter"));
        assert!(output.contains("OPENROUTER_API_KEY environment variable"));
        assert!(output.contains("secret-tool store"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_carries_message() {
        let (backend, calls) = StubBackend::err(BackendError::Backend(
            "API error (500 Internal Server Error): upstream".to_string(),
        ));
        let suggest = Suggest::with_backend(backend);
        let output = suggest.run("generate", "list all files").await;
        assert!(output.contains("API error (500 Internal Server Error): upstream"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_capability_prints_eval_hint() {
        let (backend, _) = StubBackend::err(BackendError::MissingCapability);
        let suggest = Suggest::with_backend(backend);
        let output = suggest.run("generate", "list all files").await;
        assert!(output.starts_with("echo \""));
        assert!(output.contains(MISSING_PREREQUISITES));
        assert!(output.contains("pip3 install llm-openrouter"));
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let (backend, calls) = StubBackend::ok("  ls -la ");
        let suggest = Suggest::with_backend(backend);
        let first = suggest.run("generate", "list all files").await;
        let second = suggest.run("generate", "list all files").await;
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
