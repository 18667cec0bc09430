mod api_client;
pub mod credentials;
mod subprocess;

use crate::config::{BackendKind, Config};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("the llm command-line tool is not installed")]
    MissingCapability,
    #[error("OpenRouter API key not set or invalid")]
    Authentication,
    #[error("{0}")]
    Backend(String),
}

/// One completion request, one text response. Implementations must not
/// retry and must not emit anything themselves.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, system: &str, buffer: &str) -> Result<String, BackendError>;
}

pub fn backend_from_config(config: &Config) -> Box<dyn CompletionBackend> {
    match config.backend {
        BackendKind::Api => Box::new(api_client::OpenRouterApi::new()),
        BackendKind::ApiEnv => Box::new(api_client::OpenRouterEnv::new()),
        BackendKind::LlmCli => Box::new(subprocess::LlmCli::new(&config.cli_program)),
    }
}
