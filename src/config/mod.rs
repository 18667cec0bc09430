use lazy_static::lazy_static;
use log::warn;
use std::env;
use std::sync::Arc;

/// Which transport carries the completion request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process OpenRouter call, key resolved through the credential chain.
    Api,
    /// In-process OpenRouter call, key taken from the environment at request time.
    ApiEnv,
    /// External `llm` command-line tool invoked as a subprocess.
    LlmCli,
}

impl BackendKind {
    fn from_env() -> Self {
        match env::var("LLM_SUGGEST_BACKEND").as_deref() {
            Ok("api") | Err(_) => BackendKind::Api,
            Ok("api-env") => BackendKind::ApiEnv,
            Ok("llm-cli") => BackendKind::LlmCli,
            Ok(other) => {
                warn!("unknown LLM_SUGGEST_BACKEND value '{}', using the API backend", other);
                BackendKind::Api
            }
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub api_base: String,
    pub api_model: String,
    pub cli_model: String,
    pub cli_program: String,
    pub backend: BackendKind,
}

lazy_static! {
    pub static ref CONFIG: Arc<Config> = Arc::new(Config {
        api_base: "https://openrouter.ai/api/v1".to_string(),
        api_model: "anthropic/claude-3.5-sonnet:beta".to_string(),
        cli_model: "openrouter/anthropic/claude-3.5-sonnet:beta".to_string(),
        cli_program: "llm".to_string(),
        backend: BackendKind::from_env(),
    });
}
